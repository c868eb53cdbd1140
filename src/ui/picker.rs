use crate::menu::{MenuState, Phase};
use crate::ui::theme::Theme;
use crate::util::human::fmt_bytes;
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Rows above and below the list: title, help, blank / blank, status.
const CHROME_ROWS: u16 = 5;
const MAX_VISIBLE: u16 = 15;

/// Height of the inline viewport needed for `n` candidates.
pub fn viewport_height(n: usize) -> u16 {
    (n as u16).clamp(1, MAX_VISIBLE) + CHROME_ROWS
}

/// First list index to show so `selected` stays visible in `rows` rows.
fn window_start(selected: usize, rows: usize) -> usize {
    if rows == 0 { return selected; }
    (selected + 1).saturating_sub(rows)
}

pub fn render(f: &mut Frame, state: &MenuState, theme: &Theme) {
    let area = f.area();
    let list_rows = area.height.saturating_sub(CHROME_ROWS) as usize;
    let candidates = state.candidates();
    let start = window_start(state.highlighted(), list_rows);

    let mut lines = vec![
        Line::from(Span::styled("cachetop - LVM Cache Volume Selection", theme.title)),
        Line::from(Span::styled(
            "Use \u{2191}/\u{2193} to navigate, Enter to select, Esc or Ctrl+C to exit",
            theme.text_dim,
        )),
        Line::from(""),
    ];

    for (i, vol) in candidates.iter().enumerate().skip(start).take(list_rows) {
        let detail = format!("  {} cache, {} chunks", vol.mode, fmt_bytes(vol.block_size));
        if i == state.highlighted() {
            lines.push(Line::from(vec![
                Span::styled(format!("  \u{2192} {}", vol), theme.selected),
                Span::styled(detail, theme.text_dim),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(format!("    {}", vol), theme.text),
                Span::styled(detail, theme.text_dim),
            ]));
        }
    }

    lines.push(Line::from(""));
    let status = match (state.phase(), candidates.get(state.highlighted())) {
        (Phase::Cancelled, _) => Line::from(Span::styled("Selection cancelled.", theme.poor)),
        (Phase::Selected, Some(v)) => Line::from(Span::styled(
            format!("Selected: {}. Starting monitor...", v), theme.good)),
        (_, Some(v)) => Line::from(vec![
            Span::styled("Selected: ", theme.text),
            Span::styled(v.to_string(), theme.moderate),
        ]),
        (_, None) => Line::from(""),
    };
    lines.push(status);

    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MenuEvent;
    use crate::models::volume::{CacheMode, VolumeDescriptor};
    use ratatui::{backend::TestBackend, Terminal};

    fn state(n: usize) -> MenuState {
        MenuState::new((0..n).map(|i| VolumeDescriptor {
            vg_name: format!("vg{}", i), lv_name: "data".into(),
            mode: CacheMode::Writethrough, block_size: 65536,
        }).collect())
    }

    fn screen(state: &MenuState, height: u16) -> Vec<String> {
        let mut term = Terminal::new(TestBackend::new(70, height)).unwrap();
        term.draw(|f| render(f, state, &Theme::default())).unwrap();
        let buf = term.backend().buffer();
        buf.content.chunks(70)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn highlights_current_entry() {
        let mut s = state(2);
        let rows = screen(&s, 8);
        assert!(rows[3].starts_with("  \u{2192} vg0/data"));
        assert!(rows[4].starts_with("    vg1/data"));
        assert!(rows[3].contains("writethrough cache, 64.0 KB chunks"));

        s.apply(MenuEvent::Down);
        let rows = screen(&s, 8);
        assert!(rows[3].starts_with("    vg0/data"));
        assert!(rows[4].starts_with("  \u{2192} vg1/data"));
        assert!(rows[6].starts_with("Selected: vg1/data"));
    }

    #[test]
    fn long_lists_scroll_to_selection() {
        let mut s = state(10);
        for _ in 0..7 { s.apply(MenuEvent::Down); }
        // 3 list rows in an 8-row viewport
        let rows = screen(&s, 8);
        assert!(rows[5].starts_with("  \u{2192} vg7/data"));
        assert!(rows[3].starts_with("    vg5/data"));
    }

    #[test]
    fn viewport_fits_list() {
        assert_eq!(viewport_height(2), 7);
        assert_eq!(viewport_height(100), MAX_VISIBLE + CHROME_ROWS);
    }

    #[test]
    fn cancelled_message() {
        let mut s = state(2);
        s.apply(MenuEvent::Cancel);
        assert!(screen(&s, 8).iter().any(|r| r.starts_with("Selection cancelled.")));
    }
}
