use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// Geometry and settings echoed in the footer.
#[derive(Debug, Clone, Copy)]
pub struct FooterStatus {
    pub width:       u16,
    pub height:      u16,
    pub bar_width:   usize,
    pub graph_width: usize,
    pub interval:    Duration,
    pub theme_name:  &'static str,
}

const KEYS: [(&str, &str); 2] = [("q", "Quit"), ("t", "Theme")];

pub fn render_footer(f: &mut Frame, area: Rect, status: &FooterStatus, theme: &Theme) {
    let mut spans: Vec<Span> = vec![Span::styled(" ", theme.footer_bg)];

    for (key, desc) in KEYS {
        spans.push(Span::styled(format!(" {} ", key), theme.footer_key));
        spans.push(Span::styled(format!("{}  ", desc), theme.footer_text));
    }

    let info = format!(
        "\u{2502}  Terminal: {}x{} | Bar width: {} | Graph width: {} | every {:.1}s | {}",
        status.width,
        status.height,
        status.bar_width,
        status.graph_width,
        status.interval.as_secs_f64(),
        status.theme_name,
    );
    spans.push(Span::styled(info, theme.footer_text));

    let para = Paragraph::new(Line::from(spans)).style(theme.footer_bg);
    f.render_widget(para, area);
}
