use crate::ui::theme::Theme;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

const POINT: char = '●';
/// "100%|" on the left plus "|" on the right.
pub const AXIS_WIDTH: usize = 6;
pub const MIN_GRAPH_WIDTH: usize = 10;
/// Title, x-axis rule and caption around the plot rows.
pub const CHROME_ROWS: usize = 3;

/// Columns available to the plot on a terminal `width` wide.
pub fn graph_width(width: usize) -> usize {
    width.saturating_sub(AXIS_WIDTH).max(MIN_GRAPH_WIDTH)
}

/// Plot the newest `min(values.len(), width)` values, one column each, oldest
/// on the left, on a fixed 0-100 scale so graphs compare across refreshes.
/// Returns `height` rows of exactly `width` characters, top row first.
pub fn plot(values: &[f64], width: usize, height: usize) -> Vec<String> {
    if height == 0 || width == 0 { return Vec::new(); }
    let mut grid = vec![vec![' '; width]; height];

    let window = &values[values.len().saturating_sub(width)..];
    let top = (height - 1) as f64;

    for (x, &v) in window.iter().enumerate() {
        let level = (v / 100.0 * top).round().clamp(0.0, top) as usize;
        grid[height - 1 - level][x] = POINT;
    }
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// A titled graph block: title, `height` plot rows with a percent axis, x-axis
/// rule and a "samples ago ... now" caption.
pub fn trend_lines(
    title: &str,
    values: &[f64],
    width: usize,
    height: usize,
    style: Style,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let gw = graph_width(width);
    let rows = plot(values, gw, height);
    let shown = values.len().min(gw);

    let mut lines = Vec::with_capacity(height + CHROME_ROWS);
    lines.push(Line::from(Span::styled(title.to_string(), style)));

    let step = if height > 1 { 100.0 / (height - 1) as f64 } else { 0.0 };
    for (i, row) in rows.into_iter().enumerate() {
        let axis = 100.0 - step * i as f64;
        lines.push(Line::from(vec![
            Span::styled(format!("{:>3.0}%|", axis), theme.text_dim),
            Span::styled(row, style),
            Span::styled("|", theme.text_dim),
        ]));
    }

    lines.push(Line::from(Span::styled(format!("    {}", "-".repeat(gw)), theme.text_dim)));

    let left = format!("{} samples ago", shown);
    let gap = gw.saturating_sub(left.len() + 3).max(1);
    lines.push(Line::from(Span::styled(
        format!("    {}{}now", left, " ".repeat(gap)),
        theme.text_dim,
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_of(rows: &[String], x: usize) -> Option<usize> {
        rows.iter().position(|r| r.chars().nth(x) == Some(POINT))
    }

    #[test]
    fn values_map_onto_fixed_scale() {
        let rows = plot(&[0.0, 50.0, 100.0], 10, 5);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.chars().count() == 10));
        assert_eq!(column_of(&rows, 0), Some(4));
        assert_eq!(column_of(&rows, 1), Some(2));
        assert_eq!(column_of(&rows, 2), Some(0));
        assert_eq!(column_of(&rows, 3), None);
    }

    #[test]
    fn window_keeps_newest_values() {
        let values: Vec<f64> = (0..10).map(|i| if i < 7 { 0.0 } else { 100.0 }).collect();
        let rows = plot(&values, 3, 2);
        // Only the last three (all 100) are drawn, in the top row.
        assert_eq!(rows[0], "●●●");
        assert_eq!(rows[1], "   ");
    }

    #[test]
    fn short_history_is_left_aligned() {
        let rows = plot(&[100.0], 5, 2);
        assert_eq!(rows[0], "●    ");
    }

    #[test]
    fn block_has_chrome_rows() {
        let theme = Theme::default();
        let lines = trend_lines("Hit Ratio Over Time:", &[10.0, 20.0], 40, 4, theme.graph_hit, &theme);
        assert_eq!(lines.len(), 4 + CHROME_ROWS);
        let first_axis: String = lines[1].spans[0].content.to_string();
        assert_eq!(first_axis, "100%|");
        let last_axis: String = lines[4].spans[0].content.to_string();
        assert_eq!(last_axis, "  0%|");
        let caption: String = lines[6].spans[0].content.to_string();
        assert!(caption.contains("2 samples ago") && caption.ends_with("now"));
    }
}
