use crate::models::metrics::{DerivedMetrics, Tier};
use crate::ui::theme::Theme;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

pub const LABEL_WIDTH: usize = 14;
pub const VALUE_WIDTH: usize = 7;
pub const MIN_BAR_WIDTH: usize = 20;
const BRACKETS: usize = 2;

const FILLED: char = '█';
const EMPTY:  char = '░';

/// Column budget of one bar row: `label[bar] value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub label: usize,
    pub bar:   usize,
    pub value: usize,
}

impl BarLayout {
    /// The bar gets whatever the fixed columns leave, but never less than
    /// [`MIN_BAR_WIDTH`]; on narrow terminals the label gives way first, then
    /// the value, and the bar only shrinks once both are gone.
    pub fn for_width(width: usize) -> Self {
        let bar = width
            .saturating_sub(LABEL_WIDTH + BRACKETS + VALUE_WIDTH)
            .max(MIN_BAR_WIDTH)
            .min(width.saturating_sub(BRACKETS));
        let rest  = width.saturating_sub(bar + BRACKETS);
        let value = VALUE_WIDTH.min(rest);
        let label = LABEL_WIDTH.min(rest - value);
        Self { label, bar, value }
    }

    pub fn total(&self) -> usize { self.label + self.bar + self.value + BRACKETS }
}

/// Column counts of the read / write / free parts of the usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub read:  usize,
    pub write: usize,
    pub free:  usize,
}

/// Split `width` columns proportionally to the block counts. Read and write
/// are rounded on their own and free takes what is left. When rounding pushes
/// read + write past `width`, the larger of the two (read on a tie) gives up
/// the excess.
pub fn split_usage(width: usize, read: u64, write: u64, total: u64) -> Segments {
    if total == 0 {
        return Segments { read: 0, write: 0, free: width };
    }
    let cols = |blocks: u64| {
        ((width as f64 * blocks as f64 / total as f64).round() as usize).min(width)
    };

    let (mut r, mut w) = (cols(read), cols(write));
    let over = (r + w).saturating_sub(width);
    if over > 0 {
        if r >= w { r -= over; } else { w -= over; }
    }
    Segments { read: r, write: w, free: width - r - w }
}

/// Filled columns for a 0–100 value.
pub fn filled_columns(width: usize, pct: f64) -> usize {
    ((width as f64 * pct.clamp(0.0, 100.0) / 100.0).round() as usize).min(width)
}

fn fit(text: &str, width: usize) -> String {
    let mut s: String = text.chars().take(width).collect();
    while s.chars().count() < width { s.push(' '); }
    s
}

fn value_text(pct: f64, width: usize) -> String {
    let full = format!(" {:>5.1}%", pct);
    full.chars().take(width).collect()
}

fn run(c: char, n: usize) -> String {
    std::iter::repeat(c).take(n).collect()
}

/// Dual-colour cache usage bar: estimated read blocks, estimated write blocks, free.
pub fn usage_bar(m: &DerivedMetrics, layout: BarLayout, theme: &Theme) -> Line<'static> {
    let seg = split_usage(layout.bar, m.est_read_blocks, m.est_write_blocks, m.total_blocks);
    Line::from(vec![
        Span::styled(fit("Cache Usage", layout.label), theme.text),
        Span::styled("[", theme.text_dim),
        Span::styled(run(FILLED, seg.read), theme.read_cache),
        Span::styled(run(FILLED, seg.write), theme.write_cache),
        Span::styled(run(EMPTY, seg.free), theme.free),
        Span::styled("]", theme.text_dim),
        Span::styled(value_text(m.usage_pct, layout.value), theme.tier_style(Tier::of(m.usage_pct))),
    ])
}

/// Legend under the usage bar, aligned with the bar's first column.
pub fn usage_legend(layout: BarLayout, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw(run(' ', layout.label + 1)),
        Span::styled(FILLED.to_string(), theme.read_cache),
        Span::styled(" Read cache  ", theme.text_dim),
        Span::styled(FILLED.to_string(), theme.write_cache),
        Span::styled(" Write cache  ", theme.text_dim),
        Span::styled(EMPTY.to_string(), theme.free),
        Span::styled(" Free  (read/write split estimated)", theme.text_dim),
    ])
}

/// Single-segment bar for a 0–100 value in a fixed style.
pub fn ratio_bar(label: &str, pct: f64, style: Style, layout: BarLayout, theme: &Theme) -> Line<'static> {
    let filled = filled_columns(layout.bar, pct);
    Line::from(vec![
        Span::styled(fit(label, layout.label), theme.text),
        Span::styled("[", theme.text_dim),
        Span::styled(run(FILLED, filled), style),
        Span::styled(run(EMPTY, layout.bar - filled), theme.free),
        Span::styled("]", theme.text_dim),
        Span::styled(value_text(pct, layout.value), style),
    ])
}

/// Hit-ratio bar coloured by performance tier.
pub fn tiered_bar(label: &str, pct: f64, layout: BarLayout, theme: &Theme) -> Line<'static> {
    ratio_bar(label, pct, theme.ratio_style(pct), layout, theme)
}
