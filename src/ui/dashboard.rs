use crate::error::CacheError;
use crate::models::metrics::{DerivedMetrics, IoRates, Series};
use crate::models::volume::{CacheMode, VolumeDescriptor};
use crate::ui::bars::{self, BarLayout};
use crate::ui::footer::{render_footer, FooterStatus};
use crate::ui::theme::Theme;
use crate::ui::trend::{self, CHROME_ROWS};
use crate::util::human::{fmt_blocks, fmt_count, fmt_ops_rate, fmt_pct};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

const PREFERRED_GRAPH_HEIGHT: usize = 8;
const MIN_GRAPH_HEIGHT: usize = 3;

/// Everything one dashboard frame is drawn from.
pub struct DashboardView<'a> {
    pub volume:     &'a VolumeDescriptor,
    pub latest:     &'a DerivedMetrics,
    /// Oldest first, `latest` included as the last entry.
    pub history:    &'a [DerivedMetrics],
    pub rates:      Option<IoRates>,
    pub interval:   Duration,
    pub theme_name: &'static str,
}

/// Draw the full dashboard. Width and height come from the frame, so a resize
/// between refreshes is picked up on the next draw.
pub fn render(f: &mut Frame, view: &DashboardView, theme: &Theme) {
    let area = f.area();
    let root = split_root(area);

    render_header(f, root[0], view.volume, view.latest.mode, Some(view.latest.timestamp), theme);

    let width = root[1].width as usize;
    let layout = BarLayout::for_width(width);
    let graph_width = trend::graph_width(width);

    let mut lines = stats_lines(view, theme);
    lines.push(Line::from(""));
    lines.extend(status_lines(view.latest, layout, theme));

    let used_rows = lines.len();
    let spare = (root[1].height as usize).saturating_sub(used_rows);
    lines.extend(trend_section(view.history, width, spare, theme));

    f.render_widget(Paragraph::new(lines), root[1]);

    let status = FooterStatus {
        width:       area.width,
        height:      area.height,
        bar_width:   layout.bar,
        graph_width,
        interval:    view.interval,
        theme_name:  view.theme_name,
    };
    render_footer(f, root[2], &status, theme);
}

/// Inline diagnostic drawn instead of the dashboard when a refresh failed.
pub fn render_error(
    f: &mut Frame,
    volume: &VolumeDescriptor,
    err: &CacheError,
    last_ok: Option<DateTime<Local>>,
    status: &FooterStatus,
    theme: &Theme,
) {
    let root = split_root(f.area());
    render_header(f, root[0], volume, volume.mode, last_ok, theme);

    let last = match last_ok {
        Some(t) => format!("Last successful sample: {}", t.format("%H:%M:%S")),
        None    => "No successful sample yet.".to_string(),
    };
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", err.kind()), theme.poor.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", err), theme.text)),
        Line::from(""),
        Line::from(Span::styled(format!("  {}", err.hint()), theme.text_dim)),
        Line::from(Span::styled(format!("  {}", last), theme.text_dim)),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).border_style(theme.border)
        .title(Span::styled("Could not read cache statistics", theme.title)));
    f.render_widget(body, root[1]);

    render_footer(f, root[2], status, theme);
}

fn split_root(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area)
}

/// The clock shown is the time of the sample on screen, not the wall clock.
fn render_header(
    f: &mut Frame,
    area: Rect,
    volume: &VolumeDescriptor,
    mode: CacheMode,
    sampled_at: Option<DateTime<Local>>,
    theme: &Theme,
) {
    let at = sampled_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let title = format!(" cachetop - {}   [{}]   {}", volume, mode, at);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, theme.title))).style(theme.header),
        area,
    );
}

// ── Text sections ─────────────────────────────────────────────────────

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), theme.title))
}

fn stat(label: &str, value: String, detail: String, value_style: Style, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), theme.text),
        Span::styled(value, value_style),
        Span::styled(format!(" {}", detail), theme.text_dim),
    ])
}

fn stats_lines(view: &DashboardView, theme: &Theme) -> Vec<Line<'static>> {
    let m = view.latest;
    let bs = m.block_size;
    let mut lines = vec![
        heading("Current Statistics:", theme),
        stat("Cache Pool:", fmt_blocks(m.total_blocks, bs),
            format!("total ({} blocks of {})", fmt_count(m.total_blocks), fmt_blocks(1, bs)),
            theme.text, theme),
        stat("Cache Usage:", fmt_pct(m.usage_pct),
            format!("({} used)", fmt_blocks(m.used_blocks, bs)),
            theme.ratio_style(m.usage_pct), theme),
        stat("  \u{251c}\u{2500} Reads:", format!("~{}", fmt_blocks(m.est_read_blocks, bs)),
            format!("({} blocks, estimated)", fmt_count(m.est_read_blocks)),
            theme.read_cache, theme),
        stat("  \u{251c}\u{2500} Writes:", format!("~{}", fmt_blocks(m.est_write_blocks, bs)),
            format!("({} blocks, estimated)", fmt_count(m.est_write_blocks)),
            theme.write_cache, theme),
        stat("  \u{2514}\u{2500} Free:", fmt_blocks(m.free_blocks(), bs),
            format!("({} blocks)", fmt_count(m.free_blocks())),
            theme.free, theme),
        stat("Dirty Blocks:", fmt_pct(m.dirty_pct),
            format!("({} dirty)", fmt_blocks(m.dirty_blocks, bs)),
            theme.dirty, theme),
        stat("Hit Ratio:", fmt_pct(m.hit_ratio),
            format!("({} total operations)", fmt_count(m.total_ops())),
            theme.ratio_style(m.hit_ratio), theme),
        stat("Read Hits:", fmt_pct(m.read_hit_ratio),
            format!("({} read operations)", fmt_count(m.read_total)),
            theme.ratio_style(m.read_hit_ratio), theme),
        stat("Write Hits:", fmt_pct(m.write_hit_ratio),
            format!("({} write operations)", fmt_count(m.write_total)),
            theme.ratio_style(m.write_hit_ratio), theme),
    ];
    if let Some(r) = view.rates {
        lines.push(stat("Throughput:", fmt_ops_rate(r.reads_per_sec),
            format!("reads  {} writes", fmt_ops_rate(r.writes_per_sec)),
            theme.text, theme));
    }
    lines
}

fn status_lines(m: &DerivedMetrics, layout: BarLayout, theme: &Theme) -> Vec<Line<'static>> {
    vec![
        heading("Real-time Status:", theme),
        bars::usage_bar(m, layout, theme),
        bars::usage_legend(layout, theme),
        bars::ratio_bar("Dirty Blocks", m.dirty_pct, theme.dirty, layout, theme),
        bars::tiered_bar("Hit Ratio", m.hit_ratio, layout, theme),
        bars::tiered_bar("Read Hits", m.read_hit_ratio, layout, theme),
        bars::tiered_bar("Write Hits", m.write_hit_ratio, layout, theme),
    ]
}

// ── Trends ────────────────────────────────────────────────────────────

/// How many graphs fit in `rows`, and how tall each plot is.
pub fn graph_plan(rows: usize, available: usize) -> (usize, usize) {
    // blank separator above each graph
    let per = |h: usize| h + CHROME_ROWS + 1;
    let count = (rows / per(PREFERRED_GRAPH_HEIGHT)).min(available);
    if count > 0 {
        return (count, PREFERRED_GRAPH_HEIGHT);
    }
    if available > 0 && rows >= per(MIN_GRAPH_HEIGHT) {
        return (1, rows - CHROME_ROWS - 1);
    }
    (0, 0)
}

fn trend_section(
    history: &[DerivedMetrics],
    width: usize,
    rows: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    if history.len() < 2 { return Vec::new(); }

    let graphs: [(&str, Series, Style); 5] = [
        ("Cache Usage Over Time:",     Series::Usage,         theme.graph_usage),
        ("Hit Ratio Over Time:",       Series::HitRatio,      theme.graph_hit),
        ("Read Hit Ratio Over Time:",  Series::ReadHitRatio,  theme.graph_read),
        ("Write Hit Ratio Over Time:", Series::WriteHitRatio, theme.graph_write),
        ("Dirty Blocks Over Time:",    Series::Dirty,         theme.dirty),
    ];

    // Two rows for the section heading and the blank line before it.
    let (count, height) = graph_plan(rows.saturating_sub(2), graphs.len());
    if count == 0 { return Vec::new(); }

    let mut lines = vec![
        Line::from(""),
        heading(&format!("Historical Trends (last {} samples):", history.len()), theme),
    ];
    for (title, series, style) in graphs.iter().take(count) {
        let values: Vec<f64> = history.iter().map(|m| m.series(*series)).collect();
        lines.push(Line::from(""));
        lines.extend(trend::trend_lines(title, &values, width, height, *style, theme));
    }
    lines
}
