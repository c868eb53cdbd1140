use crate::models::metrics::Tier;
use ratatui::style::{Color, Modifier, Style};

// ── Helper: build an Rgb Color from a hex literal ──────────────────────

const fn rgb(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >>  8) & 0xFF) as u8,
        ( hex        & 0xFF) as u8,
    )
}

// ── Theme variant selector ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeVariant {
    Default,
    Dracula,
    Gruvbox,
    Nord,
}

impl ThemeVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Dracula => "Dracula",
            Self::Gruvbox => "Gruvbox",
            Self::Nord    => "Nord",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Default => Self::Dracula,
            Self::Dracula => Self::Gruvbox,
            Self::Gruvbox => Self::Nord,
            Self::Nord    => Self::Default,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::Dracula,
            "gruvbox" => Self::Gruvbox,
            "nord"    => Self::Nord,
            _         => Self::Default,
        }
    }
}

// ── Theme struct ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Theme {
    pub border:      Style,
    pub title:       Style,
    pub text:        Style,
    pub text_dim:    Style,
    pub selected:    Style,
    pub header:      Style,
    pub good:        Style,
    pub moderate:    Style,
    pub poor:        Style,
    /// Pending writeback; never tiered.
    pub dirty:       Style,
    pub read_cache:  Style,
    pub write_cache: Style,
    pub free:        Style,
    pub graph_usage: Style,
    pub graph_hit:   Style,
    pub graph_read:  Style,
    pub graph_write: Style,
    pub footer_bg:   Style,
    pub footer_key:  Style,
    pub footer_text: Style,
}

impl Theme {
    pub fn for_variant(v: ThemeVariant) -> Self {
        match v {
            ThemeVariant::Default => Self::default(),
            ThemeVariant::Dracula => Self::dracula(),
            ThemeVariant::Gruvbox => Self::gruvbox(),
            ThemeVariant::Nord    => Self::nord(),
        }
    }

    pub fn default() -> Self {
        Self {
            border:      Style::default().fg(Color::DarkGray),
            title:       Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            text:        Style::default().fg(Color::White),
            text_dim:    Style::default().fg(Color::DarkGray),
            selected:    Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            header:      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            good:        Style::default().fg(Color::LightGreen),
            moderate:    Style::default().fg(Color::LightYellow),
            poor:        Style::default().fg(Color::LightRed),
            dirty:       Style::default().fg(Color::LightBlue),
            read_cache:  Style::default().fg(Color::LightGreen),
            write_cache: Style::default().fg(Color::LightRed),
            free:        Style::default().fg(Color::DarkGray),
            graph_usage: Style::default().fg(Color::LightGreen),
            graph_hit:   Style::default().fg(Color::LightBlue),
            graph_read:  Style::default().fg(Color::LightCyan),
            graph_write: Style::default().fg(Color::LightYellow),
            footer_bg:   Style::default().bg(Color::DarkGray).fg(Color::White),
            footer_key:  Style::default().bg(Color::DarkGray).fg(Color::Cyan).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(Color::DarkGray).fg(Color::Gray),
        }
    }

    fn dracula() -> Self {
        // https://draculatheme.com/
        // bg: #282a36  current-line: #44475a  comment: #6272a4  fg: #f8f8f2
        // cyan: #8be9fd  green: #50fa7b  yellow: #f1fa8c  orange: #ffb86c
        // pink: #ff79c6  purple: #bd93f9  red: #ff5555
        Self {
            border:      Style::default().fg(rgb(0x6272a4)),
            title:       Style::default().fg(rgb(0xf8f8f2)).add_modifier(Modifier::BOLD),
            text:        Style::default().fg(rgb(0xf8f8f2)),
            text_dim:    Style::default().fg(rgb(0x6272a4)),
            selected:    Style::default().fg(rgb(0xff79c6)).add_modifier(Modifier::BOLD),
            header:      Style::default().fg(rgb(0xf8f8f2)).bg(rgb(0x44475a)).add_modifier(Modifier::BOLD),
            good:        Style::default().fg(rgb(0x50fa7b)),
            moderate:    Style::default().fg(rgb(0xf1fa8c)),
            poor:        Style::default().fg(rgb(0xff5555)),
            dirty:       Style::default().fg(rgb(0xbd93f9)),
            read_cache:  Style::default().fg(rgb(0x50fa7b)),
            write_cache: Style::default().fg(rgb(0xffb86c)),
            free:        Style::default().fg(rgb(0x44475a)),
            graph_usage: Style::default().fg(rgb(0x50fa7b)),
            graph_hit:   Style::default().fg(rgb(0xbd93f9)),
            graph_read:  Style::default().fg(rgb(0x8be9fd)),
            graph_write: Style::default().fg(rgb(0xffb86c)),
            footer_bg:   Style::default().bg(rgb(0x44475a)).fg(rgb(0xf8f8f2)),
            footer_key:  Style::default().bg(rgb(0x44475a)).fg(rgb(0xbd93f9)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x44475a)).fg(rgb(0x6272a4)),
        }
    }

    fn gruvbox() -> Self {
        // https://github.com/morhetz/gruvbox
        // bg1: #3c3836  bg2: #504945  fg1: #ebdbb2  fg4: #a89984
        // red: #fb4934  green: #b8bb26  yellow: #fabd2f  blue: #83a598
        // purple: #d3869b  aqua: #8ec07c  orange: #fe8019
        Self {
            border:      Style::default().fg(rgb(0x504945)),
            title:       Style::default().fg(rgb(0xebdbb2)).add_modifier(Modifier::BOLD),
            text:        Style::default().fg(rgb(0xebdbb2)),
            text_dim:    Style::default().fg(rgb(0xa89984)),
            selected:    Style::default().fg(rgb(0xd79921)).add_modifier(Modifier::BOLD),
            header:      Style::default().fg(rgb(0xebdbb2)).bg(rgb(0x504945)).add_modifier(Modifier::BOLD),
            good:        Style::default().fg(rgb(0xb8bb26)),
            moderate:    Style::default().fg(rgb(0xfabd2f)),
            poor:        Style::default().fg(rgb(0xfb4934)),
            dirty:       Style::default().fg(rgb(0x83a598)),
            read_cache:  Style::default().fg(rgb(0xb8bb26)),
            write_cache: Style::default().fg(rgb(0xfe8019)),
            free:        Style::default().fg(rgb(0x504945)),
            graph_usage: Style::default().fg(rgb(0xb8bb26)),
            graph_hit:   Style::default().fg(rgb(0xd3869b)),
            graph_read:  Style::default().fg(rgb(0x8ec07c)),
            graph_write: Style::default().fg(rgb(0xfe8019)),
            footer_bg:   Style::default().bg(rgb(0x3c3836)).fg(rgb(0xebdbb2)),
            footer_key:  Style::default().bg(rgb(0x3c3836)).fg(rgb(0x83a598)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x3c3836)).fg(rgb(0xa89984)),
        }
    }

    fn nord() -> Self {
        // https://www.nordtheme.com/
        // Polar Night: #2e3440 #3b4252 #434c5e #4c566a
        // Snow Storm:  #d8dee9 #e5e9f0 #eceff4
        // Frost:       #8fbcbb #88c0d0 #81a1c1 #5e81ac
        // Aurora:      #bf616a #d08770 #ebcb8b #a3be8c #b48ead
        Self {
            border:      Style::default().fg(rgb(0x4c566a)),
            title:       Style::default().fg(rgb(0xeceff4)).add_modifier(Modifier::BOLD),
            text:        Style::default().fg(rgb(0xe5e9f0)),
            text_dim:    Style::default().fg(rgb(0x4c566a)),
            selected:    Style::default().fg(rgb(0x88c0d0)).add_modifier(Modifier::BOLD),
            header:      Style::default().fg(rgb(0xeceff4)).bg(rgb(0x3b4252)).add_modifier(Modifier::BOLD),
            good:        Style::default().fg(rgb(0xa3be8c)),
            moderate:    Style::default().fg(rgb(0xebcb8b)),
            poor:        Style::default().fg(rgb(0xbf616a)),
            dirty:       Style::default().fg(rgb(0x5e81ac)),
            read_cache:  Style::default().fg(rgb(0xa3be8c)),
            write_cache: Style::default().fg(rgb(0xd08770)),
            free:        Style::default().fg(rgb(0x434c5e)),
            graph_usage: Style::default().fg(rgb(0xa3be8c)),
            graph_hit:   Style::default().fg(rgb(0xb48ead)),
            graph_read:  Style::default().fg(rgb(0x8fbcbb)),
            graph_write: Style::default().fg(rgb(0xebcb8b)),
            footer_bg:   Style::default().bg(rgb(0x3b4252)).fg(rgb(0xd8dee9)),
            footer_key:  Style::default().bg(rgb(0x3b4252)).fg(rgb(0x88c0d0)).add_modifier(Modifier::BOLD),
            footer_text: Style::default().bg(rgb(0x3b4252)).fg(rgb(0x4c566a)),
        }
    }

    pub fn tier_style(&self, tier: Tier) -> Style {
        match tier {
            Tier::Good     => self.good,
            Tier::Moderate => self.moderate,
            Tier::Poor     => self.poor,
        }
    }

    /// Tier colour for a 0–100 ratio.
    pub fn ratio_style(&self, ratio: f64) -> Style {
        self.tier_style(Tier::of(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_cycle_back_to_default() {
        let mut v = ThemeVariant::Default;
        for _ in 0..4 { v = v.next(); }
        assert_eq!(v, ThemeVariant::Default);
        assert_eq!(ThemeVariant::from_name("NORD"), ThemeVariant::Nord);
        assert_eq!(ThemeVariant::from_name("solarized"), ThemeVariant::Default);
    }

    #[test]
    fn tiers_map_to_distinct_styles() {
        let t = Theme::default();
        assert_eq!(t.ratio_style(95.0), t.good);
        assert_eq!(t.ratio_style(70.0), t.moderate);
        assert_eq!(t.ratio_style(10.0), t.poor);
        assert_ne!(t.good, t.poor);
        assert_ne!(t.dirty, t.good);
    }
}
