use crate::ui::theme::ThemeVariant;
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub volume: VolumeConfig,

    #[serde(default)]
    pub lvm: LvmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seconds between samples
    pub interval_secs: f64,
    /// Samples kept for the trend graphs
    pub history_depth: usize,
    /// default, dracula, gruvbox, nord
    pub theme: String,
}

/// Volume to monitor when none is given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub vg: Option<String>,
    pub lv: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LvmConfig {
    #[serde(default)]
    pub sudo: SudoPolicy,
}

/// Whether `lvs` runs through `sudo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudoPolicy {
    /// Only when not already root
    #[default]
    Auto,
    Always,
    Never,
}

impl SudoPolicy {
    pub fn use_sudo(&self) -> bool {
        match self {
            SudoPolicy::Auto   => !nix::unistd::Uid::effective().is_root(),
            SudoPolicy::Always => true,
            SudoPolicy::Never  => false,
        }
    }
}

// ── Defaults ─────────────────────────────────────────────────────────

pub const DEFAULT_INTERVAL_SECS: f64 = 2.0;
pub const DEFAULT_HISTORY_DEPTH: usize = 60;

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            theme:         "default".into(),
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        let Some(path) = Config::config_path() else { return Config::default() };
        if !path.exists() {
            // Write defaults on first run (best-effort)
            let _ = try_write_defaults(&path);
            return Config::default();
        }
        match Config::load_from(&path) {
            Ok(c)  => c,
            Err(e) => {
                warn!("ignoring {}: {:#}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cachetop").join("cachetop.toml"))
    }
}

fn try_write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# cachetop configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}

// ── Resolved settings ────────────────────────────────────────────────

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub vg:       Option<String>,
    pub lv:       Option<String>,
    pub interval: Option<f64>,
    pub history:  Option<usize>,
    pub pick:     bool,
    pub theme:    Option<String>,
}

/// A volume named by the operator, not yet checked against LVM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRef {
    pub vg: String,
    pub lv: String,
}

/// Everything the monitor needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub volume:        Option<VolumeRef>,
    pub interval:      Duration,
    pub history_depth: usize,
    pub force_pick:    bool,
    pub theme:         ThemeVariant,
    pub sudo:          SudoPolicy,
}

/// `None` for zero, negative, NaN, or more seconds than a `Duration` holds.
fn interval_from_secs(secs: f64) -> Option<Duration> {
    if secs > 0.0 { Duration::try_from_secs_f64(secs).ok() } else { None }
}

impl Settings {
    pub fn resolve(cfg: &Config, o: Overrides) -> Self {
        let vg = o.vg.or_else(|| cfg.volume.vg.clone());
        let lv = o.lv.or_else(|| cfg.volume.lv.clone());
        let volume = match (vg, lv) {
            (Some(vg), Some(lv)) => Some(VolumeRef { vg, lv }),
            (None, None) => None,
            (vg, lv) => {
                warn!("volume needs both vg and lv (got vg={:?} lv={:?}), auto-detecting", vg, lv);
                None
            }
        };

        let interval = o.interval.and_then(interval_from_secs)
            .or_else(|| interval_from_secs(cfg.general.interval_secs))
            .unwrap_or(Duration::from_secs_f64(DEFAULT_INTERVAL_SECS));

        let history_depth = o.history
            .filter(|n| *n > 0)
            .or(Some(cfg.general.history_depth).filter(|n| *n > 0))
            .unwrap_or(DEFAULT_HISTORY_DEPTH);

        let theme = o.theme.as_deref().unwrap_or(&cfg.general.theme);

        Self {
            volume,
            interval,
            history_depth,
            force_pick: o.pick,
            theme: ThemeVariant::from_name(theme),
            sudo: cfg.lvm.sudo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.general.interval_secs, 2.0);
        assert_eq!(cfg.general.history_depth, 60);
        assert_eq!(cfg.lvm.sudo, SudoPolicy::Auto);
        assert!(cfg.volume.vg.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = toml::from_str("[general]\nhistory_depth = 120\n\n[lvm]\nsudo = \"never\"\n").unwrap();
        assert_eq!(cfg.general.history_depth, 120);
        assert_eq!(cfg.general.interval_secs, 2.0);
        assert_eq!(cfg.general.theme, "default");
        assert_eq!(cfg.lvm.sudo, SudoPolicy::Never);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[volume]\nvg = \"vg_games\"\nlv = \"games\"\n\n[general]\ninterval_secs = 0.5").unwrap();
        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.volume.vg.as_deref(), Some("vg_games"));
        assert_eq!(cfg.general.interval_secs, 0.5);
    }

    #[test]
    fn bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\ninterval_secs = \"soon\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.general.history_depth, DEFAULT_HISTORY_DEPTH);
    }

    #[test]
    fn flags_beat_file() {
        let mut cfg = Config::default();
        cfg.volume.vg = Some("file_vg".into());
        cfg.volume.lv = Some("file_lv".into());
        cfg.general.interval_secs = 5.0;

        let s = Settings::resolve(&cfg, Overrides {
            vg: Some("cli_vg".into()),
            interval: Some(1.0),
            history: Some(10),
            pick: true,
            ..Default::default()
        });
        assert_eq!(s.volume, Some(VolumeRef { vg: "cli_vg".into(), lv: "file_lv".into() }));
        assert_eq!(s.interval, Duration::from_secs(1));
        assert_eq!(s.history_depth, 10);
        assert!(s.force_pick);
    }

    #[test]
    fn half_a_volume_means_autodetect() {
        let s = Settings::resolve(&Config::default(), Overrides {
            vg: Some("vg0".into()),
            ..Default::default()
        });
        assert!(s.volume.is_none());
    }

    #[test]
    fn non_positive_values_fall_back() {
        let mut cfg = Config::default();
        cfg.general.history_depth = 0;
        let s = Settings::resolve(&cfg, Overrides {
            interval: Some(0.0),
            history: Some(0),
            ..Default::default()
        });
        assert_eq!(s.interval, Duration::from_secs(2));
        assert_eq!(s.history_depth, 60);
    }

    #[test]
    fn oversized_interval_falls_back() {
        let mut cfg = Config::default();
        cfg.general.interval_secs = 5.0;
        let s = Settings::resolve(&cfg, Overrides { interval: Some(1e30), ..Default::default() });
        assert_eq!(s.interval, Duration::from_secs(5));

        cfg.general.interval_secs = 1e30;
        let s = Settings::resolve(&cfg, Overrides::default());
        assert_eq!(s.interval, Duration::from_secs(2));

        let s = Settings::resolve(&cfg, Overrides { interval: Some(f64::NAN), ..Default::default() });
        assert_eq!(s.interval, Duration::from_secs(2));
    }
}
