use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ── Cache mode ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    Writeback,
    Writethrough,
    Passthrough,
}

impl CacheMode {
    pub fn label(&self) -> &'static str {
        match self {
            CacheMode::Writeback    => "writeback",
            CacheMode::Writethrough => "writethrough",
            CacheMode::Passthrough  => "passthrough",
        }
    }
}

impl FromStr for CacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "writeback"    => Ok(CacheMode::Writeback),
            "writethrough" => Ok(CacheMode::Writethrough),
            "passthrough"  => Ok(CacheMode::Passthrough),
            other          => Err(format!("unknown cache mode {:?}", other)),
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Volume ───────────────────────────────────────────────────────────

/// A cache-backed logical volume. Resolved once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeDescriptor {
    pub vg_name:    String,
    pub lv_name:    String,
    pub mode:       CacheMode,
    /// Cache chunk size in bytes (one "block" in the counters).
    pub block_size: u64,
}

impl VolumeDescriptor {
    /// `vg/lv`, the form `lvs` accepts as a volume argument.
    pub fn path(&self) -> String {
        format!("{}/{}", self.vg_name, self.lv_name)
    }
}

impl fmt::Display for VolumeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vg_name, self.lv_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lvs_mode_names() {
        assert_eq!("writeback".parse::<CacheMode>(), Ok(CacheMode::Writeback));
        assert_eq!(" writethrough ".parse::<CacheMode>(), Ok(CacheMode::Writethrough));
        assert_eq!("passthrough".parse::<CacheMode>(), Ok(CacheMode::Passthrough));
        assert!("".parse::<CacheMode>().is_err());
        assert!("writearound".parse::<CacheMode>().is_err());
    }

    #[test]
    fn path_joins_group_and_volume() {
        let v = VolumeDescriptor {
            vg_name: "vg_games".into(), lv_name: "games".into(),
            mode: CacheMode::Writeback, block_size: 65536,
        };
        assert_eq!(v.path(), "vg_games/games");
        assert_eq!(v.to_string(), "vg_games/games");
    }
}
