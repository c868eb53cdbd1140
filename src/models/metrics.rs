use crate::models::sample::Sample;
use crate::models::volume::CacheMode;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Figures derived from one [`Sample`].
///
/// `est_read_blocks` / `est_write_blocks` are an **estimate**: dm-cache does not
/// report which occupied blocks were promoted by reads and which by writes. The
/// occupied blocks are split in proportion to the read/write operation counts
/// seen so far, so the split is a policy, not a measurement, and must be shown
/// as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub timestamp:       DateTime<Local>,
    pub mode:            CacheMode,
    pub total_blocks:    u64,
    pub used_blocks:     u64,
    pub dirty_blocks:    u64,
    pub block_size:      u64,
    pub read_total:      u64,
    pub write_total:     u64,
    pub usage_pct:       f64,
    pub dirty_pct:       f64,
    pub hit_ratio:       f64,
    pub read_hit_ratio:  f64,
    pub write_hit_ratio: f64,
    pub est_read_blocks:  u64,
    pub est_write_blocks: u64,
}

impl DerivedMetrics {
    pub fn free_blocks(&self) -> u64 {
        self.total_blocks - self.est_read_blocks - self.est_write_blocks
    }

    pub fn total_ops(&self) -> u64 { self.read_total.saturating_add(self.write_total) }

    /// Value of one graphable series.
    pub fn series(&self, s: Series) -> f64 {
        match s {
            Series::Usage         => self.usage_pct,
            Series::Dirty         => self.dirty_pct,
            Series::HitRatio      => self.hit_ratio,
            Series::ReadHitRatio  => self.read_hit_ratio,
            Series::WriteHitRatio => self.write_hit_ratio,
        }
    }
}

/// Percentage series a trend graph can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Usage,
    Dirty,
    HitRatio,
    ReadHitRatio,
    WriteHitRatio,
}

/// `part / whole * 100`, clamped to [0, 100]; 0 when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 { return 0.0; }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

/// Hit ratio in percent; 0 when no operations have been seen.
pub fn hit_ratio(hits: u64, total: u64) -> f64 {
    percent(hits, total)
}

/// Derive percentages, hit ratios and the estimated read/write occupancy split.
pub fn derive(sample: &Sample) -> DerivedMetrics {
    let ops = sample.read_total.saturating_add(sample.write_total);
    let read_fraction = if ops == 0 {
        0.5
    } else {
        sample.read_total as f64 / ops as f64
    };

    let est_read_blocks = ((sample.used_blocks as f64 * read_fraction).round() as u64)
        .min(sample.used_blocks);
    // Subtraction keeps read + write == used exactly.
    let est_write_blocks = sample.used_blocks - est_read_blocks;

    DerivedMetrics {
        timestamp:       sample.timestamp,
        mode:            sample.mode,
        total_blocks:    sample.total_blocks,
        used_blocks:     sample.used_blocks,
        dirty_blocks:    sample.dirty_blocks,
        block_size:      sample.block_size,
        read_total:      sample.read_total,
        write_total:     sample.write_total,
        usage_pct:       percent(sample.used_blocks, sample.total_blocks),
        dirty_pct:       percent(sample.dirty_blocks, sample.total_blocks),
        hit_ratio:       hit_ratio(sample.read_hits.saturating_add(sample.write_hits), ops),
        read_hit_ratio:  hit_ratio(sample.read_hits, sample.read_total),
        write_hit_ratio: hit_ratio(sample.write_hits, sample.write_total),
        est_read_blocks,
        est_write_blocks,
    }
}

// ── Performance tier ─────────────────────────────────────────────────

/// Colour class for a 0–100 ratio, independent of any actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Moderate,
    Poor,
}

impl Tier {
    pub fn of(ratio: f64) -> Self {
        if ratio >= 80.0      { Tier::Good }
        else if ratio >= 60.0 { Tier::Moderate }
        else                  { Tier::Poor }
    }
}

// ── Operation rates ──────────────────────────────────────────────────

/// Reads/writes per second between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IoRates {
    pub reads_per_sec:  f64,
    pub writes_per_sec: f64,
}

/// `None` on a zero/negative interval or when a counter went backwards
/// (cache reactivated, counters reset).
pub fn rates(prev: &Sample, cur: &Sample) -> Option<IoRates> {
    let elapsed = (cur.timestamp - prev.timestamp).num_milliseconds();
    if elapsed <= 0 { return None; }
    let reads  = cur.read_total.checked_sub(prev.read_total)?;
    let writes = cur.write_total.checked_sub(prev.write_total)?;
    let secs = elapsed as f64 / 1000.0;
    Some(IoRates {
        reads_per_sec:  reads as f64 / secs,
        writes_per_sec: writes as f64 / secs,
    })
}
