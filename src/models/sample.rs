use crate::models::volume::CacheMode;
use chrono::{DateTime, Local};
use serde::Serialize;

/// One raw reading of a cache volume's counters, taken by a single `lvs` call.
///
/// Hit/total counters are cumulative since the cache was activated. A `Sample`
/// is only ever built by the parser, which guarantees
/// `used_blocks <= total_blocks` and `dirty_blocks <= used_blocks`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp:    DateTime<Local>,
    pub total_blocks: u64,
    pub used_blocks:  u64,
    pub dirty_blocks: u64,
    pub read_hits:    u64,
    pub read_total:   u64,
    pub write_hits:   u64,
    pub write_total:  u64,
    /// Mode as reported by this query; may differ from startup after `lvchange --cachemode`.
    pub mode:         CacheMode,
    pub block_size:   u64,
}

impl Sample {
    pub fn read_misses(&self) -> u64 { self.read_total.saturating_sub(self.read_hits) }
    pub fn write_misses(&self) -> u64 { self.write_total.saturating_sub(self.write_hits) }
    pub fn pool_bytes(&self) -> u64 { self.total_blocks.saturating_mul(self.block_size) }
}
