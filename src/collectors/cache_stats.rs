use crate::collectors::lvm::{split_record, LvmQuery};
use crate::error::CacheError;
use crate::models::sample::Sample;
use crate::models::volume::{CacheMode, VolumeDescriptor};
use chrono::{DateTime, Local};

/// Field order of the stats query. Parsing depends on it.
const FIELDS: [&str; 9] = [
    "cache_total_blocks",
    "cache_used_blocks",
    "cache_dirty_blocks",
    "cache_read_hits",
    "cache_read_misses",
    "cache_write_hits",
    "cache_write_misses",
    "cache_mode",
    "chunk_size",
];

/// Take one reading of `volume`'s cache counters. Blocks on `lvs`.
pub fn sample<Q: LvmQuery>(q: &Q, volume: &VolumeDescriptor) -> Result<Sample, CacheError> {
    let fields = FIELDS.join(",");
    let target = volume.path();
    let out = q.lvs(&["-o", &fields, &target])?;
    parse_stats(&out, Local::now())
}

/// Parse the single-record output of the stats query.
pub fn parse_stats(output: &str, timestamp: DateTime<Local>) -> Result<Sample, CacheError> {
    let records: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let line = match records.as_slice() {
        [one] => *one,
        []    => return Err(CacheError::Parse("lvs returned no record".into())),
        many  => return Err(CacheError::Parse(format!("expected 1 record, got {}", many.len()))),
    };

    let f = split_record(line);
    if f.len() != FIELDS.len() {
        return Err(CacheError::Parse(
            format!("expected {} fields, got {}: {:?}", FIELDS.len(), f.len(), line.trim())));
    }

    let num = |i: usize| -> Result<u64, CacheError> {
        f[i].parse::<u64>().map_err(|_| CacheError::Parse(
            format!("{} is not a non-negative integer: {:?}", FIELDS[i], f[i])))
    };

    let total_blocks = num(0)?;
    let used_blocks  = num(1)?;
    let dirty_blocks = num(2)?;
    let read_hits    = num(3)?;
    let read_misses  = num(4)?;
    let write_hits   = num(5)?;
    let write_misses = num(6)?;
    let mode: CacheMode = f[7].parse().map_err(CacheError::Parse)?;
    let block_size   = num(8)?;

    if used_blocks > total_blocks {
        return Err(CacheError::Parse(
            format!("used blocks {} exceed total blocks {}", used_blocks, total_blocks)));
    }
    if dirty_blocks > used_blocks {
        return Err(CacheError::Parse(
            format!("dirty blocks {} exceed used blocks {}", dirty_blocks, used_blocks)));
    }

    let overflow = || CacheError::Parse("operation counters overflow".into());
    Ok(Sample {
        timestamp,
        total_blocks,
        used_blocks,
        dirty_blocks,
        read_hits,
        read_total:  read_hits.checked_add(read_misses).ok_or_else(overflow)?,
        write_hits,
        write_total: write_hits.checked_add(write_misses).ok_or_else(overflow)?,
        mode,
        block_size,
    })
}
