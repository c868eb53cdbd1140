use crate::collectors::lvm::{split_record, LvmQuery};
use crate::error::CacheError;
use crate::models::volume::{CacheMode, VolumeDescriptor};
use log::{debug, warn};

const FIELDS: &str = "vg_name,lv_name,cache_mode,chunk_size";

/// List every cache-backed LV, in the order `lvs` reports them.
pub fn discover<Q: LvmQuery>(q: &Q) -> Result<Vec<VolumeDescriptor>, CacheError> {
    let out = q.lvs(&["-o", FIELDS]).map_err(|e| match e {
        CacheError::Query(msg) => CacheError::Discovery(msg),
        other => other,
    })?;

    let volumes: Vec<VolumeDescriptor> = out.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(parse_volume)
        .collect();

    if volumes.is_empty() {
        return Err(CacheError::Discovery("no LVM cache volumes found".into()));
    }
    debug!("discovered {} cache volume(s)", volumes.len());
    Ok(volumes)
}

/// Look up one named LV and confirm it has a cache attached.
pub fn describe<Q: LvmQuery>(q: &Q, vg: &str, lv: &str) -> Result<VolumeDescriptor, CacheError> {
    let target = format!("{}/{}", vg, lv);
    let out = q.lvs(&["-o", FIELDS, &target])?;
    out.lines()
        .filter(|l| !l.trim().is_empty())
        .find_map(parse_volume)
        .ok_or_else(|| CacheError::Discovery(
            format!("{} does not appear to have a cache configured", target)))
}

/// `None` for rows without a cache mode (plain LVs) or with an unexpected shape.
fn parse_volume(line: &str) -> Option<VolumeDescriptor> {
    let f = split_record(line);
    if f.len() != 4 {
        warn!("skipping lvs row with {} fields: {:?}", f.len(), line.trim());
        return None;
    }
    if f[2].is_empty() { return None; }
    let mode: CacheMode = match f[2].parse() {
        Ok(m) => m,
        Err(e) => {
            warn!("skipping {}/{}: {}", f[0], f[1], e);
            return None;
        }
    };
    let block_size: u64 = match f[3].parse() {
        Ok(b) if b > 0 => b,
        _ => {
            warn!("skipping {}/{}: bad chunk size {:?}", f[0], f[1], f[3]);
            return None;
        }
    };
    Some(VolumeDescriptor {
        vg_name:    f[0].to_string(),
        lv_name:    f[1].to_string(),
        mode,
        block_size,
    })
}
