pub mod cache_stats;
pub mod discovery;
pub mod lvm;
