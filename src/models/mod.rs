pub mod metrics;
pub mod sample;
pub mod volume;
