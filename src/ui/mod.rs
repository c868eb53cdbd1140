pub mod bars;
pub mod dashboard;
pub mod footer;
pub mod picker;
pub mod theme;
pub mod trend;
