pub mod analytics;
pub mod simulate;
pub mod waterfall;
