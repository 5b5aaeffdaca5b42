//! Balance aggregation, settlement planning and the summary boundary.

pub mod aggregator;
pub mod planner;
pub mod summary;
