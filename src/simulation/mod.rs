//! Synthetic data for stress testing and benchmarks.

pub mod random_group;
