//! Random scenario generation for testing and benchmarking.

pub mod scenario;
