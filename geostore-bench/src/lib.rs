//! geostore Benchmark Library
//!
//! Provides the configuration, data generators and index factories shared by
//! the store, index and concurrency benchmarks.

pub mod config;
pub mod data_gen;
pub mod indexes;
