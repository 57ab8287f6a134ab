//! Benchmark support crate for netgauge.
//!
//! Provides seeded synthetic graphs and parameter types used by the Criterion
//! benchmarks for metric computation and the full per-file pipeline.

pub mod error;
pub mod params;
pub mod source;
