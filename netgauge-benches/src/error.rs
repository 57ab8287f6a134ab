//! Benchmark setup error type.

use crate::source::SyntheticError;
use netgauge_core::NetgaugeError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic graph generation failed.
    #[error("synthetic graph generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Analyzer configuration or analysis failed.
    #[error("netgauge operation failed: {0}")]
    Netgauge(#[from] NetgaugeError),
}
