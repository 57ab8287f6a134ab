//! Support library for the netgauge CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and integration
//! tests can exercise them without forking a subprocess.

pub mod cli;
pub mod logging;
