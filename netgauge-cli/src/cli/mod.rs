//! Command-line interface orchestration for netgauge.
//!
//! The `analyze` command runs the metrics pipeline over one or more edge-list
//! files, optionally writes GML and sample artifacts, and renders a report.

mod commands;
mod render;

pub use commands::{
    AnalysisSummary, AnalyzeCommand, Artifact, ArtifactKind, Cli, CliError, Command, OutputFormat,
    run_cli,
};
pub use render::{format_metric, render_summary};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
