//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests write edge lists into temporary directories and drive
//! the `analyze` command directly. These helpers keep the cases concise.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use netgauge_core::{DEFAULT_BETWEENNESS_SAMPLES, DEFAULT_EIGENVECTOR_MAX_ITER, DEFAULT_SAMPLE_SIZE};
use tempfile::TempDir;

use super::{AnalysisSummary, AnalyzeCommand, Cli, CliError, Command, OutputFormat, run_cli};

pub(super) const TRIANGLE: &str = "1 2\n2 3\n3 1\n";
pub(super) const PATH4: &str = "1 2\n2 3\n3 4\n";
pub(super) const MALFORMED: &str = "1 2\nfoo bar\n";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// An `analyze` command over `files` with default options and a fixed seed.
pub(super) fn analyze_command(files: Vec<PathBuf>) -> AnalyzeCommand {
    AnalyzeCommand {
        files,
        gml_dir: None,
        sample_dir: None,
        compare: Vec::new(),
        format: OutputFormat::Human,
        betweenness_samples: DEFAULT_BETWEENNESS_SAMPLES,
        eigenvector_max_iter: DEFAULT_EIGENVECTOR_MAX_ITER,
        sample_size: DEFAULT_SAMPLE_SIZE,
        seed: Some(7),
    }
}

pub(super) fn run_analyze_cli(command: AnalyzeCommand) -> Result<AnalysisSummary, CliError> {
    run_cli(Cli {
        command: Command::Analyze(command),
    })
}

pub(super) fn run_cli_expecting_error(command: AnalyzeCommand, panic_msg: &str) -> CliError {
    match run_analyze_cli(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn render_to_string(summary: &AnalysisSummary) -> io::Result<String> {
    let mut buffer = Vec::new();
    super::render_summary(summary, &mut buffer)?;
    String::from_utf8(buffer).map_err(io::Error::other)
}
