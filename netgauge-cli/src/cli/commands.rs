//! Command implementations and argument parsing for the netgauge CLI.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use netgauge_core::{
    AnalyzerBuilder, ComparisonTable, DEFAULT_BETWEENNESS_SAMPLES, DEFAULT_EIGENVECTOR_MAX_ITER,
    DEFAULT_SAMPLE_SIZE, FileOutcome, GmlError, GraphReport, MetricKind, NetgaugeError,
    render_sample_dot, write_gml,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "netgauge",
    about = "Compute network-science metrics for undirected edge lists."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Analyze one or more edge-list files.
    Analyze(AnalyzeCommand),
}

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text tables.
    #[default]
    Human,
    /// A single JSON document.
    Json,
}

/// Options accepted by the `analyze` command.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeCommand {
    /// Edge-list files, processed in the order given.
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Directory receiving one GML file per analyzed input.
    #[arg(long = "gml-dir")]
    pub gml_dir: Option<PathBuf>,

    /// Directory receiving one Graphviz sample per analyzed input.
    #[arg(long = "sample-dir")]
    pub sample_dir: Option<PathBuf>,

    /// Metric to include in the bar comparison; repeat for several.
    /// Accepts labels such as `"Avg Degree"` or ids such as `avg-degree`.
    #[arg(long = "compare", value_name = "METRIC")]
    pub compare: Vec<MetricKind>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Source nodes sampled for betweenness centrality.
    #[arg(long = "betweenness-samples", default_value_t = DEFAULT_BETWEENNESS_SAMPLES)]
    pub betweenness_samples: usize,

    /// Power-iteration cap for eigenvector centrality.
    #[arg(long = "eigenvector-max-iter", default_value_t = DEFAULT_EIGENVECTOR_MAX_ITER)]
    pub eigenvector_max_iter: usize,

    /// Nodes kept in each visual sample.
    #[arg(long = "sample-size", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Seed for the betweenness sampler.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an artifact failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Serialising a GML artifact failed.
    #[error("failed to write GML to `{path}`: {source}")]
    Gml {
        /// Destination path.
        path: PathBuf,
        /// Underlying serialiser error.
        #[source]
        source: GmlError,
    },
    /// Core configuration or analysis failed.
    #[error(transparent)]
    Core(#[from] NetgaugeError),
}

/// What an artifact file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// GML export of the reduced network.
    Gml,
    /// Graphviz rendering of the sample.
    SampleDot,
}

/// A file written next to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Input the artifact was derived from.
    pub source: String,
    /// Artifact content.
    pub kind: ArtifactKind,
    /// Where it was written.
    pub path: PathBuf,
}

/// Summarises the outcome of an `analyze` run.
#[derive(Debug)]
pub struct AnalysisSummary {
    /// Per-input outcomes in input order.
    pub outcomes: Vec<FileOutcome>,
    /// Comparison across inputs, present when two or more succeeded.
    pub comparison: Option<ComparisonTable>,
    /// Metrics selected for the bar comparison.
    pub compare: Vec<MetricKind>,
    /// Files written during the run.
    pub artifacts: Vec<Artifact>,
    /// Requested report format.
    pub format: OutputFormat,
}

impl AnalysisSummary {
    /// Number of inputs that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded())
            .count()
    }

    /// Whether every input produced a report.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Executes the CLI command represented by `cli`.
///
/// Per-input failures are recorded in the summary rather than returned.
///
/// # Errors
/// Returns [`CliError`] when the configuration is invalid or an artifact
/// cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use netgauge_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let path = dir.path().join("triangle.txt");
/// std::fs::write(&path, "1 2\n2 3\n3 1\n")?;
/// let path = path.to_str().ok_or("temporary path is not UTF-8")?;
/// let cli = Cli::try_parse_from(["netgauge", "analyze", "--seed", "1", path])?;
/// let summary = run_cli(cli)?;
/// assert!(summary.all_succeeded());
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<AnalysisSummary, CliError> {
    match cli.command {
        Command::Analyze(analyze) => {
            Span::current().record("command", field::display("analyze"));
            run_analyze(analyze)
        }
    }
}

#[instrument(
    name = "cli.analyze",
    err,
    skip(command),
    fields(files = command.files.len(), failed = field::Empty),
)]
pub(super) fn run_analyze(command: AnalyzeCommand) -> Result<AnalysisSummary, CliError> {
    let mut builder = AnalyzerBuilder::new()
        .with_betweenness_samples(command.betweenness_samples)
        .with_eigenvector_max_iter(command.eigenvector_max_iter)
        .with_sample_size(command.sample_size);
    if let Some(seed) = command.seed {
        builder = builder.with_seed(seed);
    }
    let analyzer = builder.build()?;

    let names = unique_input_names(&command.files);
    let inputs = command.files.iter().zip(names).map(|(path, name)| {
        let reader = File::open(path).map(BufReader::new);
        (name, reader)
    });
    let outcomes = analyzer.analyze_batch(inputs, |progress| {
        info!(
            completed = progress.completed,
            total = progress.total,
            fraction = progress.fraction(),
            "progress"
        );
    });

    let mut artifacts = Vec::new();
    let mut claimed = HashSet::new();
    for report in outcomes.iter().filter_map(|outcome| outcome.result.as_ref().ok()) {
        if let Some(dir) = &command.gml_dir {
            let path = claim_path(&mut claimed, dir, report.gml_file_name());
            artifacts.push(write_gml_artifact(path, report)?);
        }
        if let Some(dir) = &command.sample_dir {
            let path = claim_path(&mut claimed, dir, sample_file_name(&report.name));
            artifacts.push(write_sample_artifact(path, report)?);
        }
    }

    let comparison = ComparisonTable::from_outcomes(&outcomes);
    let summary = AnalysisSummary {
        outcomes,
        comparison,
        compare: command.compare,
        artifacts,
        format: command.format,
    };
    Span::current().record("failed", summary.failed_count());
    Ok(summary)
}

/// File name used to key an input in reports.
pub(super) fn input_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Report keys for `paths`: each file name, numbered from `-2` onwards when
/// an earlier input already used it.
pub(super) fn unique_input_names(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    paths
        .iter()
        .map(|path| claim_name(input_name(path), |name| taken.insert(name.to_owned())))
        .collect()
}

/// Inserts `-{n}` before the first extension of `name`.
pub(super) fn numbered_name(name: &str, n: usize) -> String {
    match name.find('.') {
        Some(dot) if dot > 0 => {
            let (stem, rest) = name.split_at(dot);
            format!("{stem}-{n}{rest}")
        }
        _ => format!("{name}-{n}"),
    }
}

/// Returns `name`, or the first numbered variant `is_free` accepts.
fn claim_name(name: String, mut is_free: impl FnMut(&str) -> bool) -> String {
    if is_free(&name) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = numbered_name(&name, n);
        if is_free(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Reserves an artifact path in `dir` that no earlier artifact of this run
/// has used.
fn claim_path(claimed: &mut HashSet<PathBuf>, dir: &Path, name: String) -> PathBuf {
    let name = claim_name(name, |candidate| claimed.insert(dir.join(candidate)));
    dir.join(name)
}

/// File name of the Graphviz sample for input `name`.
pub(super) fn sample_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name);
    format!("{stem}.sample.dot")
}

fn create_file(path: &Path) -> Result<BufWriter<File>, CliError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| CliError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

#[instrument(name = "cli.write_gml", err, skip(report), fields(source = %report.name))]
fn write_gml_artifact(path: PathBuf, report: &GraphReport) -> Result<Artifact, CliError> {
    let writer = create_file(&path)?;
    write_gml(&report.network, writer).map_err(|source| CliError::Gml {
        path: path.clone(),
        source,
    })?;
    Ok(Artifact {
        source: report.name.clone(),
        kind: ArtifactKind::Gml,
        path,
    })
}

#[instrument(name = "cli.write_sample", err, skip(report), fields(source = %report.name))]
fn write_sample_artifact(path: PathBuf, report: &GraphReport) -> Result<Artifact, CliError> {
    let mut writer = create_file(&path)?;
    let dot = render_sample_dot(&report.sample);
    writer
        .write_all(dot.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    Ok(Artifact {
        source: report.name.clone(),
        kind: ArtifactKind::SampleDot,
        path,
    })
}
