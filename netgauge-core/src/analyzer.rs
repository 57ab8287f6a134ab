//! Per-file pipeline orchestration and sequential batch processing.
//!
//! [`Analyzer::analyze`] runs load, reduce, metrics, and sample for one edge
//! list. [`Analyzer::analyze_batch`] runs it over many inputs in order,
//! isolating each failure to its own [`FileOutcome`].

use std::{
    io::{self, BufRead},
    num::NonZeroUsize,
    sync::Arc,
};

use serde::Serialize;
use tracing::{Span, field, info, instrument, warn};

use crate::{
    Result,
    components::reduce_to_largest_component,
    error::NetgaugeError,
    gml::{gml_file_name, to_gml_bytes},
    loader::{LoadedEdgeList, load_edge_list},
    metrics::{MetricConfig, MetricRow, compute_metrics},
    network::Network,
    sample::sample,
};

/// What the loader discarded while reading one edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Lines consumed, including blank and comment lines.
    pub lines_read: usize,
    /// Self-loops that were dropped.
    pub self_loops_dropped: usize,
    /// Repeated edges that were dropped.
    pub duplicate_edges: usize,
}

/// How much of the parsed graph survived reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionSummary {
    /// Node count before reduction.
    pub original_nodes: usize,
    /// Edge count before reduction.
    pub original_edges: usize,
    /// Connected components in the parsed graph.
    pub component_count: usize,
}

/// Everything produced for one successfully processed edge list.
#[derive(Debug, Clone)]
pub struct GraphReport {
    /// Input name, typically the file name.
    pub name: String,
    /// The connected network the metrics describe.
    pub network: Network,
    /// Metric values for [`GraphReport::network`].
    pub row: MetricRow,
    /// Leading nodes of [`GraphReport::network`] for visual inspection.
    pub sample: Network,
    /// Loader bookkeeping.
    pub load: LoadSummary,
    /// Reducer bookkeeping.
    pub reduction: ReductionSummary,
}

impl GraphReport {
    /// Name of the GML artifact for this report.
    #[must_use]
    pub fn gml_file_name(&self) -> String {
        gml_file_name(&self.name)
    }

    /// Serialises the reduced network as GML.
    ///
    /// # Errors
    /// Returns [`NetgaugeError::Gml`] only if the in-memory writer fails.
    pub fn to_gml(&self) -> Result<Vec<u8>> {
        Ok(to_gml_bytes(&self.network)?)
    }
}

/// Result of one input in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    /// Input name, typically the file name.
    pub name: String,
    /// The report, or why the input failed.
    pub result: Result<GraphReport>,
}

impl FileOutcome {
    /// Whether the input produced a report.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Batch progress reported after every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Inputs finished so far, successful or not.
    pub completed: usize,
    /// Inputs in the batch.
    pub total: usize,
}

impl BatchProgress {
    /// Completed share of the batch in `[0, 1]`; an empty batch is complete.
    ///
    /// # Examples
    /// ```
    /// use netgauge_core::BatchProgress;
    ///
    /// assert_eq!(BatchProgress { completed: 1, total: 4 }.fraction(), 0.25);
    /// assert_eq!(BatchProgress { completed: 0, total: 0 }.fraction(), 1.0);
    /// ```
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Entry point for running the metrics pipeline.
///
/// # Examples
/// ```
/// use netgauge_core::AnalyzerBuilder;
///
/// let analyzer = AnalyzerBuilder::new().with_seed(3).build()?;
/// let report = analyzer.analyze("triangle.txt", "1 2\n2 3\n3 1\n4 5\n".as_bytes())?;
/// assert_eq!(report.row.nodes, 3);
/// assert_eq!(report.reduction.component_count, 2);
/// assert_eq!(report.gml_file_name(), "triangle.gml");
/// # Ok::<(), netgauge_core::NetgaugeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    metrics: MetricConfig,
    sample_size: NonZeroUsize,
}

impl Analyzer {
    pub(crate) fn new(metrics: MetricConfig, sample_size: NonZeroUsize) -> Self {
        Self {
            metrics,
            sample_size,
        }
    }

    /// Returns the metric parameters used for every input.
    #[must_use]
    pub fn metric_config(&self) -> &MetricConfig {
        &self.metrics
    }

    /// Returns the number of nodes kept in each visual sample.
    #[must_use]
    pub fn sample_size(&self) -> NonZeroUsize {
        self.sample_size
    }

    /// Processes one edge list.
    ///
    /// # Errors
    /// Returns [`NetgaugeError::Load`] when the edge list cannot be parsed.
    #[instrument(
        name = "core.analyze",
        err,
        skip(self, reader),
        fields(
            source = %name,
            nodes = field::Empty,
            edges = field::Empty,
            eigenvector_fallback = field::Empty,
        ),
    )]
    pub fn analyze<R: BufRead>(&self, name: &str, reader: R) -> Result<GraphReport> {
        let LoadedEdgeList {
            network,
            lines_read,
            self_loops_dropped,
            duplicate_edges,
        } = load_edge_list(reader).map_err(|error| NetgaugeError::Load {
            source_name: Arc::from(name),
            error,
        })?;

        let reduction = reduce_to_largest_component(network);
        let row = compute_metrics(&reduction.network, &self.metrics)?;
        let sample = sample(&reduction.network, self.sample_size.get());

        let span = Span::current();
        span.record("nodes", row.nodes);
        span.record("edges", row.edges);
        span.record("eigenvector_fallback", row.eigenvector_fallback);

        Ok(GraphReport {
            name: name.to_owned(),
            row,
            sample,
            load: LoadSummary {
                lines_read,
                self_loops_dropped,
                duplicate_edges,
            },
            reduction: ReductionSummary {
                original_nodes: reduction.original_nodes,
                original_edges: reduction.original_edges,
                component_count: reduction.component_count,
            },
            network: reduction.network,
        })
    }

    /// Processes `inputs` one at a time, in order.
    ///
    /// A failure (an input that cannot be opened or parsed) is recorded in
    /// that input's [`FileOutcome`] and the batch moves on. `on_progress`
    /// runs after every input.
    ///
    /// # Examples
    /// ```
    /// use std::io;
    ///
    /// use netgauge_core::AnalyzerBuilder;
    ///
    /// let analyzer = AnalyzerBuilder::new().with_seed(3).build()?;
    /// let inputs = vec![
    ///     ("bad.txt".to_owned(), Ok::<_, io::Error>("1 x\n".as_bytes())),
    ///     ("good.txt".to_owned(), Ok("1 2\n".as_bytes())),
    /// ];
    /// let mut seen = Vec::new();
    /// let outcomes = analyzer.analyze_batch(inputs, |progress| seen.push(progress.completed));
    /// assert!(!outcomes[0].succeeded());
    /// assert!(outcomes[1].succeeded());
    /// assert_eq!(seen, vec![1, 2]);
    /// # Ok::<(), netgauge_core::NetgaugeError>(())
    /// ```
    #[instrument(
        name = "core.batch",
        skip(self, inputs, on_progress),
        fields(total = field::Empty, failed = field::Empty),
    )]
    pub fn analyze_batch<I, R, F>(&self, inputs: I, mut on_progress: F) -> Vec<FileOutcome>
    where
        I: IntoIterator<Item = (String, io::Result<R>)>,
        I::IntoIter: ExactSizeIterator,
        R: BufRead,
        F: FnMut(BatchProgress),
    {
        let inputs = inputs.into_iter();
        let total = inputs.len();
        let span = Span::current();
        span.record("total", total);
        let mut outcomes = Vec::with_capacity(total);

        for (name, reader) in inputs {
            let result = match reader {
                Ok(reader) => self.analyze(&name, reader),
                Err(error) => Err(NetgaugeError::Open {
                    source_name: Arc::from(name.as_str()),
                    error,
                }),
            };
            if let Err(err) = &result {
                warn!(
                    source = %name,
                    code = %err.code(),
                    error = %err,
                    "input failed; continuing with the next one"
                );
            }
            outcomes.push(FileOutcome { name, result });
            on_progress(BatchProgress {
                completed: outcomes.len(),
                total,
            });
        }

        let failed = outcomes.iter().filter(|outcome| !outcome.succeeded()).count();
        span.record("failed", failed);
        info!(total, failed, "batch complete");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::{AnalyzerBuilder, NetgaugeErrorCode, error::LoadErrorCode};

    #[fixture]
    fn analyzer() -> Analyzer {
        AnalyzerBuilder::new()
            .with_seed(11)
            .build()
            .expect("default configuration is valid")
    }

    #[rstest]
    fn analyze_reports_loader_and_reducer_summaries(analyzer: Analyzer) {
        let report = analyzer
            .analyze("mixed.txt", "1 2\n2 1\n3 3\n2 3\n# c\n7 8\n".as_bytes())
            .expect("valid edge list");
        assert_eq!(
            report.load,
            LoadSummary {
                lines_read: 6,
                self_loops_dropped: 1,
                duplicate_edges: 1,
            }
        );
        assert_eq!(
            report.reduction,
            ReductionSummary {
                original_nodes: 5,
                original_edges: 3,
                component_count: 2,
            }
        );
        assert_eq!(report.row.nodes, 3);
        assert_eq!(report.sample.node_count(), 3);
    }

    #[rstest]
    fn analyze_wraps_load_errors_with_source_name(analyzer: Analyzer) {
        let err = analyzer
            .analyze("broken.txt", "1 2 3\n".as_bytes())
            .expect_err("three tokens must fail");
        assert_eq!(err.code(), NetgaugeErrorCode::LoadFailure);
        assert_eq!(err.load_code(), Some(LoadErrorCode::MalformedLine));
        assert!(err.to_string().contains("broken.txt"));
    }

    #[rstest]
    fn sample_size_bounds_the_sample() {
        let analyzer = AnalyzerBuilder::new()
            .with_sample_size(2)
            .with_seed(1)
            .build()
            .expect("valid configuration");
        let report = analyzer
            .analyze("path.txt", "1 2\n2 3\n3 4\n".as_bytes())
            .expect("valid edge list");
        assert_eq!(report.sample.node_count(), 2);
        assert_eq!(report.network.node_count(), 4);
    }

    #[rstest]
    fn batch_isolates_failures_and_reports_progress(analyzer: Analyzer) {
        let inputs = vec![
            ("a.txt".to_owned(), Ok("1 2\n2 3\n".as_bytes())),
            (
                "missing.txt".to_owned(),
                Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            ),
            ("b.txt".to_owned(), Ok("oops\n".as_bytes())),
            ("c.txt".to_owned(), Ok("5 6\n".as_bytes())),
        ];
        let mut progress = Vec::new();
        let outcomes = analyzer.analyze_batch(inputs, |update| progress.push(update));

        let names: Vec<_> = outcomes.iter().map(|outcome| outcome.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "missing.txt", "b.txt", "c.txt"]);
        let succeeded: Vec<_> = outcomes.iter().map(FileOutcome::succeeded).collect();
        assert_eq!(succeeded, vec![true, false, false, true]);
        match &outcomes[1].result {
            Err(err) => assert_eq!(err.code(), NetgaugeErrorCode::OpenFailure),
            Ok(_) => panic!("missing input must fail"),
        }

        let fractions: Vec<f64> = progress.iter().map(BatchProgress::fraction).collect();
        assert_eq!(fractions, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[rstest]
    fn gml_artifact_uses_reduced_network(analyzer: Analyzer) {
        let report = analyzer
            .analyze("two.txt", "1 2\n3 4\n4 5\n".as_bytes())
            .expect("valid edge list");
        let text = String::from_utf8(report.to_gml().expect("gml")).expect("utf-8");
        assert!(text.contains("label \"3\""));
        assert!(!text.contains("label \"1\""));
        assert_eq!(report.gml_file_name(), "two.gml");
    }

    #[rstest]
    fn gml_export_propagates_as_netgauge_error(analyzer: Analyzer) -> Result<()> {
        let report = analyzer
            .analyze("pair.txt", "5 6
".as_bytes())
            .expect("valid edge list");
        let bytes = report.to_gml()?;
        assert!(bytes.starts_with(b"graph ["));
        Ok(())
    }
}
