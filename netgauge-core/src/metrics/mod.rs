//! The fixed battery of network metrics computed for every connected graph.
//!
//! [`compute_metrics`] runs every kernel over dense adjacency lists and
//! assembles a [`MetricRow`]. Two metrics are approximate:
//! betweenness is estimated from a bounded number of sampled sources, and
//! eigenvector centrality is capped at a fixed number of power iterations.
//! When the power iteration does not converge the row carries all-zero
//! eigenvector scores and sets [`MetricRow::eigenvector_fallback`].

mod centrality;
mod clustering;
mod degree;
mod paths;

use std::{fmt, str::FromStr};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{Span, field, instrument, warn};

use crate::{
    error::{NetgaugeError, Result},
    network::Network,
};

/// Default number of betweenness source samples.
pub const DEFAULT_BETWEENNESS_SAMPLES: usize = 500;
/// Default cap on eigenvector power iterations.
pub const DEFAULT_EIGENVECTOR_MAX_ITER: usize = 1000;
/// Default per-node eigenvector convergence tolerance.
pub const DEFAULT_EIGENVECTOR_TOLERANCE: f64 = 1e-6;

/// Approximation parameters for the metric battery.
///
/// # Examples
/// ```
/// use netgauge_core::MetricConfig;
///
/// let config = MetricConfig::default();
/// assert_eq!(config.betweenness_samples, 500);
/// assert_eq!(config.eigenvector_max_iter, 1000);
/// assert!(config.seed.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetricConfig {
    /// Number of source nodes sampled for betweenness; all nodes are used
    /// when the graph is smaller.
    pub betweenness_samples: usize,
    /// Power-iteration cap for eigenvector centrality.
    pub eigenvector_max_iter: usize,
    /// Per-node L1 convergence tolerance for eigenvector centrality.
    pub eigenvector_tolerance: f64,
    /// Seed for the betweenness sampler; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            betweenness_samples: DEFAULT_BETWEENNESS_SAMPLES,
            eigenvector_max_iter: DEFAULT_EIGENVECTOR_MAX_ITER,
            eigenvector_tolerance: DEFAULT_EIGENVECTOR_TOLERANCE,
            seed: None,
        }
    }
}

impl MetricConfig {
    /// Checks every parameter.
    ///
    /// # Errors
    /// Returns the matching [`NetgaugeError`] `Invalid*` variant for a zero
    /// sample count, a zero iteration cap, or a tolerance that is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.betweenness_samples == 0 {
            return Err(NetgaugeError::InvalidBetweennessSamples {
                got: self.betweenness_samples,
            });
        }
        if self.eigenvector_max_iter == 0 {
            return Err(NetgaugeError::InvalidEigenvectorMaxIter {
                got: self.eigenvector_max_iter,
            });
        }
        if !self.eigenvector_tolerance.is_finite() || self.eigenvector_tolerance <= 0.0 {
            return Err(NetgaugeError::InvalidEigenvectorTolerance {
                got: self.eigenvector_tolerance,
            });
        }
        Ok(())
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// One of the sixteen metrics reported for every graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    /// Node count.
    Nodes,
    /// Edge count.
    Edges,
    /// Mean node degree.
    AvgDegree,
    /// Largest node degree.
    MaxDegree,
    /// Mean local clustering coefficient.
    ClusteringCoef,
    /// `2E / (N (N - 1))`.
    Density,
    /// Longest shortest path.
    Diameter,
    /// Mean shortest path length.
    AvgPathLength,
    /// Global clustering coefficient.
    Transitivity,
    /// Degree–degree Pearson correlation.
    Assortativity,
    /// Mean inverse shortest path length.
    GraphEfficiency,
    /// Mean normalised degree centrality.
    AvgDegreeCentrality,
    /// Mean closeness centrality.
    AvgClosenessCentrality,
    /// Mean sampled betweenness centrality.
    AvgBetweennessCentrality,
    /// Mean eigenvector centrality.
    AvgEigenvectorCentrality,
    /// Size of the innermost k-core.
    KCoreNodes,
}

impl MetricKind {
    /// Every metric in column order.
    pub const ALL: [Self; 16] = [
        Self::Nodes,
        Self::Edges,
        Self::AvgDegree,
        Self::MaxDegree,
        Self::ClusteringCoef,
        Self::Density,
        Self::Diameter,
        Self::AvgPathLength,
        Self::Transitivity,
        Self::Assortativity,
        Self::GraphEfficiency,
        Self::AvgDegreeCentrality,
        Self::AvgClosenessCentrality,
        Self::AvgBetweennessCentrality,
        Self::AvgEigenvectorCentrality,
        Self::KCoreNodes,
    ];

    /// Display label used in tables, e.g. `Avg Degree`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nodes => "Nodes",
            Self::Edges => "Edges",
            Self::AvgDegree => "Avg Degree",
            Self::MaxDegree => "Max Degree",
            Self::ClusteringCoef => "Clustering Coef",
            Self::Density => "Density",
            Self::Diameter => "Diameter",
            Self::AvgPathLength => "Avg Path Length",
            Self::Transitivity => "Transitivity",
            Self::Assortativity => "Assortativity",
            Self::GraphEfficiency => "Graph Efficiency",
            Self::AvgDegreeCentrality => "Avg Degree Centrality",
            Self::AvgClosenessCentrality => "Avg Closeness Centrality",
            Self::AvgBetweennessCentrality => "Avg Betweenness Centrality",
            Self::AvgEigenvectorCentrality => "Avg Eigenvector Centrality",
            Self::KCoreNodes => "K-core Nodes",
        }
    }

    /// Kebab-case identifier used on the command line, e.g. `avg-degree`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
            Self::AvgDegree => "avg-degree",
            Self::MaxDegree => "max-degree",
            Self::ClusteringCoef => "clustering-coef",
            Self::Density => "density",
            Self::Diameter => "diameter",
            Self::AvgPathLength => "avg-path-length",
            Self::Transitivity => "transitivity",
            Self::Assortativity => "assortativity",
            Self::GraphEfficiency => "graph-efficiency",
            Self::AvgDegreeCentrality => "avg-degree-centrality",
            Self::AvgClosenessCentrality => "avg-closeness-centrality",
            Self::AvgBetweennessCentrality => "avg-betweenness-centrality",
            Self::AvgEigenvectorCentrality => "avg-eigenvector-centrality",
            Self::KCoreNodes => "k-core-nodes",
        }
    }
}

impl Serialize for MetricKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known metric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric `{0}`")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    /// Accepts either the display label or the kebab-case identifier, ignoring
    /// ASCII case.
    fn from_str(raw: &str) -> core::result::Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(trimmed) || kind.id().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownMetric(raw.to_owned()))
    }
}

/// Metric values for one processed graph.
///
/// Serialises as a map from metric label to value, followed by the
/// eigenvector fallback flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    /// Node count.
    #[serde(rename = "Nodes")]
    pub nodes: usize,
    /// Edge count.
    #[serde(rename = "Edges")]
    pub edges: usize,
    /// Mean node degree.
    #[serde(rename = "Avg Degree")]
    pub avg_degree: f64,
    /// Largest node degree.
    #[serde(rename = "Max Degree")]
    pub max_degree: usize,
    /// Mean local clustering coefficient.
    #[serde(rename = "Clustering Coef")]
    pub clustering_coef: f64,
    /// `2E / (N (N - 1))`.
    #[serde(rename = "Density")]
    pub density: f64,
    /// Longest shortest path.
    #[serde(rename = "Diameter")]
    pub diameter: usize,
    /// Mean shortest path length.
    #[serde(rename = "Avg Path Length")]
    pub avg_path_length: f64,
    /// Global clustering coefficient.
    #[serde(rename = "Transitivity")]
    pub transitivity: f64,
    /// Degree–degree Pearson correlation; NaN when undefined.
    #[serde(rename = "Assortativity")]
    pub assortativity: f64,
    /// Mean inverse shortest path length.
    #[serde(rename = "Graph Efficiency")]
    pub graph_efficiency: f64,
    /// Mean normalised degree centrality.
    #[serde(rename = "Avg Degree Centrality")]
    pub avg_degree_centrality: f64,
    /// Mean closeness centrality.
    #[serde(rename = "Avg Closeness Centrality")]
    pub avg_closeness_centrality: f64,
    /// Mean sampled betweenness centrality.
    #[serde(rename = "Avg Betweenness Centrality")]
    pub avg_betweenness_centrality: f64,
    /// Mean eigenvector centrality (zero when the fallback fired).
    #[serde(rename = "Avg Eigenvector Centrality")]
    pub avg_eigenvector_centrality: f64,
    /// Size of the innermost k-core.
    #[serde(rename = "K-core Nodes")]
    pub k_core_nodes: usize,
    /// Set when eigenvector power iteration did not converge and zeros were
    /// substituted.
    pub eigenvector_fallback: bool,
}

impl MetricRow {
    /// Value of `kind` as a float.
    #[must_use]
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Nodes => self.nodes as f64,
            MetricKind::Edges => self.edges as f64,
            MetricKind::AvgDegree => self.avg_degree,
            MetricKind::MaxDegree => self.max_degree as f64,
            MetricKind::ClusteringCoef => self.clustering_coef,
            MetricKind::Density => self.density,
            MetricKind::Diameter => self.diameter as f64,
            MetricKind::AvgPathLength => self.avg_path_length,
            MetricKind::Transitivity => self.transitivity,
            MetricKind::Assortativity => self.assortativity,
            MetricKind::GraphEfficiency => self.graph_efficiency,
            MetricKind::AvgDegreeCentrality => self.avg_degree_centrality,
            MetricKind::AvgClosenessCentrality => self.avg_closeness_centrality,
            MetricKind::AvgBetweennessCentrality => self.avg_betweenness_centrality,
            MetricKind::AvgEigenvectorCentrality => self.avg_eigenvector_centrality,
            MetricKind::KCoreNodes => self.k_core_nodes as f64,
        }
    }

    /// `(metric, value)` pairs in column order.
    pub fn values(&self) -> impl Iterator<Item = (MetricKind, f64)> + '_ {
        MetricKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// Computes the metric battery for a connected `network`.
///
/// The network is not modified. Path metrics assume connectivity; run
/// [`crate::reduce_to_largest_component`] first.
///
/// # Errors
/// Returns [`NetgaugeError::EmptyGraph`] when `network` has no nodes.
///
/// # Examples
/// ```
/// use netgauge_core::{MetricConfig, Network, compute_metrics};
///
/// let triangle = Network::from_edges([(1, 2), (2, 3), (3, 1)]);
/// let row = compute_metrics(&triangle, &MetricConfig::default())?;
/// assert_eq!(row.nodes, 3);
/// assert_eq!(row.diameter, 1);
/// assert_eq!(row.density, 1.0);
/// # Ok::<(), netgauge_core::NetgaugeError>(())
/// ```
#[instrument(
    name = "core.metrics",
    err,
    skip(network, config),
    fields(
        nodes = network.node_count(),
        edges = network.edge_count(),
        betweenness_sources = field::Empty,
        eigenvector_fallback = field::Empty,
    ),
)]
pub fn compute_metrics(network: &Network, config: &MetricConfig) -> Result<MetricRow> {
    let n = network.node_count();
    if n == 0 {
        return Err(NetgaugeError::EmptyGraph);
    }
    let adjacency = network.adjacency();
    let degrees = degree::degrees(&adjacency);
    let clustering = clustering::clustering(&adjacency);
    let paths = paths::path_stats(&adjacency);

    let mut rng = config.rng();
    let sources = centrality::choose_sources(n, config.betweenness_samples, &mut rng);
    let betweenness = centrality::sampled_betweenness(&adjacency, &sources);

    let (eigenvector, eigenvector_fallback) = match centrality::eigenvector_centrality(
        &adjacency,
        config.eigenvector_max_iter,
        config.eigenvector_tolerance,
    ) {
        Ok(scores) => (scores, false),
        Err(err) => {
            warn!(
                error = %err,
                code = %err.code(),
                "eigenvector centrality failed; substituting zeros"
            );
            (vec![0.0; n], true)
        }
    };

    let span = Span::current();
    span.record("betweenness_sources", sources.len());
    span.record("eigenvector_fallback", eigenvector_fallback);

    let edges = network.edge_count();
    let density = if n <= 1 {
        0.0
    } else {
        (2 * edges) as f64 / (n * (n - 1)) as f64
    };

    Ok(MetricRow {
        nodes: n,
        edges,
        avg_degree: degree::mean_degree(&degrees),
        max_degree: degrees.iter().copied().max().unwrap_or(0),
        clustering_coef: clustering.average_clustering,
        density,
        diameter: paths.diameter,
        avg_path_length: paths.average_path_length,
        transitivity: clustering.transitivity,
        assortativity: degree::degree_assortativity(&degrees, network.edge_indices()),
        graph_efficiency: paths.efficiency,
        avg_degree_centrality: degree::mean_degree_centrality(&degrees),
        avg_closeness_centrality: mean(&paths.closeness),
        avg_betweenness_centrality: mean(&betweenness),
        avg_eigenvector_centrality: mean(&eigenvector),
        k_core_nodes: degree::innermost_core_size(&degree::core_numbers(&adjacency)),
        eigenvector_fallback,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
