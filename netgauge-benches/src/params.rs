//! Benchmark parameter types.

use std::fmt;

/// Parameters for a graph benchmark run.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Nodes in the generated graph.
    pub node_count: usize,
    /// Extra random edges per node on top of the ring backbone.
    pub extra_degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.extra_degree)
    }
}
