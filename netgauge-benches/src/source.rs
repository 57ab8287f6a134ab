//! Seeded synthetic graphs for benchmarking.
//!
//! Every graph is a ring over `0..node_count` plus uniformly random chords,
//! so it is always connected and the reducer keeps every node.

use netgauge_core::{Network, NodeId};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// Fewer than three nodes cannot form the ring backbone.
    #[error("node count must be at least 3, got {got}")]
    TooFewNodes {
        /// Requested node count.
        got: usize,
    },
    /// The node count does not fit a node identifier.
    #[error("node count {got} exceeds the node identifier range")]
    TooManyNodes {
        /// Requested node count.
        got: usize,
    },
}

/// Configuration for synthetic graph generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Nodes in the graph.
    pub node_count: usize,
    /// Random chords added per node.
    pub extra_degree: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A generated edge list.
///
/// # Examples
///
/// ```
/// use netgauge_benches::source::{SyntheticConfig, SyntheticGraph};
///
/// let graph = SyntheticGraph::generate(&SyntheticConfig {
///     node_count: 10,
///     extra_degree: 2,
///     seed: 7,
/// })?;
/// let network = graph.network();
/// assert_eq!(network.node_count(), 10);
/// assert!(network.is_connected());
/// # Ok::<(), netgauge_benches::source::SyntheticError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticGraph {
    edges: Vec<(NodeId, NodeId)>,
}

impl SyntheticGraph {
    /// Generates a ring with random chords.
    ///
    /// # Errors
    /// Returns [`SyntheticError::TooFewNodes`] when `node_count < 3` and
    /// [`SyntheticError::TooManyNodes`] when it overflows [`NodeId`].
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.node_count < 3 {
            return Err(SyntheticError::TooFewNodes {
                got: config.node_count,
            });
        }
        let n = NodeId::try_from(config.node_count).map_err(|_| SyntheticError::TooManyNodes {
            got: config.node_count,
        })?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut edges: Vec<(NodeId, NodeId)> = (0..n).map(|node| (node, (node + 1) % n)).collect();
        for node in 0..n {
            for _ in 0..config.extra_degree {
                let other = rng.gen_range(0..n);
                edges.push((node, other));
            }
        }
        Ok(Self { edges })
    }

    /// Raw edges, including any self-loops or repeats drawn by the sampler.
    #[must_use]
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Builds a [`Network`], dropping self-loops and repeated edges.
    #[must_use]
    pub fn network(&self) -> Network {
        Network::from_edges(self.edges.iter().copied())
    }

    /// Renders the edges in whitespace-separated edge-list form.
    #[must_use]
    pub fn edge_list_text(&self) -> String {
        self.edges
            .iter()
            .map(|(left, right)| format!("{left} {right}\n"))
            .collect()
    }
}
