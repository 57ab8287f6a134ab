//! Bounded-size sample of a network for visual inspection.

use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;

use crate::network::Network;

/// Default number of nodes kept in a visual sample.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Copies the subgraph induced by the first `size` nodes in iteration order.
///
/// Nodes are taken by position, not by degree or centrality; a network with
/// at most `size` nodes is returned whole.
///
/// # Examples
/// ```
/// use netgauge_core::{Network, sample};
///
/// let network = Network::from_edges((1..=80).map(|n| (n, n + 1)));
/// assert_eq!(sample(&network, 50).node_count(), 50);
/// assert_eq!(sample(&network, 500).node_count(), 81);
/// ```
#[must_use]
pub fn sample(network: &Network, size: usize) -> Network {
    let keep: Vec<NodeIndex> = (0..network.node_count().min(size))
        .map(NodeIndex::new)
        .collect();
    network.induced_subgraph(&keep)
}

/// Renders `network` as an undirected Graphviz document with unlabeled
/// point-sized nodes and gray edges.
#[must_use]
pub fn render_sample_dot(network: &Network) -> String {
    let graph = network.inner();
    let dot = Dot::with_attr_getters(
        graph,
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, _| "color=gray".to_owned(),
        &|_, _| "shape=point, width=0.08".to_owned(),
    );
    format!("{dot:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn sample_keeps_leading_nodes_and_their_edges() {
        let network = Network::from_edges([(1, 2), (2, 3), (3, 4), (4, 1)]);
        let sampled = sample(&network, 3);
        assert_eq!(sampled.labels().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(sampled.edge_count(), 2);
    }

    #[rstest]
    fn dot_is_undirected_and_gray() {
        let network = Network::from_edges([(1, 2), (2, 3)]);
        let dot = render_sample_dot(&network);
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("0 -- 1"));
        assert!(dot.contains("color=gray"));
        assert!(dot.contains("shape=point"));
    }
}
