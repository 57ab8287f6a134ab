//! Connected components and reduction to the largest one.
//!
//! Components are listed in the order their first node appears in the
//! network. The reducer keeps the largest component and, on ties, the one
//! listed first, so the result is deterministic for a given input.

use petgraph::{graph::NodeIndex, unionfind::UnionFind};
use tracing::{Span, field, info, instrument};

use crate::network::Network;

/// The connected network handed to the metric calculator, plus how much of
/// the input it retained.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Largest connected component of the input, as an independent copy.
    pub network: Network,
    /// Node count before reduction.
    pub original_nodes: usize,
    /// Edge count before reduction.
    pub original_edges: usize,
    /// Number of connected components found in the input.
    pub component_count: usize,
}

impl Reduction {
    /// Whether the input was already connected.
    #[must_use]
    pub fn was_connected(&self) -> bool {
        self.component_count <= 1
    }
}

/// Lists the connected components of `network`.
///
/// Components are ordered by their first node in iteration order and each
/// component lists its nodes in iteration order.
///
/// # Examples
/// ```
/// use netgauge_core::{Network, connected_components};
///
/// let network = Network::from_edges([(1, 2), (3, 4), (4, 5)]);
/// let sizes: Vec<usize> = connected_components(&network).iter().map(Vec::len).collect();
/// assert_eq!(sizes, vec![2, 3]);
/// ```
#[must_use]
pub fn connected_components(network: &Network) -> Vec<Vec<NodeIndex>> {
    let n = network.node_count();
    let mut sets = UnionFind::<usize>::new(n);
    for (source, target) in network.edge_indices() {
        sets.union(source, target);
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();
    for (node, root) in sets.into_labeling().into_iter().enumerate() {
        let slot = match slot_of_root[root] {
            Some(slot) => slot,
            None => {
                slot_of_root[root] = Some(components.len());
                components.push(Vec::new());
                components.len() - 1
            }
        };
        components[slot].push(NodeIndex::new(node));
    }
    components
}

/// Reduces `network` to its largest connected component.
///
/// A connected input is returned unchanged. Otherwise the subgraph induced by
/// the largest component is copied out; ties go to the component whose first
/// node appears earliest.
///
/// # Examples
/// ```
/// use netgauge_core::{Network, reduce_to_largest_component};
///
/// let network = Network::from_edges([(1, 2), (2, 3), (3, 1), (4, 5)]);
/// let reduction = reduce_to_largest_component(network);
/// assert_eq!(reduction.component_count, 2);
/// assert_eq!(reduction.network.labels().collect::<Vec<_>>(), vec![1, 2, 3]);
/// ```
#[instrument(
    name = "core.reduce",
    skip(network),
    fields(
        nodes = network.node_count(),
        components = field::Empty,
        kept = field::Empty,
    ),
)]
#[must_use]
pub fn reduce_to_largest_component(network: Network) -> Reduction {
    let original_nodes = network.node_count();
    let original_edges = network.edge_count();
    let components = connected_components(&network);
    let component_count = components.len();
    let span = Span::current();
    span.record("components", component_count);

    if component_count <= 1 {
        span.record("kept", original_nodes);
        return Reduction {
            network,
            original_nodes,
            original_edges,
            component_count,
        };
    }

    let mut largest: &[NodeIndex] = &[];
    for component in &components {
        if component.len() > largest.len() {
            largest = component;
        }
    }
    let reduced = network.induced_subgraph(largest);
    span.record("kept", reduced.node_count());
    info!(
        components = component_count,
        kept_nodes = reduced.node_count(),
        dropped_nodes = original_nodes - reduced.node_count(),
        "reduced disconnected graph to its largest component"
    );
    Reduction {
        network: reduced,
        original_nodes,
        original_edges,
        component_count,
    }
}
