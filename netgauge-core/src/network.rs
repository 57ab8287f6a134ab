//! Undirected simple graph keyed by integer node identifiers.
//!
//! [`Network`] wraps a petgraph [`UnGraph`] whose node weights are the
//! identifiers read from the edge list. Node indices follow first-appearance
//! order, which is the iteration order every other module relies on (the
//! sample extractor in particular).

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Identifier attached to a node in an edge list.
pub type NodeId = i64;

/// Undirected simple graph with integer node labels.
///
/// # Examples
/// ```
/// use netgauge_core::Network;
///
/// let network = Network::from_edges([(1, 2), (2, 3), (2, 1)]);
/// assert_eq!(network.node_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// assert!(network.is_connected());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: UnGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
}

impl Network {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from endpoint pairs, ignoring self-loops and repeated
    /// edges.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut network = Self::new();
        for (left, right) in edges {
            network.insert_edge(left, right);
        }
        network
    }

    /// Adds `id` if it is not already present and returns its index.
    pub fn insert_node(&mut self, id: NodeId) -> NodeIndex {
        *self
            .index
            .entry(id)
            .or_insert_with(|| self.graph.add_node(id))
    }

    /// Adds the undirected edge `left`–`right`.
    ///
    /// Returns [`EdgeInsert::SelfLoop`] without touching the graph when both
    /// endpoints are equal, and [`EdgeInsert::Duplicate`] when the edge is
    /// already present in either orientation.
    pub fn insert_edge(&mut self, left: NodeId, right: NodeId) -> EdgeInsert {
        if left == right {
            return EdgeInsert::SelfLoop;
        }
        let a = self.insert_node(left);
        let b = self.insert_node(right);
        if self.graph.find_edge(a, b).is_some() {
            return EdgeInsert::Duplicate;
        }
        self.graph.add_edge(a, b, ());
        EdgeInsert::Added
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` when the network has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node identifiers in iteration order.
    pub fn labels(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// Identifier stored at `index`, if the index is in range.
    #[must_use]
    pub fn label(&self, index: NodeIndex) -> Option<NodeId> {
        self.graph.node_weight(index).copied()
    }

    /// Index of the node labelled `id`.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// Number of neighbours of `index`.
    #[must_use]
    pub fn degree(&self, index: NodeIndex) -> usize {
        self.graph.neighbors(index).count()
    }

    /// Neighbours of `index`.
    pub fn neighbors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(index)
    }

    /// Whether `left` and `right` are joined by an edge.
    #[must_use]
    pub fn contains_edge(&self, left: NodeId, right: NodeId) -> bool {
        match (self.index_of(left), self.index_of(right)) {
            (Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Edges as label pairs in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()]))
    }

    /// Edges as dense index pairs in insertion order.
    pub fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Dense adjacency lists indexed by [`NodeIndex::index`].
    ///
    /// Metric kernels run many breadth-first searches; a flat `Vec` per node
    /// avoids re-walking petgraph's linked edge lists on every visit.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.graph.node_count()];
        for (source, target) in self.edge_indices() {
            if let Some(list) = adjacency.get_mut(source) {
                list.push(target);
            }
            if let Some(list) = adjacency.get_mut(target) {
                list.push(source);
            }
        }
        adjacency
    }

    /// Whether every node can reach every other node.
    ///
    /// The empty network counts as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        petgraph::algo::connected_components(&self.graph) <= 1
    }

    /// Copies the subgraph induced by `nodes`.
    ///
    /// Nodes keep their relative order from `self`; unknown or repeated
    /// indices are ignored. The result owns its storage.
    #[must_use]
    pub fn induced_subgraph(&self, nodes: &[NodeIndex]) -> Self {
        let keep: HashSet<NodeIndex> = nodes
            .iter()
            .copied()
            .filter(|node| node.index() < self.graph.node_count())
            .collect();
        let mut ordered: Vec<NodeIndex> = keep.iter().copied().collect();
        ordered.sort_unstable();

        let mut subgraph = Self::new();
        for &node in &ordered {
            subgraph.insert_node(self.graph[node]);
        }
        for edge in self.graph.edge_references() {
            if keep.contains(&edge.source()) && keep.contains(&edge.target()) {
                subgraph.insert_edge(self.graph[edge.source()], self.graph[edge.target()]);
            }
        }
        subgraph
    }

    /// Borrow the underlying petgraph graph.
    #[must_use]
    pub fn inner(&self) -> &UnGraph<NodeId, ()> {
        &self.graph
    }
}

/// Outcome of [`Network::insert_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The edge was new and has been stored.
    Added,
    /// The edge already existed.
    Duplicate,
    /// Both endpoints were equal; nothing was stored.
    SelfLoop,
}
