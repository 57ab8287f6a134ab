//! Edge-list ingestion.
//!
//! Each non-blank line names one undirected edge as two whitespace-separated
//! integers. A `#` starts a comment that runs to the end of the line.

use std::io::BufRead;

use tracing::{Span, debug, field, instrument, warn};

use crate::{
    error::LoadError,
    network::{EdgeInsert, Network, NodeId},
};

const COMMENT: char = '#';

/// A parsed edge list together with what the parser discarded.
#[derive(Debug, Clone)]
pub struct LoadedEdgeList {
    /// Graph built from the accepted edges.
    pub network: Network,
    /// Number of lines consumed, including blank and comment lines.
    pub lines_read: usize,
    /// Self-loops that were dropped.
    pub self_loops_dropped: usize,
    /// Edges that repeated an earlier edge in either orientation.
    pub duplicate_edges: usize,
}

/// Parses an edge list from `reader`.
///
/// # Errors
/// Returns [`LoadError::MalformedLine`] when a line does not hold exactly two
/// tokens, [`LoadError::InvalidNodeId`] when a token is not an integer,
/// [`LoadError::Io`] when reading fails, and [`LoadError::EmptyEdgeList`] when
/// no edge is found.
///
/// # Examples
/// ```
/// use netgauge_core::load_edge_list;
///
/// let loaded = load_edge_list("1 2\n# comment\n2 3\n".as_bytes())?;
/// assert_eq!(loaded.network.node_count(), 3);
/// assert_eq!(loaded.network.edge_count(), 2);
/// # Ok::<(), netgauge_core::LoadError>(())
/// ```
#[instrument(
    name = "core.load",
    err,
    skip(reader),
    fields(nodes = field::Empty, edges = field::Empty),
)]
pub fn load_edge_list<R: BufRead>(reader: R) -> Result<LoadedEdgeList, LoadError> {
    let mut network = Network::new();
    let mut lines_read = 0;
    let mut self_loops_dropped = 0;
    let mut duplicate_edges = 0;

    for (offset, line) in reader.lines().enumerate() {
        let line_number = offset + 1;
        let line = line.map_err(|source| LoadError::Io {
            line: line_number,
            source,
        })?;
        lines_read = line_number;

        let Some((left, right)) = parse_line(&line, line_number)? else {
            continue;
        };
        match network.insert_edge(left, right) {
            EdgeInsert::Added => {}
            EdgeInsert::Duplicate => duplicate_edges += 1,
            EdgeInsert::SelfLoop => {
                debug!(line = line_number, node = left, "dropping self-loop");
                self_loops_dropped += 1;
            }
        }
    }

    if network.edge_count() == 0 {
        return Err(LoadError::EmptyEdgeList);
    }
    if self_loops_dropped > 0 {
        warn!(self_loops_dropped, "edge list contained self-loops");
    }

    let span = Span::current();
    span.record("nodes", network.node_count());
    span.record("edges", network.edge_count());
    Ok(LoadedEdgeList {
        network,
        lines_read,
        self_loops_dropped,
        duplicate_edges,
    })
}

fn parse_line(raw: &str, line: usize) -> Result<Option<(NodeId, NodeId)>, LoadError> {
    let content = raw.split(COMMENT).next().unwrap_or_default();
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Ok(None),
        [left, right] => Ok(Some((parse_node(left, line)?, parse_node(right, line)?))),
        other => Err(LoadError::MalformedLine {
            line,
            tokens: other.len(),
        }),
    }
}

fn parse_node(token: &str, line: usize) -> Result<NodeId, LoadError> {
    token.parse().map_err(|_| LoadError::InvalidNodeId {
        line,
        token: token.to_owned(),
    })
}
