//! Shortest-path measures computed from one breadth-first search per node.

use std::collections::VecDeque;

const UNREACHED: usize = usize::MAX;

/// Aggregates over all-pairs shortest path lengths.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathStats {
    /// Longest shortest path between reachable pairs.
    pub(crate) diameter: usize,
    /// Mean shortest path length over ordered reachable pairs.
    pub(crate) average_path_length: f64,
    /// Mean of `1 / d(u, v)` over ordered pairs, unreachable pairs scoring 0.
    pub(crate) efficiency: f64,
    /// Wasserman–Faust closeness of every node.
    pub(crate) closeness: Vec<f64>,
}

/// Runs an exact BFS from every node.
///
/// Single-node graphs report zero for every measure.
pub(crate) fn path_stats(adjacency: &[Vec<usize>]) -> PathStats {
    let n = adjacency.len();
    let mut distance = vec![UNREACHED; n];
    let mut queue = VecDeque::with_capacity(n);

    let mut diameter = 0;
    let mut total_length: u128 = 0;
    let mut reachable_pairs: u128 = 0;
    let mut inverse_sum = 0.0;
    let mut closeness = Vec::with_capacity(n);

    for source in 0..n {
        distance.fill(UNREACHED);
        distance[source] = 0;
        queue.push_back(source);

        let mut reached = 0usize;
        let mut length_sum = 0usize;
        while let Some(node) = queue.pop_front() {
            let d = distance[node];
            if d > 0 {
                reached += 1;
                length_sum += d;
                diameter = diameter.max(d);
                inverse_sum += 1.0 / d as f64;
            }
            for &next in &adjacency[node] {
                if distance[next] == UNREACHED {
                    distance[next] = d + 1;
                    queue.push_back(next);
                }
            }
        }

        total_length += length_sum as u128;
        reachable_pairs += reached as u128;
        closeness.push(closeness_of(reached, length_sum, n));
    }

    let ordered_pairs = n.saturating_mul(n.saturating_sub(1));
    let average_path_length = if reachable_pairs == 0 {
        0.0
    } else {
        total_length as f64 / reachable_pairs as f64
    };
    let efficiency = if ordered_pairs == 0 {
        0.0
    } else {
        inverse_sum / ordered_pairs as f64
    };

    PathStats {
        diameter,
        average_path_length,
        efficiency,
        closeness,
    }
}

fn closeness_of(reached: usize, length_sum: usize, n: usize) -> f64 {
    if length_sum == 0 || n <= 1 {
        return 0.0;
    }
    let reached = reached as f64;
    (reached / length_sum as f64) * (reached / (n - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::network::{Network, NodeId};

    fn stats(edges: &[(NodeId, NodeId)]) -> PathStats {
        path_stats(&Network::from_edges(edges.iter().copied()).adjacency())
    }

    #[rstest]
    fn path_of_five() {
        let stats = stats(&[(1, 2), (2, 3), (3, 4), (4, 5)]);
        assert_eq!(stats.diameter, 4);
        assert!((stats.average_path_length - 2.0).abs() < 1e-12);
        // Pair distances 1 (x4), 2 (x3), 3 (x2), 4 (x1) over 10 pairs.
        let expected_efficiency = (4.0 + 3.0 / 2.0 + 2.0 / 3.0 + 1.0 / 4.0) / 10.0;
        assert!((stats.efficiency - expected_efficiency).abs() < 1e-12);
        // End node: distances 1+2+3+4; centre: 2+1+1+2.
        assert!((stats.closeness[0] - 0.4).abs() < 1e-12);
        assert!((stats.closeness[2] - 4.0 / 6.0).abs() < 1e-12);
    }

    #[rstest]
    fn complete_graph_has_unit_distances() {
        let stats = stats(&[(1, 2), (2, 3), (3, 1), (1, 4), (2, 4), (3, 4)]);
        assert_eq!(stats.diameter, 1);
        assert_eq!(stats.average_path_length, 1.0);
        assert_eq!(stats.efficiency, 1.0);
        assert!(stats.closeness.iter().all(|&c| c == 1.0));
    }

    #[rstest]
    fn single_node_reports_zero() {
        let stats = path_stats(&[Vec::new()]);
        assert_eq!(stats.diameter, 0);
        assert_eq!(stats.average_path_length, 0.0);
        assert_eq!(stats.efficiency, 0.0);
        assert_eq!(stats.closeness, vec![0.0]);
    }
}
