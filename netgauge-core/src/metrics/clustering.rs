//! Triangle-based clustering measures.

/// Triangle counts per node together with the aggregate clustering measures.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClusteringStats {
    /// Mean of the local clustering coefficients over every node.
    pub(crate) average_clustering: f64,
    /// Ratio of closed triads to all triads.
    pub(crate) transitivity: f64,
}

/// Computes local clustering for every node and the global transitivity.
///
/// A node with fewer than two neighbours has local clustering 0; transitivity
/// is 0 when the graph has no triangles.
pub(crate) fn clustering(adjacency: &[Vec<usize>]) -> ClusteringStats {
    let n = adjacency.len();
    if n == 0 {
        return ClusteringStats {
            average_clustering: 0.0,
            transitivity: 0.0,
        };
    }

    let mut marked = vec![false; n];
    let mut local_sum = 0.0;
    // Both totals count every triangle twice per corner and every triad twice.
    let mut closed_total: u128 = 0;
    let mut triad_total: u128 = 0;

    for (node, neighbours) in adjacency.iter().enumerate() {
        let degree = neighbours.len();
        if degree < 2 {
            continue;
        }
        for &neighbour in neighbours {
            marked[neighbour] = true;
        }
        let mut closed = 0usize;
        for &neighbour in neighbours {
            closed += adjacency[neighbour]
                .iter()
                .filter(|&&other| other != node && marked[other])
                .count();
        }
        for &neighbour in neighbours {
            marked[neighbour] = false;
        }

        let triads = degree * (degree - 1);
        local_sum += closed as f64 / triads as f64;
        closed_total += closed as u128;
        triad_total += triads as u128;
    }

    let transitivity = if closed_total == 0 {
        0.0
    } else {
        closed_total as f64 / triad_total as f64
    };
    ClusteringStats {
        average_clustering: local_sum / n as f64,
        transitivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::network::{Network, NodeId};

    fn stats(edges: &[(NodeId, NodeId)]) -> ClusteringStats {
        clustering(&Network::from_edges(edges.iter().copied()).adjacency())
    }

    #[rstest]
    fn triangle_is_fully_clustered() {
        let stats = stats(&[(1, 2), (2, 3), (3, 1)]);
        assert_eq!(stats.average_clustering, 1.0);
        assert_eq!(stats.transitivity, 1.0);
    }

    #[rstest]
    fn tree_has_no_clustering() {
        let stats = stats(&[(1, 2), (2, 3), (2, 4)]);
        assert_eq!(stats.average_clustering, 0.0);
        assert_eq!(stats.transitivity, 0.0);
    }

    #[rstest]
    fn triangle_with_pendant_separates_average_from_transitivity() {
        // Node 3 has neighbours {1, 2, 4}: one closed pair of three.
        let stats = stats(&[(1, 2), (2, 3), (3, 1), (3, 4)]);
        let expected_average = (1.0 + 1.0 + 1.0 / 3.0 + 0.0) / 4.0;
        assert!((stats.average_clustering - expected_average).abs() < 1e-12);
        // Three closed corners out of 1 + 1 + 3 triads.
        assert!((stats.transitivity - 3.0 / 5.0).abs() < 1e-12);
    }
}
