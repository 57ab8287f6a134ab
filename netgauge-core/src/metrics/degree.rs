//! Degree-derived statistics: summary moments, assortativity and core
//! numbers.

/// Per-node degrees, indexed like the adjacency lists.
pub(crate) fn degrees(adjacency: &[Vec<usize>]) -> Vec<usize> {
    adjacency.iter().map(Vec::len).collect()
}

/// Mean degree, or NaN for an empty slice.
pub(crate) fn mean_degree(degrees: &[usize]) -> f64 {
    if degrees.is_empty() {
        return f64::NAN;
    }
    degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
}

/// Mean of `d(v) / (N - 1)`; every node scores 1 when `N <= 1`.
pub(crate) fn mean_degree_centrality(degrees: &[usize]) -> f64 {
    let n = degrees.len();
    if n <= 1 {
        return 1.0;
    }
    mean_degree(degrees) / (n - 1) as f64
}

/// Pearson correlation between the degrees at either end of every edge.
///
/// Each edge contributes both orientations, so the two marginals coincide.
/// Sums are kept in integers and the result is NaN when the degree variance
/// over edge ends is zero (regular graphs, a single edge).
pub(crate) fn degree_assortativity(
    degrees: &[usize],
    edges: impl Iterator<Item = (usize, usize)>,
) -> f64 {
    let mut edge_count: i128 = 0;
    let mut sum: i128 = 0;
    let mut sum_squares: i128 = 0;
    let mut sum_products: i128 = 0;
    for (source, target) in edges {
        let (Some(&left), Some(&right)) = (degrees.get(source), degrees.get(target)) else {
            continue;
        };
        let (left, right) = (left as i128, right as i128);
        edge_count += 1;
        sum += left + right;
        sum_squares += left * left + right * right;
        sum_products += left * right;
    }

    // Both moments scaled by (2m)^2 so the ratio stays exact until the final
    // division.
    let numerator = 4 * edge_count * sum_products - sum * sum;
    let denominator = 2 * edge_count * sum_squares - sum * sum;
    if denominator == 0 {
        return f64::NAN;
    }
    numerator as f64 / denominator as f64
}

/// Core number of every node via bucket-sorted peeling.
pub(crate) fn core_numbers(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut degree = degrees(adjacency);
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // bin[d] = first slot in `order` holding a node of degree d.
    let mut bin = vec![0usize; max_degree + 1];
    for &d in &degree {
        bin[d] += 1;
    }
    let mut start = 0;
    for slot in &mut bin {
        let count = *slot;
        *slot = start;
        start += count;
    }

    let mut position = vec![0usize; n];
    let mut order = vec![0usize; n];
    for (node, &d) in degree.iter().enumerate() {
        position[node] = bin[d];
        order[bin[d]] = node;
        bin[d] += 1;
    }
    for d in (1..=max_degree).rev() {
        bin[d] = bin[d - 1];
    }
    if let Some(first) = bin.first_mut() {
        *first = 0;
    }

    for i in 0..n {
        let node = order[i];
        for &neighbour in &adjacency[node] {
            if degree[neighbour] > degree[node] {
                let neighbour_degree = degree[neighbour];
                let first_slot = bin[neighbour_degree];
                let first_node = order[first_slot];
                if neighbour != first_node {
                    let neighbour_slot = position[neighbour];
                    position[neighbour] = first_slot;
                    order[first_slot] = neighbour;
                    position[first_node] = neighbour_slot;
                    order[neighbour_slot] = first_node;
                }
                bin[neighbour_degree] += 1;
                degree[neighbour] -= 1;
            }
        }
    }
    degree
}

/// Number of nodes in the innermost (highest-order) k-core.
pub(crate) fn innermost_core_size(core_numbers: &[usize]) -> usize {
    let Some(&max_core) = core_numbers.iter().max() else {
        return 0;
    };
    core_numbers.iter().filter(|&&core| core >= max_core).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::network::{Network, NodeId};

    fn adjacency(edges: &[(NodeId, NodeId)]) -> Vec<Vec<usize>> {
        Network::from_edges(edges.iter().copied()).adjacency()
    }

    #[rstest]
    fn core_numbers_of_triangle_with_tail() {
        // Triangle 1-2-3 with a tail 3-4-5.
        let adjacency = adjacency(&[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5)]);
        assert_eq!(core_numbers(&adjacency), vec![2, 2, 2, 1, 1]);
        assert_eq!(innermost_core_size(&core_numbers(&adjacency)), 3);
    }

    #[rstest]
    fn core_numbers_of_clique_with_pendant() {
        let mut edges = Vec::new();
        for a in 0..4 {
            for b in (a + 1)..4 {
                edges.push((a, b));
            }
        }
        edges.push((0, 10));
        let adjacency = adjacency(&edges);
        assert_eq!(core_numbers(&adjacency), vec![3, 3, 3, 3, 1]);
    }

    #[rstest]
    fn star_is_disassortative() {
        let network = Network::from_edges([(0, 1), (0, 2), (0, 3), (0, 4)]);
        let adjacency = network.adjacency();
        let degrees = degrees(&adjacency);
        let r = degree_assortativity(&degrees, network.edge_indices());
        assert!((r + 1.0).abs() < 1e-12, "star assortativity was {r}");
    }

    #[rstest]
    fn regular_graph_assortativity_is_nan() {
        let network = Network::from_edges([(1, 2), (2, 3), (3, 4), (4, 1)]);
        let adjacency = network.adjacency();
        let degrees = degrees(&adjacency);
        assert!(degree_assortativity(&degrees, network.edge_indices()).is_nan());
    }

    #[rstest]
    fn path_assortativity_matches_reference_value() {
        // Path of five nodes: degree pairs (1,2),(2,2),(2,2),(2,1).
        let network = Network::from_edges([(1, 2), (2, 3), (3, 4), (4, 5)]);
        let adjacency = network.adjacency();
        let degrees = degrees(&adjacency);
        let r = degree_assortativity(&degrees, network.edge_indices());
        assert!((r + 1.0 / 3.0).abs() < 1e-12, "path assortativity was {r}");
    }

    #[rstest]
    #[case::single_node(&[0], 1.0)]
    #[case::pair(&[1, 1], 1.0)]
    #[case::path(&[1, 2, 1], 2.0 / 3.0)]
    fn degree_centrality_mean(#[case] degrees: &[usize], #[case] expected: f64) {
        assert!((mean_degree_centrality(degrees) - expected).abs() < 1e-12);
    }
}
