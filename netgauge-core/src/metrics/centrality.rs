//! Sampled betweenness and power-iteration eigenvector centrality.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::index;

use crate::error::CentralityError;

/// Picks `samples` distinct source nodes, or every node when `samples >= n`.
pub(crate) fn choose_sources<R: Rng + ?Sized>(n: usize, samples: usize, rng: &mut R) -> Vec<usize> {
    if samples >= n {
        return (0..n).collect();
    }
    index::sample(rng, n, samples).into_vec()
}

/// Normalised betweenness centrality estimated from `sources`.
///
/// Brandes' dependency accumulation runs from each source. With `k` sources
/// on `n > 2` nodes every score is scaled by `n / (k (n - 1) (n - 2))`, which
/// is the exact normalisation when `k == n` and an unbiased estimate
/// otherwise. Graphs with two or fewer nodes keep the raw (zero) scores.
pub(crate) fn sampled_betweenness(adjacency: &[Vec<usize>], sources: &[usize]) -> Vec<f64> {
    let n = adjacency.len();
    let mut centrality = vec![0.0; n];
    if n == 0 || sources.is_empty() {
        return centrality;
    }

    let mut stack = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut distance = vec![-1_i64; n];
    let mut delta = vec![0.0_f64; n];
    let mut queue = VecDeque::with_capacity(n);

    for &source in sources {
        stack.clear();
        for list in &mut predecessors {
            list.clear();
        }
        sigma.fill(0.0);
        distance.fill(-1);
        delta.fill(0.0);

        sigma[source] = 1.0;
        distance[source] = 0;
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            stack.push(node);
            let next_distance = distance[node] + 1;
            for &next in &adjacency[node] {
                if distance[next] < 0 {
                    distance[next] = next_distance;
                    queue.push_back(next);
                }
                if distance[next] == next_distance {
                    sigma[next] += sigma[node];
                    predecessors[next].push(node);
                }
            }
        }

        while let Some(node) = stack.pop() {
            let coefficient = (1.0 + delta[node]) / sigma[node];
            for &predecessor in &predecessors[node] {
                delta[predecessor] += sigma[predecessor] * coefficient;
            }
            if node != source {
                centrality[node] += delta[node];
            }
        }
    }

    if n > 2 {
        let scale = n as f64 / (sources.len() as f64 * ((n - 1) * (n - 2)) as f64);
        for value in &mut centrality {
            *value *= scale;
        }
    }
    centrality
}

/// Eigenvector centrality by power iteration on `A + I`.
///
/// Starts from the uniform vector (summing to one), L2-normalises after every
/// step and stops once the L1 change drops below `n * tolerance`.
///
/// # Errors
/// Returns [`CentralityError::EmptyGraph`] for a graph without nodes and
/// [`CentralityError::NonConvergence`] when `max_iter` steps do not reach the
/// tolerance.
pub(crate) fn eigenvector_centrality(
    adjacency: &[Vec<usize>],
    max_iter: usize,
    tolerance: f64,
) -> Result<Vec<f64>, CentralityError> {
    let n = adjacency.len();
    if n == 0 {
        return Err(CentralityError::EmptyGraph);
    }

    let mut current = vec![1.0 / n as f64; n];
    let threshold = n as f64 * tolerance;
    for _ in 0..max_iter {
        let previous = current.clone();
        for (node, neighbours) in adjacency.iter().enumerate() {
            let weight = previous[node];
            for &neighbour in neighbours {
                current[neighbour] += weight;
            }
        }

        let norm = current.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for value in &mut current {
            *value /= norm;
        }

        let change: f64 = current
            .iter()
            .zip(&previous)
            .map(|(now, before)| (now - before).abs())
            .sum();
        if change < threshold {
            return Ok(current);
        }
    }
    Err(CentralityError::NonConvergence {
        iterations: max_iter,
    })
}
