//! Isomap (Tenenbaum, de Silva & Langford, 2000).
//!
//! 1. Connect each point to its `n_neighbors` nearest neighbours (symmetrised,
//!    Euclidean edge weights).
//! 2. Shortest-path (geodesic) distances over that graph via Dijkstra from
//!    every node.
//! 3. Classical MDS on the geodesic distance matrix.
//!
//! If the graph has more than one connected component some geodesic distances
//! are infinite; this is reported as [`Error::DisconnectedGraph`] instead of
//! producing an embedding.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::mds::classical_mds;
use super::traits::{ReductionMethod, Reducer};
use crate::error::{Error, Result};
use crate::util::{self, UnionFind};

/// Default neighbourhood size.
pub const DEFAULT_N_NEIGHBORS: usize = 5;

/// Geodesic-distance embedding.
#[derive(Debug, Clone)]
pub struct Isomap {
    n_components: usize,
    n_neighbors: usize,
}

impl Isomap {
    /// Embed into `n_components` dimensions with default settings.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            n_neighbors: DEFAULT_N_NEIGHBORS,
        }
    }

    /// Set the neighbourhood size of the kNN graph.
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Geodesic distance matrix over the kNN graph of `data`.
    pub fn geodesic_distances(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if self.n_neighbors == 0 {
            return Err(Error::InvalidParameter {
                name: "n_neighbors",
                message: "must be at least 1",
            });
        }
        let n = data.len();
        let k = self.n_neighbors.min(n.saturating_sub(1));
        let dist = util::pairwise_distances(data);

        let mut graph: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut components = UnionFind::new(n);
        for i in 0..n {
            for j in util::k_nearest(&dist, i, k) {
                graph[i].push((j, dist[i][j]));
                graph[j].push((i, dist[i][j]));
                components.union(i, j);
            }
        }

        let count = components.components();
        if count > 1 {
            return Err(Error::DisconnectedGraph { components: count });
        }

        Ok((0..n).map(|src| dijkstra(&graph, src)).collect())
    }
}

impl Reducer for Isomap {
    fn method(&self) -> ReductionMethod {
        ReductionMethod::Isomap
    }

    fn target_dim(&self) -> usize {
        self.n_components
    }

    fn fit_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let (n, _) = super::check_input(data, self.n_components)?;
        if self.n_components > n {
            return Err(Error::InvalidTargetDimension {
                method: "Isomap",
                requested: self.n_components,
                max: n,
            });
        }

        let geodesic = self.geodesic_distances(data)?;
        tracing::debug!(n, n_neighbors = self.n_neighbors, "isomap graph connected");
        Ok(classical_mds(&geodesic, self.n_components))
    }
}

#[derive(Debug, PartialEq)]
struct Visit {
    cost: f64,
    node: usize,
}

impl Eq for Visit {}

impl Ord for Visit {
    // Reversed so `BinaryHeap` pops the cheapest node first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &[Vec<(usize, f64)>], src: usize) -> Vec<f64> {
    let mut best = vec![f64::INFINITY; graph.len()];
    let mut heap = BinaryHeap::new();
    best[src] = 0.0;
    heap.push(Visit { cost: 0.0, node: src });

    while let Some(Visit { cost, node }) = heap.pop() {
        if cost > best[node] {
            continue;
        }
        for &(next, w) in &graph[node] {
            let cand = cost + w;
            if cand < best[next] {
                best[next] = cand;
                heap.push(Visit {
                    cost: cand,
                    node: next,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geodesics_follow_the_chain() {
        // Points on an L: the geodesic from end to end walks around the corner.
        let data = vec![
            vec![0.0, 2.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![2.0, 0.0],
        ];
        let g = Isomap::new(1).with_n_neighbors(1).geodesic_distances(&data).unwrap();
        assert!((g[0][4] - 4.0).abs() < 1e-12);
        assert!((g[1][3] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn unrolls_a_line() {
        let data: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64, (i as f64).sin() * 0.01]).collect();
        let out = Isomap::new(1).with_n_neighbors(2).fit_transform(&data).unwrap();
        assert_eq!(out.len(), 8);
        // Monotone along the line, up to a global sign flip.
        let increasing = out.windows(2).all(|w| w[1][0] > w[0][0]);
        let decreasing = out.windows(2).all(|w| w[1][0] < w[0][0]);
        assert!(increasing || decreasing, "{out:?}");
    }

    #[test]
    fn disconnected_graph_is_an_error() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![9.0, 9.0],
            vec![9.1, 9.0],
            vec![9.0, 9.1],
        ];
        let err = Isomap::new(2).with_n_neighbors(2).fit_transform(&data).unwrap_err();
        assert!(matches!(err, Error::DisconnectedGraph { components: 2 }));
    }

    #[test]
    fn rejects_dimension_above_sample_count() {
        let data = vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            Isomap::new(3).fit_transform(&data),
            Err(Error::InvalidTargetDimension { max: 2, .. })
        ));
    }
}
