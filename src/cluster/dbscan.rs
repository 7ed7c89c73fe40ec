//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points based on neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum neighborhood size (the point itself included) for a point to be "core".
//! - **Core point**: Has at least MinPts points within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border. Labeled [`NOISE`].
//!
//! ## Algorithm Steps
//!
//! 1. For each unvisited point P, in input order:
//!    - Find neighbors within ε
//!    - If the neighborhood is smaller than MinPts, mark as noise (may change later)
//!    - Else P is core: start new cluster, expand from neighbors
//!
//! 2. Expansion: for each neighbor of a core point:
//!    - Add to cluster unless another cluster already claimed it
//!    - If core, expand from it too
//!
//! A border point reachable from two clusters belongs to whichever cluster
//! reaches it first, so labels are deterministic for a fixed input order.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) naive range queries.
//! - **Space**: O(n) for labels.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::matrix::Label;
use crate::util;

/// Label given to points that belong to no cluster.
///
/// Real cluster ids start at 0, so the sentinel never collides with one.
pub const NOISE: Label = -1;

// Internal label encoding: never assigned yet.
const UNCLASSIFIED: Label = -2;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points to form a dense region.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Minimum neighborhood size.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Check parameters without touching any data.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive and finite",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Find all neighbors within epsilon, in index order.
    fn region_query(&self, data: &[Vec<f64>], point_idx: usize) -> Vec<usize> {
        let point = &data[point_idx];
        data.iter()
            .enumerate()
            .filter(|(idx, other)| {
                *idx != point_idx && util::euclidean(point, other) <= self.epsilon
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn is_core(&self, neighbors: &[usize]) -> bool {
        // MinPts includes the point itself.
        neighbors.len() + 1 >= self.min_pts
    }

    /// Expand cluster from a core point.
    fn expand_cluster(
        &self,
        data: &[Vec<f64>],
        point_idx: usize,
        neighbors: &[usize],
        labels: &mut [Label],
        cluster_id: Label,
        visited: &mut [bool],
    ) {
        labels[point_idx] = cluster_id;

        // Iterative expansion, no recursion.
        let mut to_process: Vec<usize> = neighbors.iter().rev().copied().collect();

        while let Some(neighbor_idx) = to_process.pop() {
            // A point previously labeled NOISE can later become a border point,
            // so claim it before checking `visited`.
            if labels[neighbor_idx] == UNCLASSIFIED || labels[neighbor_idx] == NOISE {
                labels[neighbor_idx] = cluster_id;
            }

            if visited[neighbor_idx] {
                continue;
            }
            visited[neighbor_idx] = true;

            let neighbor_neighbors = self.region_query(data, neighbor_idx);
            if !self.is_core(&neighbor_neighbors) {
                continue;
            }

            for &nn in neighbor_neighbors.iter().rev() {
                if labels[nn] == NOISE {
                    labels[nn] = cluster_id;
                }
                if !visited[nn] {
                    to_process.push(nn);
                }
            }
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<Label>> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        self.validate()?;

        let mut labels = vec![UNCLASSIFIED; n];
        let mut visited = vec![false; n];
        let mut cluster_id: Label = 0;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let neighbors = self.region_query(data, point_idx);

            if !self.is_core(&neighbors) {
                // Not enough neighbors: noise for now, may become a border point.
                labels[point_idx] = NOISE;
                continue;
            }

            self.expand_cluster(
                data,
                point_idx,
                &neighbors,
                &mut labels,
                cluster_id,
                &mut visited,
            );
            cluster_id += 1;
        }

        debug_assert!(labels.iter().all(|&l| l != UNCLASSIFIED));
        tracing::debug!(
            clusters = cluster_id,
            noise = labels.iter().filter(|&&l| l == NOISE).count(),
            "dbscan finished"
        );
        Ok(labels)
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }

    fn describe(&self) -> String {
        format!("DBSCAN(eps={:.3}, min_pts={})", self.epsilon, self.min_pts)
    }
}
