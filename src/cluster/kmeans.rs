//! K-means clustering (Lloyd's algorithm with k-means++ seeding).
//!
//! Each iteration assigns every point to its nearest centroid, then moves each
//! centroid to the mean of its points. Iteration stops when no assignment
//! changes, when the largest centroid shift drops below `tol`, or after
//! `max_iter` rounds. Hitting the cap is not an error; the last assignment is
//! returned.
//!
//! Seeding follows Arthur & Vassilvitskii (2007): the first centroid is a
//! uniformly random point, each next one is drawn with probability proportional
//! to its squared distance from the nearest centroid chosen so far.

use rand::prelude::*;

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::matrix::Label;
use crate::util;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Default convergence tolerance on the largest centroid shift.
pub const DEFAULT_TOL: f64 = 1e-4;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    seed: Option<u64>,
}

/// A fitted k-means model.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centroids, `k` rows.
    pub centroids: Vec<Vec<f64>>,
    /// Cluster index per input point, each in `0..k`.
    pub labels: Vec<Label>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
    /// Number of Lloyd iterations performed.
    pub n_iter: usize,
    /// Whether iteration stopped before the cap.
    pub converged: bool,
}

impl Kmeans {
    /// Create a k-means clusterer with `k` clusters and default settings.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            seed: None,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the centroid-shift tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Seed the initial centroid choice.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Optionally seed the initial centroid choice.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Check parameters against a dataset of `n_items` points.
    pub fn validate(&self, n_items: usize) -> Result<()> {
        if self.k == 0 || self.k > n_items {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be non-negative and finite",
            });
        }
        Ok(())
    }

    /// Fit the model and return centroids, labels and diagnostics.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        self.validate(n)?;
        let d = data[0].len();
        if let Some(bad) = data.iter().find(|p| p.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: bad.len(),
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let mut centroids = plus_plus_init(data, self.k, rng.as_mut());
        let mut labels: Vec<Label> = vec![-1; n];
        let mut n_iter = 0;
        let mut converged = false;

        while n_iter < self.max_iter {
            n_iter += 1;

            let mut changed = false;
            for (i, p) in data.iter().enumerate() {
                let (c, _) = nearest(&centroids, p);
                let c = c as Label;
                if labels[i] != c {
                    labels[i] = c;
                    changed = true;
                }
            }
            if !changed {
                converged = true;
                break;
            }

            let mut sums = vec![vec![0.0; d]; self.k];
            let mut counts = vec![0usize; self.k];
            for (p, &l) in data.iter().zip(labels.iter()) {
                let l = l as usize;
                counts[l] += 1;
                for (s, x) in sums[l].iter_mut().zip(p.iter()) {
                    *s += x;
                }
            }

            let mut max_shift: f64 = 0.0;
            for c in 0..self.k {
                // Empty clusters keep their previous centroid.
                if counts[c] == 0 {
                    continue;
                }
                let inv = 1.0 / counts[c] as f64;
                let next: Vec<f64> = sums[c].iter().map(|s| s * inv).collect();
                max_shift = max_shift.max(util::euclidean(&next, &centroids[c]));
                centroids[c] = next;
            }

            if max_shift <= self.tol {
                // Centroids settled; refresh labels against the final positions.
                for (i, p) in data.iter().enumerate() {
                    labels[i] = nearest(&centroids, p).0 as Label;
                }
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(max_iter = self.max_iter, "k-means hit its iteration cap");
        }

        let inertia = data
            .iter()
            .zip(labels.iter())
            .map(|(p, &l)| util::squared_euclidean(p, &centroids[l as usize]))
            .sum();

        tracing::debug!(k = self.k, n_iter, inertia, "k-means finished");
        Ok(KmeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
            converged,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<Label>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }

    fn describe(&self) -> String {
        format!("KMeans(k={})", self.k)
    }
}

/// Index of and squared distance to the closest centroid.
fn nearest(centroids: &[Vec<f64>], p: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = util::squared_euclidean(p, centroid);
        if dist < best.1 {
            best = (c, dist);
        }
    }
    best
}

fn plus_plus_init(data: &[Vec<f64>], k: usize, rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    let mut chosen = vec![false; n];

    let first = rng.random_range(0..n);
    chosen[first] = true;
    centroids.push(data[first].clone());

    let mut min_dist: Vec<f64> = data
        .iter()
        .map(|p| util::squared_euclidean(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_dist.iter().sum();
        let next = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut pick = None;
            for (i, &w) in min_dist.iter().enumerate() {
                acc += w;
                if w > 0.0 && acc >= target {
                    pick = Some(i);
                    break;
                }
            }
            // Rounding can leave `acc` a hair below `target`.
            pick.or_else(|| min_dist.iter().rposition(|&w| w > 0.0))
        } else {
            None
        };
        // All remaining points coincide with a centroid: take any unchosen one.
        let idx = match next {
            Some(i) => i,
            None => (0..n).find(|&i| !chosen[i]).unwrap_or(first),
        };

        chosen[idx] = true;
        centroids.push(data[idx].clone());
        for (p, m) in data.iter().zip(min_dist.iter_mut()) {
            *m = m.min(util::squared_euclidean(p, &data[idx]));
        }
    }
    centroids
}
