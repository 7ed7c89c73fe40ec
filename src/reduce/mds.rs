//! Multidimensional scaling.
//!
//! [`StressMds`] is metric MDS by stress majorization (SMACOF, de Leeuw 1977).
//! Starting from a random configuration, each iteration applies the Guttman
//! transform
//!
//! ```text
//! X' = (1/n) B(X) X
//! b_ij = -δ_ij / d_ij(X)     (i ≠ j, d_ij > 0)
//! b_ii = -Σ_{j≠i} b_ij
//! ```
//!
//! which never increases the raw stress `σ(X) = Σ_{i<j} (d_ij(X) - δ_ij)²`.
//! Iteration stops once the relative decrease of σ falls below `tol`, or after
//! `max_iter` rounds.
//!
//! [`classical_mds`] (Torgerson scaling) is the closed-form variant used by
//! Isomap on geodesic distances.

use nalgebra::DMatrix;
use rand::prelude::*;

use super::traits::{ReductionMethod, Reducer};
use crate::error::{Error, Result};
use crate::util;

/// Default SMACOF iteration cap.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Default relative stress-decrease tolerance.
pub const DEFAULT_TOL: f64 = 1e-3;

/// Metric MDS by stress majorization.
#[derive(Debug, Clone)]
pub struct StressMds {
    n_components: usize,
    max_iter: usize,
    tol: f64,
    seed: Option<u64>,
}

/// Result of a SMACOF run.
#[derive(Debug, Clone)]
pub struct MdsFit {
    /// Final configuration, one row per input point.
    pub embedding: Vec<Vec<f64>>,
    /// Raw stress of `embedding`.
    pub stress: f64,
    /// Number of iterations performed.
    pub n_iter: usize,
    /// Whether the tolerance was met before the cap.
    pub converged: bool,
}

impl StressMds {
    /// Embed into `n_components` dimensions with default settings.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
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

    /// Set the relative stress-decrease tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Seed the random initial configuration.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Optionally seed the random initial configuration.
    pub fn with_seed_opt(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Run SMACOF on the Euclidean distances between rows of `data`.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<MdsFit> {
        super::check_input(data, self.n_components)?;
        let delta = util::pairwise_distances(data);
        self.fit_dissimilarities(&delta)
    }

    /// Run SMACOF on a precomputed symmetric dissimilarity matrix.
    pub fn fit_dissimilarities(&self, delta: &[Vec<f64>]) -> Result<MdsFit> {
        let n = delta.len();
        let d = self.n_components;
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some(bad) = delta.iter().find(|r| r.len() != n) {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: bad.len(),
            });
        }
        if d == 0 {
            return Err(Error::InvalidParameter {
                name: "n_components",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let mut x: Vec<Vec<f64>> = (0..n)
            .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
            .collect();

        let mut prev: Option<f64> = None;
        let mut n_iter = 0;
        let mut converged = false;
        let mut stress = f64::INFINITY;

        while n_iter < self.max_iter {
            n_iter += 1;

            let dist = util::pairwise_distances(&x);
            stress = raw_stress(&dist, delta);
            if !stress.is_finite() {
                return Err(Error::Convergence {
                    method: "MDS",
                    message: format!("stress became {stress} at iteration {n_iter}"),
                });
            }
            if let Some(p) = prev {
                if p - stress <= self.tol * p {
                    converged = true;
                    break;
                }
            }
            if stress == 0.0 {
                converged = true;
                break;
            }
            prev = Some(stress);

            x = guttman_transform(&x, &dist, delta);
        }

        if converged {
            tracing::debug!(n_iter, stress, "SMACOF converged");
        } else {
            // Stress of the configuration actually returned.
            stress = raw_stress(&util::pairwise_distances(&x), delta);
            tracing::warn!(max_iter = self.max_iter, stress, "SMACOF hit its iteration cap");
        }

        Ok(MdsFit {
            embedding: x,
            stress,
            n_iter,
            converged,
        })
    }
}

impl Reducer for StressMds {
    fn method(&self) -> ReductionMethod {
        ReductionMethod::Mds
    }

    fn target_dim(&self) -> usize {
        self.n_components
    }

    fn fit_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(self.fit(data)?.embedding)
    }
}

fn raw_stress(dist: &[Vec<f64>], delta: &[Vec<f64>]) -> f64 {
    let n = dist.len();
    let mut s = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let r = dist[i][j] - delta[i][j];
            s += r * r;
        }
    }
    s
}

fn guttman_transform(x: &[Vec<f64>], dist: &[Vec<f64>], delta: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = x.len();
    let d = x[0].len();
    let inv_n = 1.0 / n as f64;
    let mut out = vec![vec![0.0; d]; n];

    for i in 0..n {
        let mut b_ii = 0.0;
        for j in 0..n {
            if j == i || dist[i][j] <= 0.0 {
                continue;
            }
            let b_ij = -delta[i][j] / dist[i][j];
            b_ii -= b_ij;
            for c in 0..d {
                out[i][c] += b_ij * x[j][c];
            }
        }
        for c in 0..d {
            out[i][c] = (out[i][c] + b_ii * x[i][c]) * inv_n;
        }
    }
    out
}

/// Classical (Torgerson) MDS of a symmetric distance matrix.
///
/// Double-centres the squared distances and scales the top `d` eigenvectors by
/// the square roots of their (clamped non-negative) eigenvalues. `d` must not
/// exceed the number of points.
pub(crate) fn classical_mds(dist: &[Vec<f64>], d: usize) -> Vec<Vec<f64>> {
    let n = dist.len();
    let sq = DMatrix::from_fn(n, n, |i, j| dist[i][j] * dist[i][j]);
    let row_means: Vec<f64> = (0..n).map(|i| sq.row(i).mean()).collect();
    let grand = row_means.iter().sum::<f64>() / n as f64;
    // `sq` is symmetric, so column means equal row means.
    let b = DMatrix::from_fn(n, n, |i, j| {
        -0.5 * (sq[(i, j)] - row_means[i] - row_means[j] + grand)
    });

    let pairs = util::sorted_eigenpairs(b, false);
    (0..n)
        .map(|i| {
            pairs[..d]
                .iter()
                .map(|(val, vec)| vec[i] * val.max(0.0).sqrt())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn classical_recovers_planar_distances() {
        let data = square();
        let dist = util::pairwise_distances(&data);
        let emb = classical_mds(&dist, 2);
        let back = util::pairwise_distances(&emb);
        for i in 0..4 {
            for j in 0..4 {
                assert!((back[i][j] - dist[i][j]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn smacof_reduces_stress() {
        let data = square();
        let one = StressMds::new(2).with_seed(11).with_max_iter(1).fit(&data).unwrap();
        let many = StressMds::new(2)
            .with_seed(11)
            .with_tol(0.0)
            .with_max_iter(200)
            .fit(&data)
            .unwrap();
        assert_eq!(many.embedding.len(), 4);
        assert!(many.embedding.iter().all(|r| r.len() == 2));
        assert!(many.stress <= one.stress, "{} > {}", many.stress, one.stress);
    }

    #[test]
    fn smacof_seed_is_deterministic() {
        let data = square();
        let a = StressMds::new(2).with_seed(5).fit_transform(&data).unwrap();
        let b = StressMds::new(2).with_seed(5).fit_transform(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn smacof_respects_iteration_cap() {
        let fit = StressMds::new(1)
            .with_seed(2)
            .with_max_iter(3)
            .with_tol(0.0)
            .fit(&square())
            .unwrap();
        assert!(fit.n_iter <= 3);
        assert_eq!(fit.embedding.len(), 4);
    }

    #[test]
    fn single_point() {
        let fit = StressMds::new(2).with_seed(0).fit(&[vec![1.0, 2.0]]).unwrap();
        assert_eq!(fit.embedding.len(), 1);
        assert_eq!(fit.stress, 0.0);
    }
}
