//! Locally linear embedding (Roweis & Saul, 2000).
//!
//! Every point is reconstructed from its `n_neighbors` nearest neighbours with
//! weights that sum to one. The weights solve `C w = 1` for the local Gram
//! matrix `C`, regularised by `reg · trace(C)` so that neighbourhoods larger
//! than the input dimension stay solvable. The embedding is the set of bottom
//! eigenvectors of `M = (I - W)ᵀ (I - W)`, skipping the constant one.

use nalgebra::{DMatrix, DVector};

use super::traits::{ReductionMethod, Reducer};
use crate::error::{Error, Result};
use crate::util;

/// Default neighbourhood size.
pub const DEFAULT_N_NEIGHBORS: usize = 5;

/// Default Gram-matrix regularisation factor.
pub const DEFAULT_REG: f64 = 1e-3;

/// Locally linear embedding.
#[derive(Debug, Clone)]
pub struct Lle {
    n_components: usize,
    n_neighbors: usize,
    reg: f64,
}

impl Lle {
    /// Embed into `n_components` dimensions with default settings.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            n_neighbors: DEFAULT_N_NEIGHBORS,
            reg: DEFAULT_REG,
        }
    }

    /// Set the neighbourhood size.
    pub fn with_n_neighbors(mut self, n_neighbors: usize) -> Self {
        self.n_neighbors = n_neighbors;
        self
    }

    /// Set the regularisation factor.
    pub fn with_reg(mut self, reg: f64) -> Self {
        self.reg = reg;
        self
    }

    /// Reconstruction weights, row `i` holding the weights of point `i`'s neighbours.
    pub fn reconstruction_weights(&self, data: &[Vec<f64>]) -> Result<DMatrix<f64>> {
        if self.n_neighbors == 0 {
            return Err(Error::InvalidParameter {
                name: "n_neighbors",
                message: "must be at least 1",
            });
        }
        if !(self.reg.is_finite() && self.reg > 0.0) {
            return Err(Error::InvalidParameter {
                name: "reg",
                message: "must be positive and finite",
            });
        }

        let n = data.len();
        let k = self.n_neighbors.min(n.saturating_sub(1));
        let dist = util::pairwise_distances(data);
        let mut w = DMatrix::<f64>::zeros(n, n);
        if k == 0 {
            return Ok(w);
        }

        let ones = DVector::<f64>::from_element(k, 1.0);
        for i in 0..n {
            let nbrs = util::k_nearest(&dist, i, k);
            let gram = DMatrix::from_fn(k, k, |a, b| {
                data[nbrs[a]]
                    .iter()
                    .zip(&data[nbrs[b]])
                    .zip(&data[i])
                    .map(|((xa, xb), xi)| (xa - xi) * (xb - xi))
                    .sum::<f64>()
            });
            let trace = gram.trace();
            let shift = if trace > 0.0 { self.reg * trace } else { self.reg };
            let gram = gram + DMatrix::<f64>::identity(k, k) * shift;

            let sol = gram.lu().solve(&ones).ok_or_else(|| Error::Convergence {
                method: "LLE",
                message: format!("singular neighbourhood system at point {i}"),
            })?;
            let total = sol.sum();
            if !total.is_finite() || total.abs() < f64::EPSILON {
                return Err(Error::Convergence {
                    method: "LLE",
                    message: format!("degenerate reconstruction weights at point {i}"),
                });
            }
            for (a, &j) in nbrs.iter().enumerate() {
                w[(i, j)] = sol[a] / total;
            }
        }
        Ok(w)
    }
}

impl Reducer for Lle {
    fn method(&self) -> ReductionMethod {
        ReductionMethod::Lle
    }

    fn target_dim(&self) -> usize {
        self.n_components
    }

    fn fit_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let (n, _) = super::check_input(data, self.n_components)?;
        // The bottom eigenvector is discarded, so d + 1 eigenpairs are needed.
        if self.n_components + 1 > n {
            return Err(Error::InvalidTargetDimension {
                method: "LLE",
                requested: self.n_components,
                max: n - 1,
            });
        }

        let w = self.reconstruction_weights(data)?;
        let i_minus_w = DMatrix::<f64>::identity(n, n) - w;
        let m = i_minus_w.transpose() * &i_minus_w;

        let pairs = util::sorted_eigenpairs(m, true);
        let out: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                pairs[1..=self.n_components]
                    .iter()
                    .map(|(_, vec)| vec[i])
                    .collect()
            })
            .collect();

        if out.iter().flatten().any(|x| !x.is_finite()) {
            return Err(Error::Convergence {
                method: "LLE",
                message: "eigendecomposition produced non-finite coordinates".to_string(),
            });
        }
        tracing::debug!(
            n,
            n_neighbors = self.n_neighbors,
            residual = pairs[1].0,
            "lle embedding computed"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> Vec<Vec<f64>> {
        (0..12)
            .map(|i| {
                let t = i as f64 * 0.3;
                vec![t.cos(), t.sin(), 0.1 * t]
            })
            .collect()
    }

    #[test]
    fn weights_sum_to_one() {
        let w = Lle::new(1).with_n_neighbors(3).reconstruction_weights(&curve()).unwrap();
        for i in 0..w.nrows() {
            let s: f64 = w.row(i).sum();
            assert!((s - 1.0).abs() < 1e-9, "row {i} sums to {s}");
            assert_eq!(w[(i, i)], 0.0);
        }
    }

    #[test]
    fn output_shape() {
        let out = Lle::new(2).with_n_neighbors(4).fit_transform(&curve()).unwrap();
        assert_eq!(out.len(), 12);
        assert!(out.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn duplicate_points_stay_solvable() {
        let data = vec![vec![0.5, 0.5]; 6];
        let out = Lle::new(1).with_n_neighbors(3).fit_transform(&data).unwrap();
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn rejects_dimension_without_room() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert!(matches!(
            Lle::new(3).fit_transform(&data),
            Err(Error::InvalidTargetDimension { max: 2, .. })
        ));
    }
}
