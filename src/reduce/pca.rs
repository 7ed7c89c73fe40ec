//! Principal component analysis.
//!
//! Centre each column, form the sample covariance matrix and project onto the
//! eigenvectors with the largest eigenvalues. Each eigenvector's sign is fixed so
//! that its largest-magnitude entry is positive, which makes the output
//! reproducible across eigensolver runs.

use nalgebra::DMatrix;

use super::traits::{ReductionMethod, Reducer};
use crate::error::{Error, Result};
use crate::util;

/// Linear projection onto the top principal components.
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
}

/// A fitted PCA model.
#[derive(Debug, Clone)]
pub struct PcaFit {
    /// Column means of the training data.
    pub mean: Vec<f64>,
    /// Principal axes, one unit vector per component, strongest first.
    pub components: Vec<Vec<f64>>,
    /// Variance captured by each component.
    pub explained_variance: Vec<f64>,
}

impl Pca {
    /// Project onto `n_components` principal axes.
    pub fn new(n_components: usize) -> Self {
        Self { n_components }
    }

    /// Compute the principal axes of `data`.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<PcaFit> {
        let (n, p) = super::check_input(data, self.n_components)?;
        if self.n_components > p {
            return Err(Error::InvalidTargetDimension {
                method: "PCA",
                requested: self.n_components,
                max: p,
            });
        }

        let mut mean = vec![0.0; p];
        for row in data {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n as f64;
        }

        let centered = DMatrix::from_fn(n, p, |i, j| data[i][j] - mean[j]);
        let denom = n.saturating_sub(1).max(1) as f64;
        let cov = (centered.transpose() * &centered) / denom;

        let (explained_variance, components): (Vec<f64>, Vec<Vec<f64>>) =
            util::sorted_eigenpairs(cov, false)
                .into_iter()
                .take(self.n_components)
                .map(|(val, mut vec)| {
                    let pivot = vec
                        .iter()
                        .copied()
                        .fold(0.0_f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
                    if pivot < 0.0 {
                        vec.iter_mut().for_each(|x| *x = -*x);
                    }
                    (val.max(0.0), vec)
                })
                .unzip();

        Ok(PcaFit {
            mean,
            components,
            explained_variance,
        })
    }
}

impl PcaFit {
    /// Project rows onto the fitted axes.
    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let p = self.mean.len();
        data.iter()
            .map(|row| {
                if row.len() != p {
                    return Err(Error::DimensionMismatch {
                        expected: p,
                        found: row.len(),
                    });
                }
                Ok(self
                    .components
                    .iter()
                    .map(|axis| {
                        row.iter()
                            .zip(&self.mean)
                            .zip(axis)
                            .map(|((x, m), a)| (x - m) * a)
                            .sum()
                    })
                    .collect())
            })
            .collect()
    }
}

impl Reducer for Pca {
    fn method(&self) -> ReductionMethod {
        ReductionMethod::Pca
    }

    fn target_dim(&self) -> usize {
        self.n_components
    }

    fn fit_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fit(data)?.transform(data)
    }
}
