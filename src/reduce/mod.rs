//! Dimensionality reduction.
//!
//! Four embeddings with a shared [`Reducer`] interface, each mapping an `n × p`
//! matrix to `n × d`:
//!
//! | Method | Preserves | Deterministic |
//! |---|---|---|
//! | [`Pca`] | global variance (linear) | yes |
//! | [`StressMds`] | pairwise Euclidean distances | with a seed |
//! | [`Isomap`] | geodesic distances on a kNN graph | yes |
//! | [`Lle`] | local linear reconstruction weights | yes |
//!
//! Failures are named errors ([`Error::InvalidTargetDimension`],
//! [`Error::DisconnectedGraph`], [`Error::Convergence`]); no method returns a
//! degenerate embedding silently.
//!
//! ```rust
//! use clusterbench::reduce::{Pca, Reducer};
//!
//! let data = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.1]];
//! let out = Pca::new(1).fit_transform(&data).unwrap();
//! assert_eq!(out.len(), 3);
//! assert_eq!(out[0].len(), 1);
//! ```

pub mod isomap;
pub mod lle;
pub mod mds;
pub mod pca;
mod traits;

pub use isomap::Isomap;
pub use lle::Lle;
pub use mds::{MdsFit, StressMds};
pub use pca::{Pca, PcaFit};
pub use traits::{ReductionMethod, Reducer};

use crate::error::{Error, Result};

/// Validate a rectangular, non-empty input and a positive target dimension.
///
/// Returns `(n_samples, n_features)`.
pub(crate) fn check_input(data: &[Vec<f64>], target_dim: usize) -> Result<(usize, usize)> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let p = first.len();
    if p == 0 {
        return Err(Error::EmptyInput);
    }
    if let Some(bad) = data.iter().find(|r| r.len() != p) {
        return Err(Error::DimensionMismatch {
            expected: p,
            found: bad.len(),
        });
    }
    if target_dim == 0 {
        return Err(Error::InvalidParameter {
            name: "target_dim",
            message: "must be at least 1",
        });
    }
    Ok((data.len(), p))
}
