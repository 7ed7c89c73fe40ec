//! Min-max feature scaling.
//!
//! Distance-based algorithms (DBSCAN's `eps`, k-means, every embedding here) are
//! dominated by the widest-ranged feature unless columns share a scale. Each
//! column is mapped linearly so its minimum becomes 0 and its maximum becomes 1:
//!
//! ```text
//! x' = (x - min) / (max - min)
//! ```
//!
//! A constant column has no range; it maps to 0 everywhere. Bounds and values
//! are halved before subtracting, so columns spanning most of the `f64` range
//! do not overflow.

use crate::matrix::FeatureMatrix;

/// Rescale every column of `data` into `[0, 1]`.
pub fn min_max(data: &FeatureMatrix) -> FeatureMatrix {
    let d = data.n_features();
    let mut lo = vec![f64::INFINITY; d];
    let mut hi = vec![f64::NEG_INFINITY; d];
    for row in data.rows() {
        for (j, &x) in row.iter().enumerate() {
            lo[j] = lo[j].min(x);
            hi[j] = hi[j].max(x);
        }
    }

    let rows = data
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(j, &x)| {
                    let range = hi[j] / 2.0 - lo[j] / 2.0;
                    if range > 0.0 {
                        (x / 2.0 - lo[j] / 2.0) / range
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    // Same shape as `data`.
    FeatureMatrix::from_rows_unchecked(rows)
}
