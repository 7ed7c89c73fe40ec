//! Dense row-major feature matrices and label vectors.

use serde::Serialize;

use crate::error::{Error, Result};

/// Class or cluster identifier.
pub type Label = i64;

/// Ground-truth labels, one per sample.
pub type LabelVector = Vec<Label>;

/// A rectangular matrix of samples (rows) by features (columns).
///
/// Construction validates that there is at least one row, that rows are
/// non-empty, that all rows share the same length, and that every value is
/// finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix from rows, rejecting empty, ragged or non-finite input.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let d = first.len();
        if d == 0 {
            return Err(Error::EmptyInput);
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: bad.len(),
            });
        }
        for (row, values) in rows.iter().enumerate() {
            if let Some(column) = values.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFinite { row, column });
            }
        }
        Ok(Self { rows })
    }

    /// Wrap rows whose shape the caller already guarantees.
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(!rows.is_empty());
        Self { rows }
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Number of features per sample.
    pub fn n_features(&self) -> usize {
        self.rows[0].len()
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Take ownership of the rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[j]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_ragged() {
        assert!(matches!(FeatureMatrix::new(vec![]), Err(Error::EmptyInput)));
        assert!(matches!(
            FeatureMatrix::new(vec![vec![]]),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            FeatureMatrix::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(matches!(
            FeatureMatrix::new(vec![vec![f64::NAN, 1.0], vec![0.0, 2.0]]),
            Err(Error::NonFinite { row: 0, column: 0 })
        ));
        assert!(matches!(
            FeatureMatrix::new(vec![vec![0.0, 1.0], vec![0.0, f64::NEG_INFINITY]]),
            Err(Error::NonFinite { row: 1, column: 1 })
        ));
        assert!(FeatureMatrix::new(vec![vec![f64::MAX, -f64::MAX]]).is_ok());
    }

    #[test]
    fn shape_accessors() {
        let m = FeatureMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.n_samples(), 2);
        assert_eq!(m.n_features(), 3);
        assert_eq!(m.column(1), vec![2.0, 5.0]);
    }
}
