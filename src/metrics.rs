//! Scoring a cluster assignment against ground-truth labels.
//!
//! Cluster ids are compared to class ids by raw value; no relabeling step maps
//! clusters onto their best-matching classes first. A perfect partition whose
//! ids happen to be permuted therefore scores low on accuracy and F1. [`purity`]
//! is the permutation-invariant view of the same assignment.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::matrix::Label;

/// The four per-run metrics reported in the result table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    /// Fraction of positions where prediction equals truth.
    pub accuracy: f64,
    /// Micro-averaged F1 over every identifier value.
    pub f1: f64,
    /// Mean squared difference of identifiers taken as numbers.
    pub mse: f64,
    /// Mean absolute difference of identifiers taken as numbers.
    pub mae: f64,
}

impl Scores {
    /// Score `predicted` against `truth`.
    pub fn compute(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        check_lengths(truth, predicted)?;
        Ok(Self {
            accuracy: accuracy(truth, predicted),
            f1: f1_micro(truth, predicted),
            mse: mean_squared_error(truth, predicted),
            mae: mean_absolute_error(truth, predicted),
        })
    }
}

fn check_lengths(truth: &[Label], predicted: &[Label]) -> Result<()> {
    if truth.is_empty() {
        return Err(Error::EmptyInput);
    }
    if truth.len() != predicted.len() {
        return Err(Error::LabelCountMismatch {
            n_samples: predicted.len(),
            n_labels: truth.len(),
        });
    }
    Ok(())
}

/// Fraction of positions where `predicted[i] == truth[i]`.
pub fn accuracy(truth: &[Label], predicted: &[Label]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    hits as f64 / truth.len() as f64
}

/// Micro-averaged F1: true/false positives and false negatives are pooled over
/// every identifier seen in either vector before taking `2TP / (2TP + FP + FN)`.
pub fn f1_micro(truth: &[Label], predicted: &[Label]) -> f64 {
    let classes: BTreeSet<Label> = truth.iter().chain(predicted).copied().collect();
    let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
    for &c in &classes {
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t == c, p == c) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
    }
    let denom = 2 * tp + fp + fn_;
    if denom == 0 {
        return 0.0;
    }
    (2 * tp) as f64 / denom as f64
}

/// Mean of `(predicted - truth)²`.
pub fn mean_squared_error(truth: &[Label], predicted: &[Label]) -> f64 {
    mean_of(truth, predicted, |d| d * d)
}

/// Mean of `|predicted - truth|`.
pub fn mean_absolute_error(truth: &[Label], predicted: &[Label]) -> f64 {
    mean_of(truth, predicted, f64::abs)
}

fn mean_of(truth: &[Label], predicted: &[Label], f: impl Fn(f64) -> f64) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let total: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(&t, &p)| f(p as f64 - t as f64))
        .sum();
    total / truth.len() as f64
}

/// Cluster purity: each cluster votes for its majority class, and the
/// fraction of samples that agree with their cluster's vote is returned.
///
/// Invariant to how cluster ids are numbered. Noise counts as one cluster.
pub fn purity(truth: &[Label], predicted: &[Label]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let mut table: HashMap<Label, HashMap<Label, usize>> = HashMap::new();
    for (&t, &p) in truth.iter().zip(predicted) {
        *table.entry(p).or_default().entry(t).or_default() += 1;
    }
    let agree: usize = table
        .values()
        .map(|counts| counts.values().copied().max().unwrap_or(0))
        .sum();
    agree as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_match() {
        let y = vec![0, 1, 2, 1, 0];
        let s = Scores::compute(&y, &y).unwrap();
        assert_eq!(s.accuracy, 1.0);
        assert_eq!(s.f1, 1.0);
        assert_eq!(s.mse, 0.0);
        assert_eq!(s.mae, 0.0);
    }

    #[test]
    fn swapped_ids_score_low_but_pure() {
        let truth = vec![0, 0, 1, 1];
        let pred = vec![1, 1, 0, 0];
        let s = Scores::compute(&truth, &pred).unwrap();
        assert_eq!(s.accuracy, 0.0);
        assert_eq!(s.f1, 0.0);
        assert_eq!(s.mse, 1.0);
        assert_eq!(s.mae, 1.0);
        assert_eq!(purity(&truth, &pred), 1.0);
    }

    #[test]
    fn noise_counts_as_its_own_identifier() {
        let truth = vec![0, 0, 1, 1];
        let pred = vec![0, -1, 1, 1];
        let s = Scores::compute(&truth, &pred).unwrap();
        assert_eq!(s.accuracy, 0.75);
        // TP = 3, FP = 1 (class -1), FN = 1 (class 0).
        assert!((s.f1 - 0.75).abs() < 1e-12);
        assert_eq!(s.mse, 0.25);
        assert_eq!(s.mae, 0.25);
    }

    #[test]
    fn numeric_errors() {
        let truth = vec![1, 2, 3];
        let pred = vec![3, 2, 0];
        assert!((mean_squared_error(&truth, &pred) - 13.0 / 3.0).abs() < 1e-12);
        assert!((mean_absolute_error(&truth, &pred) - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn purity_of_mixed_clusters() {
        let truth = vec![0, 0, 0, 1, 1, 1];
        let pred = vec![5, 5, 7, 7, 7, 7];
        assert!((purity(&truth, &pred) - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(matches!(
            Scores::compute(&[0, 1], &[0]),
            Err(Error::LabelCountMismatch { .. })
        ));
        assert!(matches!(Scores::compute(&[], &[]), Err(Error::EmptyInput)));
    }
}
