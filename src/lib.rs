//! Clustering-versus-ground-truth benchmarks.
//!
//! `clusterbench` measures how well unsupervised clustering recovers known
//! classes in a labeled dataset, and how that changes under different
//! feature-space representations.
//!
//! A [`Benchmark`] run:
//! 1. min-max scales the features ([`normalize`]);
//! 2. embeds them four ways ([`reduce`]: PCA, SMACOF MDS, Isomap, LLE);
//! 3. runs DBSCAN and k-means ([`cluster`]) on the scaled features and on each
//!    embedding;
//! 4. scores all ten assignments against the labels ([`metrics`]);
//! 5. returns a fixed 10 × 6 [`ResultMatrix`] and a [`VisualizationPayload`].
//!
//! ```rust
//! use clusterbench::{Benchmark, BenchmarkConfig, BenchmarkParams, FeatureMatrix};
//!
//! let features = FeatureMatrix::new(vec![
//!     vec![0.0, 0.1], vec![0.1, 0.0], vec![0.0, 0.0], vec![0.1, 0.1],
//!     vec![5.0, 5.1], vec![5.1, 5.0], vec![5.0, 5.0], vec![5.1, 5.1],
//! ]).unwrap();
//! let labels = vec![0, 0, 0, 0, 1, 1, 1, 1];
//!
//! let params = BenchmarkParams { eps: 0.2, min_pts: 2, k: 2, target_dim: 2 };
//! let out = Benchmark::new(params)
//!     .with_config(BenchmarkConfig::seeded(42))
//!     .run(&features, &labels)
//!     .unwrap();
//! assert_eq!(out.matrix.rows().len(), 10);
//! assert_eq!(out.payload.panels.len(), 4);
//! ```

#![forbid(unsafe_code)]

pub mod bench;
pub mod cluster;
pub mod dataset;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod normalize;
pub mod reduce;
mod util;

pub use bench::{
    Benchmark, BenchmarkConfig, BenchmarkOutcome, BenchmarkParams, Embedding, Panel, PlotMode,
    ResultMatrix, RowOutcome, ScoredRow, VisualizationPayload,
};
pub use cluster::{Clustering, Dbscan, Kmeans, KmeansFit, NOISE};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use matrix::{FeatureMatrix, Label, LabelVector};
pub use metrics::Scores;
pub use reduce::{Isomap, Lle, Pca, ReductionMethod, Reducer, StressMds};
