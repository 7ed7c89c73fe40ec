//! Clustering algorithms for grouping similar samples.
//!
//! Both algorithms produce hard assignments: one [`Label`](crate::Label) per
//! input row.
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then update centroids to the mean
//! of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Assumes roughly spherical clusters of similar size and a known `k`. Labels
//! are always in `0..k`.
//!
//! ### DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and identify
//! outliers. The number of clusters is not an input; points outside every dense
//! region receive [`NOISE`].
//!
//! ## Usage
//!
//! ```rust
//! use clusterbench::cluster::{Clustering, Dbscan, Kmeans, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), data.len());
//! assert!(labels.iter().all(|&l| l != NOISE));
//! ```

mod dbscan;
mod kmeans;
mod traits;

pub use dbscan::{Dbscan, NOISE};
pub use kmeans::{Kmeans, KmeansFit, DEFAULT_MAX_ITER, DEFAULT_TOL};
pub use traits::Clustering;
