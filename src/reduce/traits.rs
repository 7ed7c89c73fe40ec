use serde::Serialize;
use std::fmt;

use crate::error::Result;

/// The four embedding methods a benchmark compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReductionMethod {
    /// Principal component analysis.
    Pca,
    /// Metric multidimensional scaling by stress majorization (SMACOF).
    Mds,
    /// Isomap: classical MDS on kNN-graph geodesic distances.
    Isomap,
    /// Locally linear embedding.
    Lle,
}

impl ReductionMethod {
    /// All methods, in result-table order.
    pub const ALL: [ReductionMethod; 4] = [
        ReductionMethod::Pca,
        ReductionMethod::Mds,
        ReductionMethod::Isomap,
        ReductionMethod::Lle,
    ];

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            ReductionMethod::Pca => "PCA",
            ReductionMethod::Mds => "MDS",
            ReductionMethod::Isomap => "Isomap",
            ReductionMethod::Lle => "LLE",
        }
    }
}

impl fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common interface for dimensionality reduction.
pub trait Reducer {
    /// Which method this is.
    fn method(&self) -> ReductionMethod;

    /// Requested output dimension.
    fn target_dim(&self) -> usize;

    /// Embed every row of `data` into `target_dim()` coordinates.
    ///
    /// The output has exactly one row per input row and `target_dim()` columns.
    fn fit_transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;

    /// Method name with its output dimension, e.g. `PCA(d=2)`.
    fn describe(&self) -> String {
        format!("{}(d={})", self.method(), self.target_dim())
    }
}
