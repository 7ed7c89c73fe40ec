//! The benchmark matrix engine.
//!
//! One run takes a feature matrix and ground-truth labels and produces:
//!
//! - a [`ResultMatrix`]: ten scored rows, DBSCAN and k-means on each of five
//!   feature spaces (min-max scaled raw features, PCA, MDS, Isomap, LLE);
//! - a [`VisualizationPayload`]: the four embeddings plus labels, for a
//!   plotting surface.
//!
//! ```text
//! normalize ──► raw ───────────────┐
//!          ├──► PCA ───────────────┤
//!          ├──► MDS ───────────────┼──► DBSCAN, k-means ──► score ──► ResultMatrix
//!          ├──► Isomap ────────────┤
//!          └──► LLE ───────────────┘
//!                     └──────────────────────────────────────────────► VisualizationPayload
//! ```
//!
//! Invalid input or parameters fail the whole run before any computation. An
//! embedding that fails only marks its own two rows unavailable.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cluster::{self, Clustering, Dbscan, Kmeans};
use crate::error::{Error, Result};
use crate::matrix::{FeatureMatrix, Label, LabelVector};
use crate::metrics::Scores;
use crate::normalize;
use crate::reduce::{self, Isomap, Lle, Pca, ReductionMethod, Reducer, StressMds};

/// Number of rows in a result matrix.
pub const ROWS: usize = 10;

/// Number of columns in a result matrix.
pub const COLUMNS: usize = 6;

/// Column headers of the rendered grid.
pub const HEADERS: [&str; COLUMNS] = ["Clustering", "Reduction", "Accuracy", "F1", "MSE", "MAE"];

/// Marker shown in place of numbers for rows whose feature space failed.
pub const UNAVAILABLE: &str = "unavailable";

/// Reduction column value for the raw feature space.
pub const NO_REDUCTION: &str = "none";

/// The per-run parameters chosen by the user. No defaults: the caller must
/// supply every value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkParams {
    /// DBSCAN neighbourhood radius.
    pub eps: f64,
    /// DBSCAN minimum neighbourhood size, the point itself included.
    pub min_pts: usize,
    /// k-means cluster count.
    pub k: usize,
    /// Output dimension of every embedding.
    pub target_dim: usize,
}

impl BenchmarkParams {
    /// Check the parameters against a dataset of `n_samples` rows.
    pub fn validate(&self, n_samples: usize) -> Result<()> {
        Dbscan::new(self.eps, self.min_pts).validate()?;
        if self.k == 0 || self.k > n_samples {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n_samples,
            });
        }
        if self.target_dim == 0 {
            return Err(Error::InvalidParameter {
                name: "target_dim",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Tunables that are not part of the user-facing parameter set.
///
/// Every field has a documented default, so a partial JSON object is enough:
///
/// ```rust
/// use clusterbench::BenchmarkConfig;
///
/// let cfg: BenchmarkConfig = serde_json::from_str(r#"{"kmeans_seed": 7}"#).unwrap();
/// assert_eq!(cfg.kmeans_seed, Some(7));
/// assert_eq!(cfg.kmeans_max_iter, 300);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// k-means iteration cap. Default: 300.
    pub kmeans_max_iter: usize,
    /// k-means tolerance on the largest centroid shift. Default: 1e-4.
    pub kmeans_tol: f64,
    /// Seed for k-means++ initialisation. Default: unseeded.
    pub kmeans_seed: Option<u64>,
    /// SMACOF iteration cap. Default: 300.
    pub mds_max_iter: usize,
    /// SMACOF relative stress-decrease tolerance. Default: 1e-3.
    pub mds_tol: f64,
    /// Seed for the initial SMACOF configuration. Default: unseeded.
    pub mds_seed: Option<u64>,
    /// Isomap kNN graph size. Default: 5.
    pub isomap_n_neighbors: usize,
    /// LLE neighbourhood size. Default: 5.
    pub lle_n_neighbors: usize,
    /// LLE Gram regularisation factor. Default: 1e-3.
    pub lle_reg: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            kmeans_max_iter: cluster::DEFAULT_MAX_ITER,
            kmeans_tol: cluster::DEFAULT_TOL,
            kmeans_seed: None,
            mds_max_iter: reduce::mds::DEFAULT_MAX_ITER,
            mds_tol: reduce::mds::DEFAULT_TOL,
            mds_seed: None,
            isomap_n_neighbors: reduce::isomap::DEFAULT_N_NEIGHBORS,
            lle_n_neighbors: reduce::lle::DEFAULT_N_NEIGHBORS,
            lle_reg: reduce::lle::DEFAULT_REG,
        }
    }
}

impl BenchmarkConfig {
    /// Seed both stochastic methods.
    pub fn seeded(seed: u64) -> Self {
        Self {
            kmeans_seed: Some(seed),
            mds_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check every tunable without touching any data.
    pub fn validate(&self) -> Result<()> {
        let at_least_one = [
            ("kmeans_max_iter", self.kmeans_max_iter),
            ("mds_max_iter", self.mds_max_iter),
            ("isomap_n_neighbors", self.isomap_n_neighbors),
            ("lle_n_neighbors", self.lle_n_neighbors),
        ];
        if let Some((name, _)) = at_least_one.into_iter().find(|(_, v)| *v == 0) {
            return Err(Error::InvalidParameter {
                name,
                message: "must be at least 1",
            });
        }
        for (name, tol) in [("kmeans_tol", self.kmeans_tol), ("mds_tol", self.mds_tol)] {
            if !(tol.is_finite() && tol >= 0.0) {
                return Err(Error::InvalidParameter {
                    name,
                    message: "must be non-negative and finite",
                });
            }
        }
        if !(self.lle_reg.is_finite() && self.lle_reg > 0.0) {
            return Err(Error::InvalidParameter {
                name: "lle_reg",
                message: "must be positive and finite",
            });
        }
        Ok(())
    }
}

/// Metrics for one row, or the reason they could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    /// All four metrics were computed.
    Scored(Scores),
    /// The row's feature space (or clustering) failed.
    Unavailable {
        /// Error text of the failure.
        reason: String,
    },
}

/// One row of the result matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    /// Clustering algorithm with parameters, e.g. `KMeans(k=2)`.
    pub clustering: String,
    /// Reduction with dimension, e.g. `PCA(d=2)`, or `none`.
    pub reduction: String,
    /// Metrics or the unavailability reason.
    pub outcome: RowOutcome,
}

impl ScoredRow {
    /// The six display cells; numbers to three decimals.
    pub fn cells(&self) -> [String; COLUMNS] {
        let [accuracy, f1, mse, mae] = match &self.outcome {
            RowOutcome::Scored(s) => [s.accuracy, s.f1, s.mse, s.mae].map(|v| format!("{v:.3}")),
            RowOutcome::Unavailable { .. } => std::array::from_fn(|_| UNAVAILABLE.to_string()),
        };
        [
            self.clustering.clone(),
            self.reduction.clone(),
            accuracy,
            f1,
            mse,
            mae,
        ]
    }

    /// Metrics, if this row was scored.
    pub fn scores(&self) -> Option<&Scores> {
        match &self.outcome {
            RowOutcome::Scored(s) => Some(s),
            RowOutcome::Unavailable { .. } => None,
        }
    }

    /// Whether this row carries the unavailable marker.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.outcome, RowOutcome::Unavailable { .. })
    }
}

/// The fixed 10 × 6 result table of one run.
///
/// Row `2s` is DBSCAN and row `2s + 1` is k-means on feature space `s`, where
/// spaces are ordered raw, PCA, MDS, Isomap, LLE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMatrix {
    rows: Vec<ScoredRow>,
}

impl ResultMatrix {
    fn from_rows(rows: Vec<ScoredRow>) -> Self {
        debug_assert_eq!(rows.len(), ROWS);
        Self { rows }
    }

    /// The ten rows in fixed order.
    pub fn rows(&self) -> &[ScoredRow] {
        &self.rows
    }

    /// Row-major grid of display strings.
    pub fn cells(&self) -> Vec<[String; COLUMNS]> {
        self.rows.iter().map(ScoredRow::cells).collect()
    }
}

impl fmt::Display for ResultMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells();
        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (w, c) in widths.iter_mut().zip(row) {
                *w = (*w).max(c.chars().count());
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, row: &[String]| -> fmt::Result {
            for (i, (c, w)) in row.iter().zip(widths).enumerate() {
                if i > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{c:<w$}")?;
            }
            writeln!(f)
        };

        line(f, &HEADERS.map(String::from))?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        line(f, &rule)?;
        for row in &cells {
            line(f, row)?;
        }
        Ok(())
    }
}

/// A low-dimensional representation produced by one reduction method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embedding {
    /// Method that produced the coordinates.
    pub method: ReductionMethod,
    /// One row per sample, `target_dim` columns.
    pub coords: FeatureMatrix,
}

/// How the plotting surface should draw each panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlotMode {
    /// 2-D scatter.
    Planar,
    /// 3-D scatter.
    Spatial,
    /// Nothing to draw at this dimension.
    Empty,
}

impl PlotMode {
    /// Mode for an embedding dimension.
    pub fn for_dim(dim: usize) -> Self {
        match dim {
            2 => PlotMode::Planar,
            3 => PlotMode::Spatial,
            _ => PlotMode::Empty,
        }
    }
}

/// One scatter panel of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Reduction method shown in this panel.
    pub method: ReductionMethod,
    /// Coordinates, or `None` when the method failed.
    pub embedding: Option<Embedding>,
}

/// Everything the plotting surface needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationPayload {
    /// One panel per reduction method, in PCA, MDS, Isomap, LLE order.
    pub panels: Vec<Panel>,
    /// Ground-truth labels used to colour points.
    pub labels: LabelVector,
    /// Configured embedding dimension.
    pub target_dim: usize,
}

impl VisualizationPayload {
    /// Drawing mode implied by the target dimension.
    pub fn plot_mode(&self) -> PlotMode {
        PlotMode::for_dim(self.target_dim)
    }
}

/// Output of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkOutcome {
    /// The result table.
    pub matrix: ResultMatrix,
    /// Embeddings for plotting.
    pub payload: VisualizationPayload,
}

/// Runs the full normalize, embed, cluster, score pipeline.
#[derive(Debug, Clone)]
pub struct Benchmark {
    params: BenchmarkParams,
    config: BenchmarkConfig,
}

impl Benchmark {
    /// Benchmark with the given parameters and default tunables.
    pub fn new(params: BenchmarkParams) -> Self {
        Self {
            params,
            config: BenchmarkConfig::default(),
        }
    }

    /// Replace the tunables.
    pub fn with_config(mut self, config: BenchmarkConfig) -> Self {
        self.config = config;
        self
    }

    /// The user parameters.
    pub fn params(&self) -> &BenchmarkParams {
        &self.params
    }

    /// The tunables.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run once, returning the table and the payload together.
    pub fn run(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<BenchmarkOutcome> {
        let n = features.n_samples();
        if labels.len() != n {
            return Err(Error::LabelCountMismatch {
                n_samples: n,
                n_labels: labels.len(),
            });
        }
        self.params.validate(n)?;
        self.config.validate()?;
        info!(
            samples = n,
            features = features.n_features(),
            target_dim = self.params.target_dim,
            "starting benchmark run"
        );

        let normalized = normalize::min_max(features);
        let embeddings: Vec<(ReductionMethod, String, Result<FeatureMatrix>)> = self
            .reducers()
            .iter()
            .map(|r| (r.method(), r.describe(), embed(&**r, normalized.rows())))
            .collect();

        let dbscan = Dbscan::new(self.params.eps, self.params.min_pts);
        let kmeans = Kmeans::new(self.params.k)
            .with_max_iter(self.config.kmeans_max_iter)
            .with_tol(self.config.kmeans_tol)
            .with_seed_opt(self.config.kmeans_seed);
        let clusterers: [&dyn Clustering; 2] = [&dbscan, &kmeans];

        let mut rows = Vec::with_capacity(ROWS);
        rows.extend(score_space(
            &clusterers,
            NO_REDUCTION.to_string(),
            Ok(&normalized),
            labels,
        ));
        for (method, descriptor, emb) in &embeddings {
            if let Err(e) = emb {
                warn!(%method, error = %e, "embedding unavailable");
            }
            rows.extend(score_space(&clusterers, descriptor.clone(), emb.as_ref(), labels));
        }
        let matrix = ResultMatrix::from_rows(rows);
        info!(
            unavailable = matrix.rows().iter().filter(|r| r.is_unavailable()).count(),
            "benchmark run finished"
        );

        let panels = embeddings
            .into_iter()
            .map(|(method, _, emb)| Panel {
                method,
                embedding: emb.ok().map(|coords| Embedding { method, coords }),
            })
            .collect();
        let payload = VisualizationPayload {
            panels,
            labels: labels.to_vec(),
            target_dim: self.params.target_dim,
        };

        Ok(BenchmarkOutcome { matrix, payload })
    }

    /// Run once, hand the payload to `plot`, and return the table.
    ///
    /// `plot` is called exactly once, after the table is complete.
    pub fn run_with<F>(&self, features: &FeatureMatrix, labels: &[Label], plot: F) -> Result<ResultMatrix>
    where
        F: FnOnce(VisualizationPayload),
    {
        let BenchmarkOutcome { matrix, payload } = self.run(features, labels)?;
        plot(payload);
        Ok(matrix)
    }

    fn reducers(&self) -> Vec<Box<dyn Reducer>> {
        let d = self.params.target_dim;
        let c = &self.config;
        vec![
            Box::new(Pca::new(d)),
            Box::new(
                StressMds::new(d)
                    .with_max_iter(c.mds_max_iter)
                    .with_tol(c.mds_tol)
                    .with_seed_opt(c.mds_seed),
            ),
            Box::new(Isomap::new(d).with_n_neighbors(c.isomap_n_neighbors)),
            Box::new(
                Lle::new(d)
                    .with_n_neighbors(c.lle_n_neighbors)
                    .with_reg(c.lle_reg),
            ),
        ]
    }
}

fn embed(reducer: &dyn Reducer, data: &[Vec<f64>]) -> Result<FeatureMatrix> {
    let coords = reducer.fit_transform(data)?;
    let d = reducer.target_dim();
    if coords.len() != data.len() {
        return Err(Error::DimensionMismatch {
            expected: data.len(),
            found: coords.len(),
        });
    }
    if let Some(bad) = coords.iter().find(|r| r.len() != d) {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: bad.len(),
        });
    }
    FeatureMatrix::new(coords)
}

/// Cluster and score one feature space, yielding its DBSCAN and k-means rows.
fn score_space(
    clusterers: &[&dyn Clustering],
    reduction: String,
    space: std::result::Result<&FeatureMatrix, &Error>,
    labels: &[Label],
) -> Vec<ScoredRow> {
    clusterers
        .iter()
        .map(|c| {
            let outcome = match space {
                Ok(data) => match c
                    .fit_predict(data.rows())
                    .and_then(|assignment| Scores::compute(labels, &assignment))
                {
                    Ok(scores) => RowOutcome::Scored(scores),
                    Err(e) => {
                        warn!(clustering = %c.describe(), %reduction, error = %e, "clustering failed");
                        RowOutcome::Unavailable {
                            reason: e.to_string(),
                        }
                    }
                },
                Err(e) => RowOutcome::Unavailable {
                    reason: e.to_string(),
                },
            };
            ScoredRow {
                clustering: c.describe(),
                reduction: reduction.clone(),
                outcome,
            }
        })
        .collect()
}
