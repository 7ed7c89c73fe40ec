use thiserror::Error;

/// Errors returned by the benchmark engine and its algorithms.
#[derive(Debug, Error)]
pub enum Error {
    /// Input has no rows or no columns.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Rows in a matrix have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// Label vector length differs from the number of samples.
    #[error("label count mismatch: {n_samples} samples, but {n_labels} labels")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Target dimension cannot be produced by a reduction method.
    #[error("{method} cannot produce {requested} dimensions (at most {max})")]
    InvalidTargetDimension {
        /// Reduction method name.
        method: &'static str,
        /// Requested output dimension.
        requested: usize,
        /// Largest supported output dimension for this input.
        max: usize,
    },

    /// The nearest-neighbour graph splits into several components.
    #[error("neighbour graph is disconnected ({components} components)")]
    DisconnectedGraph {
        /// Number of connected components found.
        components: usize,
    },

    /// An iterative or numerical step produced no usable solution.
    #[error("{method} failed to converge: {message}")]
    Convergence {
        /// Method name.
        method: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A feature value is NaN or infinite.
    #[error("non-finite feature value at row {row}, column {column}")]
    NonFinite {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        column: usize,
    },

    /// A dataset line could not be parsed.
    #[error("malformed dataset at line {line}: {message}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// Reading the dataset failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
