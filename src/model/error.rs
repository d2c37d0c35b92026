//! Model error types.

use super::layout::LayoutMismatchError;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A required feature key was absent from the input.
    #[error("missing feature: {0}")]
    MissingFeature(&'static str),

    /// One or more feature values fell outside their accepted range.
    #[error("invalid feature values: {0}")]
    OutOfRange(String),

    /// A persisted artifact was trained against a different feature layout.
    #[error(transparent)]
    LayoutMismatch(#[from] LayoutMismatchError),

    /// An artifact recorded a different feature width than the current layout.
    #[error("artifact dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Training was invoked with no samples.
    #[error("empty training set")]
    EmptyTrainingSet,

    /// Synthetic cohort distribution parameters were rejected.
    #[error("distribution error: {0}")]
    Distribution(#[from] statrs::StatsError),

    /// Artifact file I/O failure.
    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact encode/decode failure.
    #[error("artifact codec error: {0}")]
    Codec(#[from] bincode::Error),
}
