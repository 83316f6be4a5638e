//! Error types for artifact loading and price inference.

use thiserror::Error;

/// Failure to bring up the model artifacts.
///
/// Every load failure collapses into this one kind; the artifact name and
/// reason are carried for diagnostics only. Cloneable so a memoized failure
/// can be handed to every caller of [`crate::models::SharedArtifacts`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to load {artifact} artifact: {reason}")]
pub struct LoadError {
    /// Semantic name of the artifact (model, feature_columns, ...)
    pub artifact: String,
    /// Human-readable cause
    pub reason: String,
}

impl LoadError {
    pub fn new(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while computing a single estimate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// A value entering a scaler or the model was NaN or infinite.
    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),

    /// A vector did not match the width a fitted artifact expects.
    #[error("{stage} expects {expected} values, got {actual}")]
    WidthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The regressor itself failed.
    #[error("model prediction failed: {0}")]
    Model(String),

    /// The model or the inverse price transform produced NaN or infinity.
    #[error("non-finite {0}")]
    NonFiniteOutput(&'static str),

    /// Artifacts could not be loaded, so no prediction is possible.
    #[error("artifacts unavailable: {0}")]
    ArtifactsUnavailable(#[from] LoadError),
}

/// Result type alias for inference operations.
pub type InferenceResult<T> = Result<T, InferenceError>;
