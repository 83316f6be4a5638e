//! Model interface used by the inference pipeline

use crate::error::InferenceResult;

/// A trained regressor scoring one row of aligned features.
///
/// Implementations are shared read-only across concurrent requests.
pub trait Regressor: Send + Sync {
    /// Model name for diagnostics
    fn name(&self) -> &str;

    /// Input width, when the model format records it
    fn n_features(&self) -> Option<usize>;

    /// Score one row, returning the prediction in the target scaler's units
    fn predict(&self, features: &[f64]) -> InferenceResult<f64>;
}
