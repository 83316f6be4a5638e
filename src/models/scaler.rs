//! Fitted numeric scalers with learned inverses.
//!
//! Parameters follow the fitted attributes of the training pipeline's
//! scalers: a standard scaler stores per-column `mean` and `scale`
//! (`(x - mean) / scale`), a min-max scaler stores `min` and `scale`
//! (`x * scale + min`).

use crate::error::{InferenceError, InferenceResult};
use serde::{Deserialize, Serialize};

/// A fitted column-wise transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
    Identity { n_features: usize },
}

impl Scaler {
    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
            Scaler::Identity { n_features } => *n_features,
        }
    }

    /// Check fitted parameters are usable: consistent widths, finite values,
    /// and no zero scale.
    pub fn validate(&self) -> Result<(), String> {
        let (offsets, scale) = match self {
            Scaler::Standard { mean, scale } => (mean, scale),
            Scaler::MinMax { min, scale } => (min, scale),
            Scaler::Identity { n_features } => {
                return if *n_features == 0 {
                    Err("identity scaler has no columns".to_string())
                } else {
                    Ok(())
                };
            }
        };

        if offsets.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if offsets.len() != scale.len() {
            return Err(format!(
                "parameter widths differ: {} offsets, {} scales",
                offsets.len(),
                scale.len()
            ));
        }
        if offsets.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if scale.iter().any(|&s| s == 0.0) {
            return Err("scaler has a zero scale".to_string());
        }

        Ok(())
    }

    /// Map raw values into the fitted scale
    pub fn transform(&self, values: &[f64]) -> InferenceResult<Vec<f64>> {
        self.check_input(values)?;
        Ok(match self {
            Scaler::Standard { mean, scale } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { min, scale } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            Scaler::Identity { .. } => values.to_vec(),
        })
    }

    /// Map scaled values back to raw units
    pub fn inverse_transform(&self, values: &[f64]) -> InferenceResult<Vec<f64>> {
        self.check_input(values)?;
        Ok(match self {
            Scaler::Standard { mean, scale } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            Scaler::MinMax { min, scale } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::Identity { .. } => values.to_vec(),
        })
    }

    fn check_input(&self, values: &[f64]) -> InferenceResult<()> {
        if values.len() != self.n_features() {
            return Err(InferenceError::WidthMismatch {
                stage: "scaler",
                expected: self.n_features(),
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFiniteInput("scaler input"));
        }
        Ok(())
    }
}
