//! ONNX model support via ONNX Runtime

use crate::error::{InferenceError, InferenceResult, LoadError};
use crate::models::regressor::Regressor;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Regressor exported to ONNX (e.g. a random forest converted for serving).
///
/// Running a session needs exclusive access, so the session sits behind a
/// mutex; everything else is read-only.
pub struct OnnxRegressor {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxRegressor {
    /// Load a model file with the given number of intra-op threads
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let fail = |e: ort::Error| LoadError::new("model", format!("{}: {}", path.display(), e));

        ort::init().commit().map_err(fail)?;

        let session = Session::builder()
            .map_err(fail)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(fail)?
            .with_intra_threads(onnx_threads)
            .map_err(fail)?
            .commit_from_file(path)
            .map_err(fail)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Regressor exports have a single output holding the prediction
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            threads = onnx_threads,
            "ONNX model loaded"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
        // Shape [1, num_features], float32 as exported
        let shape = vec![1_i64, features.len() as i64];
        let data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| InferenceError::Model(format!("failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Model(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| InferenceError::Model(e.to_string()))?;

        let output = outputs.get(&self.output_name).ok_or_else(|| {
            InferenceError::Model(format!("missing output {}", self.output_name))
        })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Model(e.to_string()))?;

        data.first()
            .map(|&v| v as f64)
            .ok_or_else(|| InferenceError::Model("empty model output".to_string()))
    }
}
