//! Model artifact loader
//!
//! Loads the four artifacts produced by the training pipeline. Loading is
//! all-or-nothing: either a complete [`Artifacts`] bundle is returned or a
//! single [`LoadError`], never a partial set.

use crate::config::ArtifactsConfig;
use crate::error::LoadError;
use crate::feature_builder::CONTINUOUS_COLUMNS;
use crate::models::forest::ForestRegressor;
use crate::models::regressor::Regressor;
use crate::models::scaler::Scaler;
use crate::models::schema::FeatureSchema;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Trained model and its companion artifacts, immutable once built
pub struct Artifacts {
    model: Box<dyn Regressor>,
    feature_columns: FeatureSchema,
    feature_scaler: Scaler,
    price_scaler: Scaler,
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("model", &self.model.name())
            .field("feature_columns", &self.feature_columns.len())
            .field("feature_scaler", &self.feature_scaler)
            .field("price_scaler", &self.price_scaler)
            .finish()
    }
}

impl Artifacts {
    /// Assemble a bundle, checking the artifacts fit together
    pub fn new(
        model: Box<dyn Regressor>,
        feature_columns: FeatureSchema,
        feature_scaler: Scaler,
        price_scaler: Scaler,
    ) -> Result<Self, LoadError> {
        feature_scaler
            .validate()
            .map_err(|e| LoadError::new("feature_scaler", e))?;
        if feature_scaler.n_features() != CONTINUOUS_COLUMNS.len() {
            return Err(LoadError::new(
                "feature_scaler",
                format!(
                    "fitted on {} columns, expected {}",
                    feature_scaler.n_features(),
                    CONTINUOUS_COLUMNS.len()
                ),
            ));
        }

        price_scaler
            .validate()
            .map_err(|e| LoadError::new("price_scaler", e))?;
        if price_scaler.n_features() != 1 {
            return Err(LoadError::new(
                "price_scaler",
                format!("fitted on {} columns, expected 1", price_scaler.n_features()),
            ));
        }

        if let Some(width) = model.n_features() {
            if width != feature_columns.len() {
                return Err(LoadError::new(
                    "model",
                    format!(
                        "expects {} features but feature_columns lists {}",
                        width,
                        feature_columns.len()
                    ),
                ));
            }
        }

        Ok(Self {
            model,
            feature_columns,
            feature_scaler,
            price_scaler,
        })
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn feature_columns(&self) -> &FeatureSchema {
        &self.feature_columns
    }

    pub fn feature_scaler(&self) -> &Scaler {
        &self.feature_scaler
    }

    pub fn price_scaler(&self) -> &Scaler {
        &self.price_scaler
    }
}

/// Locations of the four artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub feature_columns: PathBuf,
    pub feature_scaler: PathBuf,
    pub price_scaler: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `models_dir`
    pub fn in_dir<P: AsRef<Path>>(models_dir: P) -> Self {
        let config = ArtifactsConfig {
            models_dir: models_dir.as_ref().to_string_lossy().into_owned(),
            ..ArtifactsConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self {
            model: config.model_path(),
            feature_columns: config.feature_columns_path(),
            feature_scaler: config.feature_scaler_path(),
            price_scaler: config.price_scaler_path(),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::from_config(&ArtifactsConfig::default())
    }
}

/// Loader for the model artifacts
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    paths: ArtifactPaths,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self::with_threads(paths, 1)
    }

    pub fn with_threads(paths: ArtifactPaths, onnx_threads: usize) -> Self {
        Self {
            paths,
            onnx_threads,
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::with_threads(ArtifactPaths::from_config(config), config.onnx_threads)
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn onnx_threads(&self) -> usize {
        self.onnx_threads
    }

    /// Load and cross-check all four artifacts
    pub fn load(&self) -> Result<Artifacts, LoadError> {
        let paths = &self.paths;

        let feature_columns: FeatureSchema = read_json("feature_columns", &paths.feature_columns)?;
        info!(
            path = %paths.feature_columns.display(),
            columns = feature_columns.len(),
            "Feature columns loaded"
        );

        let feature_scaler: Scaler = read_json("feature_scaler", &paths.feature_scaler)?;
        let price_scaler: Scaler = read_json("price_scaler", &paths.price_scaler)?;
        info!(
            feature_scaler = %paths.feature_scaler.display(),
            price_scaler = %paths.price_scaler.display(),
            "Scalers loaded"
        );

        let model = self.load_model(&paths.model)?;
        info!(
            model = %model.name(),
            path = %paths.model.display(),
            "Model loaded"
        );

        Artifacts::new(model, feature_columns, feature_scaler, price_scaler)
    }

    /// Load the regressor, choosing the format by file extension
    fn load_model(&self, path: &Path) -> Result<Box<dyn Regressor>, LoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let forest: ForestRegressor = read_json("model", path)?;
                forest
                    .validate()
                    .map_err(|e| LoadError::new("model", e))?;
                Ok(Box::new(forest))
            }
            #[cfg(feature = "onnx")]
            Some("onnx") => Ok(Box::new(crate::models::onnx::OnnxRegressor::load(
                path,
                self.onnx_threads,
            )?)),
            #[cfg(not(feature = "onnx"))]
            Some("onnx") => Err(LoadError::new(
                "model",
                "ONNX models require the `onnx` feature",
            )),
            _ => Err(LoadError::new(
                "model",
                format!("unsupported model format: {}", path.display()),
            )),
        }
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new(ArtifactPaths::default())
    }
}

fn read_json<T: DeserializeOwned>(artifact: &str, path: &Path) -> Result<T, LoadError> {
    let file = File::open(path)
        .map_err(|e| LoadError::new(artifact, format!("{}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LoadError::new(artifact, format!("{}: {}", path.display(), e)))
}

/// Artifacts loaded at most once, on first use.
///
/// Concurrent first callers block until the single load completes, then all
/// see the same outcome. A failed load is memoized too; there is no retry.
#[derive(Debug)]
pub struct SharedArtifacts {
    loader: ArtifactLoader,
    cell: OnceLock<Result<Arc<Artifacts>, LoadError>>,
}

impl SharedArtifacts {
    pub fn new(loader: ArtifactLoader) -> Self {
        Self {
            loader,
            cell: OnceLock::new(),
        }
    }

    /// Loaded artifacts, loading them first if needed
    pub fn get(&self) -> Result<Arc<Artifacts>, LoadError> {
        self.cell
            .get_or_init(|| self.loader.load().map(Arc::new))
            .clone()
    }

    /// Whether a load has completed (successfully or not)
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
