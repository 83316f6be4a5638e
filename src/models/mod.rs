//! Model artifacts and price inference

pub mod forest;
pub mod inference;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod regressor;
pub mod scaler;
pub mod schema;

pub use forest::{ForestRegressor, RegressionTree};
pub use inference::{predict, predict_shared, InferencePipeline, PRICE_UNIT};
pub use loader::{ArtifactLoader, ArtifactPaths, Artifacts, SharedArtifacts};
#[cfg(feature = "onnx")]
pub use onnx::OnnxRegressor;
pub use regressor::Regressor;
pub use scaler::Scaler;
pub use schema::FeatureSchema;
