//! House Price Estimator Library
//!
//! Estimates residential property prices in the Jakarta metro area from a
//! pre-trained regression model and its companion artifacts, and serves
//! estimates over NATS.

pub mod config;
pub mod consumer;
pub mod currency;
pub mod error;
pub mod feature_builder;
pub mod form;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod service;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{InferenceError, LoadError};
pub use feature_builder::{FeatureBuilder, FeatureRecord};
pub use form::PropertyForm;
pub use models::inference::InferencePipeline;
pub use models::loader::{ArtifactLoader, Artifacts, SharedArtifacts};
pub use producer::ResponseProducer;
pub use service::EstimateService;
pub use types::{City, EstimateResponse, RawInput};
