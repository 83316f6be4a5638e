//! Configuration management for the price estimation service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming estimate requests
    pub request_subject: String,
    /// Subject for responses to requests sent without a reply inbox
    pub result_subject: String,
}

/// Locations of the trained model artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory holding all four artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Regression model (`.json` forest or `.onnx`)
    #[serde(default = "default_model_file")]
    pub model: String,
    /// Ordered training feature columns
    #[serde(default = "default_feature_columns_file")]
    pub feature_columns: String,
    /// Scaler fitted on area and building_area
    #[serde(default = "default_feature_scaler_file")]
    pub feature_scaler: String,
    /// Scaler fitted on the price target
    #[serde(default = "default_price_scaler_file")]
    pub price_scaler: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_model_file() -> String {
    "random_forest_regressor_model.json".to_string()
}

fn default_feature_columns_file() -> String {
    "feature_columns.json".to_string()
}

fn default_feature_scaler_file() -> String {
    "feature_scaler.json".to_string()
}

fn default_price_scaler_file() -> String {
    "price_scaler.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ArtifactsConfig {
    fn path(&self, file: &str) -> PathBuf {
        Path::new(&self.models_dir).join(file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.path(&self.model)
    }

    pub fn feature_columns_path(&self) -> PathBuf {
        self.path(&self.feature_columns)
    }

    pub fn feature_scaler_path(&self) -> PathBuf {
        self.path(&self.feature_scaler)
    }

    pub fn price_scaler_path(&self) -> PathBuf {
        self.path(&self.price_scaler)
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            model: default_model_file(),
            feature_columns: default_feature_columns_file(),
            feature_scaler: default_feature_scaler_file(),
            price_scaler: default_price_scaler_file(),
            onnx_threads: default_onnx_threads(),
        }
    }
}

/// Request processing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Maximum requests processed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Seconds between metrics summaries
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
}

fn default_workers() -> usize {
    4
}

fn default_report_interval_secs() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            report_interval_secs: default_report_interval_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "estimates.requests".to_string(),
                result_subject: "estimates.results".to_string(),
            },
            artifacts: ArtifactsConfig::default(),
            service: ServiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
