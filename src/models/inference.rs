//! Price inference pipeline
//!
//! Turns one [`RawInput`] into a price in rupiah:
//! scale the continuous columns, expand the categoricals, align to the
//! training schema, score, invert the price scaling, convert to base units.
//! Nothing here logs or retries; every failure is returned to the caller.

use crate::error::{InferenceError, InferenceResult, LoadError};
use crate::feature_builder::FeatureBuilder;
use crate::models::loader::{ArtifactLoader, Artifacts, SharedArtifacts};
use crate::types::RawInput;
use std::sync::Arc;

/// The model predicts prices in millions of rupiah
pub const PRICE_UNIT: f64 = 1_000_000.0;

/// Align a raw input to the model's feature vector (scaling, encoding and
/// reindexing, without scoring).
pub fn feature_vector(raw: &RawInput, artifacts: &Artifacts) -> InferenceResult<Vec<f64>> {
    let scaled = artifacts.feature_scaler().transform(&raw.continuous())?;
    let continuous = <[f64; 2]>::try_from(scaled).map_err(|v| InferenceError::WidthMismatch {
        stage: "feature scaler output",
        expected: 2,
        actual: v.len(),
    })?;

    let record = FeatureBuilder::new().build_scaled(raw, continuous);
    Ok(artifacts.feature_columns().reindex(&record))
}

/// Estimate the price of one property in rupiah
pub fn predict(raw: &RawInput, artifacts: &Artifacts) -> InferenceResult<f64> {
    let features = feature_vector(raw, artifacts)?;

    let model = artifacts.model();
    if let Some(width) = model.n_features() {
        if width != features.len() {
            return Err(InferenceError::WidthMismatch {
                stage: "model",
                expected: width,
                actual: features.len(),
            });
        }
    }

    let scaled_price = model.predict(&features)?;
    if !scaled_price.is_finite() {
        return Err(InferenceError::NonFiniteOutput("model prediction"));
    }

    let price_millions = artifacts
        .price_scaler()
        .inverse_transform(&[scaled_price])?
        .first()
        .copied()
        .ok_or(InferenceError::WidthMismatch {
            stage: "price scaler output",
            expected: 1,
            actual: 0,
        })?;

    let price = price_millions * PRICE_UNIT;
    if !price.is_finite() {
        return Err(InferenceError::NonFiniteOutput("price"));
    }

    Ok(price)
}

/// Estimate using lazily loaded artifacts; a failed load surfaces as
/// [`InferenceError::ArtifactsUnavailable`].
pub fn predict_shared(raw: &RawInput, shared: &SharedArtifacts) -> InferenceResult<f64> {
    let artifacts = shared.get()?;
    predict(raw, &artifacts)
}

/// Inference pipeline bound to one loaded artifact bundle
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    artifacts: Arc<Artifacts>,
}

impl InferencePipeline {
    pub fn new(artifacts: Arc<Artifacts>) -> Self {
        Self { artifacts }
    }

    /// Load artifacts eagerly and build a pipeline over them
    pub fn load(loader: &ArtifactLoader) -> Result<Self, LoadError> {
        Ok(Self::new(Arc::new(loader.load()?)))
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    /// Estimate the price of one property in rupiah
    pub fn predict(&self, raw: &RawInput) -> InferenceResult<f64> {
        predict(raw, &self.artifacts)
    }

    /// Estimate prices for several properties; each succeeds or fails alone
    pub fn predict_batch(&self, inputs: &[RawInput]) -> Vec<InferenceResult<f64>> {
        inputs.iter().map(|raw| self.predict(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forest::{ForestRegressor, RegressionTree};
    use crate::models::regressor::Regressor;
    use crate::models::scaler::Scaler;
    use crate::models::schema::FeatureSchema;
    use crate::types::City;

    fn schema() -> FeatureSchema {
        let mut columns = vec!["area".to_string(), "building_area".to_string()];
        columns.extend(City::ALL.iter().map(|c| format!("City_{}", c)));
        columns.extend((1..=10).map(|n| format!("Bedroom_{}", n)));
        columns.extend((1..=8).map(|n| format!("Bathroom_{}", n)));
        columns.extend((0..=5).map(|n| format!("Garage_{}", n)));
        FeatureSchema::new(columns).unwrap()
    }

    fn feature_scaler() -> Scaler {
        Scaler::Standard {
            mean: vec![150.0, 110.0],
            scale: vec![80.0, 60.0],
        }
    }

    fn artifacts_with(model: Box<dyn Regressor>, price_scaler: Scaler) -> Artifacts {
        Artifacts::new(model, schema(), feature_scaler(), price_scaler).unwrap()
    }

    fn typical_input() -> RawInput {
        RawInput::new(120.0, 90.0, 3, 1, 1, "Jakarta Selatan")
    }

    /// Splits on scaled area (column 0): larger land, higher price
    fn area_forest(n_features: usize) -> ForestRegressor {
        let tree = RegressionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.0, -2.0, -2.0],
            value: vec![0.0, -0.5, 1.5],
        };
        ForestRegressor::new(n_features, vec![tree, RegressionTree::leaf(0.5)]).unwrap()
    }

    /// Records every vector it is asked to score
    struct RecordingModel {
        width: usize,
        seen: std::sync::Mutex<Vec<Vec<f64>>>,
    }

    impl Regressor for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        fn n_features(&self) -> Option<usize> {
            Some(self.width)
        }

        fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
            self.seen.lock().unwrap().push(features.to_vec());
            Ok(1.0)
        }
    }

    struct NanModel;

    impl Regressor for NanModel {
        fn name(&self) -> &str {
            "nan"
        }

        fn n_features(&self) -> Option<usize> {
            None
        }

        fn predict(&self, _features: &[f64]) -> InferenceResult<f64> {
            Ok(f64::NAN)
        }
    }

    #[test]
    fn test_end_to_end_constant_model() {
        let width = schema().len();
        let artifacts = artifacts_with(
            Box::new(ForestRegressor::constant(width, 5.0).unwrap()),
            Scaler::Identity { n_features: 1 },
        );

        let price = predict(&typical_input(), &artifacts).unwrap();
        assert_eq!(price, 5_000_000.0);
    }

    #[test]
    fn test_price_scaler_is_inverted() {
        let width = schema().len();
        // Price in millions was standardized with mean 2000, std 1500
        let artifacts = artifacts_with(
            Box::new(ForestRegressor::constant(width, 1.0).unwrap()),
            Scaler::Standard {
                mean: vec![2000.0],
                scale: vec![1500.0],
            },
        );

        let price = predict(&typical_input(), &artifacts).unwrap();
        assert!((price - 3_500_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_model_sees_scaled_and_aligned_vector() {
        let schema = schema();
        let model = Arc::new(RecordingModel {
            width: schema.len(),
            seen: std::sync::Mutex::new(Vec::new()),
        });

        struct Shared(Arc<RecordingModel>);
        impl Regressor for Shared {
            fn name(&self) -> &str {
                self.0.name()
            }
            fn n_features(&self) -> Option<usize> {
                self.0.n_features()
            }
            fn predict(&self, features: &[f64]) -> InferenceResult<f64> {
                self.0.predict(features)
            }
        }

        let artifacts = artifacts_with(
            Box::new(Shared(model.clone())),
            Scaler::Identity { n_features: 1 },
        );
        predict(&typical_input(), &artifacts).unwrap();

        let seen = model.seen.lock().unwrap();
        let vector = &seen[0];
        assert_eq!(vector.len(), schema.len());
        // (120 - 150) / 80 and (90 - 110) / 60
        assert!((vector[0] + 0.375).abs() < 1e-12);
        assert!((vector[1] + 1.0 / 3.0).abs() < 1e-12);

        let hot: Vec<&str> = schema
            .columns()
            .iter()
            .zip(vector)
            .filter(|(_, &v)| v == 1.0)
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(hot, vec!["City_Jakarta Selatan", "Bedroom_3", "Bathroom_1", "Garage_1"]);
        assert_eq!(vector.iter().filter(|&&v| v == 0.0).count(), schema.len() - 6);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let artifacts = artifacts_with(
            Box::new(area_forest(schema().len())),
            Scaler::Identity { n_features: 1 },
        );

        let first = predict(&typical_input(), &artifacts).unwrap();
        let second = predict(&typical_input(), &artifacts).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_area_bounds_produce_finite_prices() {
        let artifacts = artifacts_with(
            Box::new(area_forest(schema().len())),
            Scaler::Identity { n_features: 1 },
        );

        for area in [30.0, 1000.0] {
            let raw = RawInput {
                area,
                ..typical_input()
            };
            let price = predict(&raw, &artifacts).unwrap();
            assert!(price.is_finite());
            assert!(price >= 0.0);
        }
    }

    #[test]
    fn test_unknown_city_is_not_an_error() {
        let artifacts = artifacts_with(
            Box::new(ForestRegressor::constant(schema().len(), 2.0).unwrap()),
            Scaler::Identity { n_features: 1 },
        );
        let raw = RawInput {
            city: "Surabaya".to_string(),
            ..typical_input()
        };

        let vector = feature_vector(&raw, &artifacts).unwrap();
        let city_sum: f64 = artifacts
            .feature_columns()
            .columns()
            .iter()
            .zip(&vector)
            .filter(|(c, _)| c.starts_with("City_"))
            .map(|(_, v)| v)
            .sum();
        assert_eq!(city_sum, 0.0);
        assert_eq!(predict(&raw, &artifacts).unwrap(), 2_000_000.0);
    }

    #[test]
    fn test_schema_sharing_no_indicator_names() {
        // Same groups under a different naming scheme: no built indicator matches
        let columns: Vec<String> = [
            "area",
            "building_area",
            "city_jakarta_selatan",
            "City_JakartaSelatan",
            "bedrooms_3",
            "Bedroom_03",
            "bathrooms_1",
            "Bathroom_1.0",
            "garage_1",
            "Garage_one",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        let schema = FeatureSchema::new(columns).unwrap();
        let width = schema.len();
        let artifacts = Artifacts::new(
            Box::new(area_forest(width)),
            schema,
            feature_scaler(),
            Scaler::Identity { n_features: 1 },
        )
        .unwrap();

        let vector = feature_vector(&typical_input(), &artifacts).unwrap();
        assert_eq!(vector.len(), width);
        assert!((vector[0] - (120.0 - 150.0) / 80.0).abs() < 1e-12);
        assert!((vector[1] - (90.0 - 110.0) / 60.0).abs() < 1e-12);
        assert!(vector[2..].iter().all(|&v| v == 0.0));

        // scaled area < 0 goes left: mean(-0.5, 0.5) = 0
        assert_eq!(predict(&typical_input(), &artifacts).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let artifacts = artifacts_with(
            Box::new(ForestRegressor::constant(schema().len(), 5.0).unwrap()),
            Scaler::Identity { n_features: 1 },
        );
        let raw = RawInput {
            area: f64::NAN,
            ..typical_input()
        };

        assert!(matches!(
            predict(&raw, &artifacts),
            Err(InferenceError::NonFiniteInput(_))
        ));
    }

    #[test]
    fn test_non_finite_model_output_rejected() {
        let artifacts = artifacts_with(Box::new(NanModel), Scaler::Identity { n_features: 1 });

        assert_eq!(
            predict(&typical_input(), &artifacts),
            Err(InferenceError::NonFiniteOutput("model prediction"))
        );
    }

    #[test]
    fn test_pipeline_batch() {
        let pipeline = InferencePipeline::new(Arc::new(artifacts_with(
            Box::new(area_forest(schema().len())),
            Scaler::Identity { n_features: 1 },
        )));

        let small = RawInput {
            area: 60.0,
            ..typical_input()
        };
        let large = RawInput {
            area: 600.0,
            ..typical_input()
        };
        let results = pipeline.predict_batch(&[small, large]);

        // mean(-0.5, 0.5) and mean(1.5, 0.5), in millions
        assert_eq!(results[0], Ok(0.0));
        assert_eq!(results[1], Ok(1_000_000.0));
    }

    #[test]
    fn test_predict_shared_surfaces_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let shared = SharedArtifacts::new(ArtifactLoader::new(
            crate::models::loader::ArtifactPaths::in_dir(dir.path()),
        ));

        assert!(matches!(
            predict_shared(&typical_input(), &shared),
            Err(InferenceError::ArtifactsUnavailable(_))
        ));
    }
}
