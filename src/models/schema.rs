//! Canonical feature schema and record alignment.

use crate::feature_builder::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Structural problems in a feature column list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("feature column list is empty")]
    Empty,
    #[error("duplicate feature column: {0}")]
    DuplicateColumn(String),
}

/// Ordered column names the model was trained on.
///
/// Alignment against this schema is the contract the model depends on:
/// every schema column appears exactly once, in schema order; columns the
/// record lacks are filled with 0 and columns the schema lacks are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self { columns })
    }

    /// Number of columns (the model's input width)
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Schema columns belonging to one categorical group, e.g. `City`
    pub fn columns_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |column| {
                column
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('_'))
            })
    }

    /// Align a record to the schema and return the model input vector.
    pub fn reindex(&self, record: &FeatureRecord) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| record.get(column).unwrap_or(0.0))
            .collect()
    }

    /// Align a record to the schema, keeping column names.
    ///
    /// Aligning an already aligned record returns it unchanged.
    pub fn align(&self, record: &FeatureRecord) -> FeatureRecord {
        self.columns
            .iter()
            .map(|column| (column.as_str(), record.get(column).unwrap_or(0.0)))
            .collect()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_builder::{FeatureBuilder, CITY_PREFIX};
    use crate::types::{City, RawInput};

    fn training_schema() -> FeatureSchema {
        let mut columns = vec!["area".to_string(), "building_area".to_string()];
        columns.extend(City::ALL.iter().map(|c| format!("City_{}", c)));
        columns.extend((1..=10).map(|n| format!("Bedroom_{}", n)));
        columns.extend((1..=8).map(|n| format!("Bathroom_{}", n)));
        columns.extend((0..=5).map(|n| format!("Garage_{}", n)));
        FeatureSchema::new(columns).unwrap()
    }

    #[test]
    fn test_reindex_fills_missing_and_orders() {
        let schema = FeatureSchema::new(vec![
            "Garage_1".to_string(),
            "area".to_string(),
            "City_Depok".to_string(),
        ])
        .unwrap();

        let record: FeatureRecord = [("area", 0.5), ("Garage_1", 1.0)].into_iter().collect();

        assert_eq!(schema.reindex(&record), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_reindex_drops_extra_columns() {
        let schema = FeatureSchema::new(vec!["area".to_string()]).unwrap();
        let record: FeatureRecord = [("area", 2.0), ("Garage_9", 1.0)].into_iter().collect();

        let aligned = schema.align(&record);
        assert_eq!(aligned.len(), 1);
        assert!(!aligned.contains("Garage_9"));
        assert_eq!(schema.reindex(&record), vec![2.0]);
    }

    #[test]
    fn test_alignment_is_idempotent() {
        let schema = training_schema();
        let builder = FeatureBuilder::new();

        for raw in [
            RawInput::new(120.0, 90.0, 3, 1, 1, "Jakarta Selatan"),
            RawInput::new(30.0, 800.0, 10, 8, 0, "Tangerang Selatan"),
            RawInput::new(500.0, 300.0, 4, 3, 2, "Surabaya"),
        ] {
            let record = builder.build(&raw);
            let once = schema.align(&record);
            let twice = schema.align(&once);

            assert_eq!(once, twice);
            assert_eq!(schema.reindex(&once), schema.reindex(&record));
            assert_eq!(
                once.column_names().collect::<Vec<_>>(),
                schema.columns().iter().map(String::as_str).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_one_indicator_per_group_after_alignment() {
        let schema = training_schema();
        let record = FeatureBuilder::new().build(&RawInput::new(120.0, 90.0, 3, 1, 1, "Bogor"));
        let aligned = schema.align(&record);

        for prefix in ["City", "Bedroom", "Bathroom", "Garage"] {
            let hot: f64 = schema
                .columns_with_prefix(prefix)
                .map(|c| aligned.get(c).unwrap_or(0.0))
                .sum();
            assert_eq!(hot, 1.0, "group {}", prefix);
        }
    }

    #[test]
    fn test_unknown_city_zeroes_city_group() {
        let schema = training_schema();
        let record = FeatureBuilder::new().build(&RawInput::new(120.0, 90.0, 3, 1, 1, "Surabaya"));
        let aligned = schema.align(&record);

        let city_columns: Vec<&str> = schema.columns_with_prefix(CITY_PREFIX).collect();
        assert_eq!(city_columns.len(), 9);
        assert!(city_columns.iter().all(|c| aligned.get(c) == Some(0.0)));
        assert_eq!(aligned.get("Bedroom_3"), Some(1.0));
    }

    #[test]
    fn test_prefix_match_requires_separator() {
        let schema =
            FeatureSchema::new(vec!["City_Depok".to_string(), "Citywide".to_string()]).unwrap();
        assert_eq!(schema.columns_with_prefix("City").collect::<Vec<_>>(), vec!["City_Depok"]);
    }

    #[test]
    fn test_schema_rejects_duplicates_and_empty() {
        assert_eq!(FeatureSchema::new(vec![]), Err(SchemaError::Empty));
        assert_eq!(
            FeatureSchema::new(vec!["area".to_string(), "area".to_string()]),
            Err(SchemaError::DuplicateColumn("area".to_string()))
        );
    }

    #[test]
    fn test_schema_deserializes_from_json_list() {
        let schema: FeatureSchema =
            serde_json::from_str(r#"["area", "building_area", "City_Bogor"]"#).unwrap();
        assert_eq!(schema.len(), 3);

        let duplicate = serde_json::from_str::<FeatureSchema>(r#"["area", "area"]"#);
        assert!(duplicate.is_err());
    }
}
