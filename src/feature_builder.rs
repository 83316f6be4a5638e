//! Feature construction for price model inference.
//!
//! Expands the six raw attributes into the one-row record shape the model
//! was trained on: the two continuous columns plus one indicator column per
//! categorical field, named `<Prefix>_<value>`.

use crate::types::RawInput;

/// Continuous columns, in the order the feature scaler was fitted on
pub const CONTINUOUS_COLUMNS: [&str; 2] = ["area", "building_area"];

pub const CITY_PREFIX: &str = "City";
pub const BEDROOM_PREFIX: &str = "Bedroom";
pub const BATHROOM_PREFIX: &str = "Bathroom";
pub const GARAGE_PREFIX: &str = "Garage";

/// Name of the indicator column for one categorical value
pub fn indicator_column(prefix: &str, value: impl std::fmt::Display) -> String {
    format!("{}_{}", prefix, value)
}

/// A single-row mapping from column name to value.
///
/// Columns keep insertion order; a column that was never inserted reads as
/// absent, which alignment treats as 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRecord {
    columns: Vec<(String, f64)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Set a column, replacing its value if already present
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.columns.iter_mut().find(|(column, _)| *column == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.columns.iter().map(|(_, value)| *value).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut record = FeatureRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Builds feature records from raw property attributes.
///
/// Pure and deterministic; holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a record with the raw continuous values left untouched.
    pub fn build(&self, raw: &RawInput) -> FeatureRecord {
        self.build_scaled(raw, raw.continuous())
    }

    /// Build a record using replacement values for `area` and
    /// `building_area` (typically the scaler's output) and the raw
    /// categorical fields.
    ///
    /// A city outside the training set still produces its `City_` column;
    /// it simply matches nothing in the canonical schema.
    pub fn build_scaled(&self, raw: &RawInput, continuous: [f64; 2]) -> FeatureRecord {
        let mut record = FeatureRecord::with_capacity(CONTINUOUS_COLUMNS.len() + 4);

        for (name, value) in CONTINUOUS_COLUMNS.iter().zip(continuous) {
            record.insert(*name, value);
        }

        record.insert(indicator_column(CITY_PREFIX, &raw.city), 1.0);
        record.insert(indicator_column(BEDROOM_PREFIX, raw.bedrooms), 1.0);
        record.insert(indicator_column(BATHROOM_PREFIX, raw.bathrooms), 1.0);
        record.insert(indicator_column(GARAGE_PREFIX, raw.garage), 1.0);

        record
    }
}
