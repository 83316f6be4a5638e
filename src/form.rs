//! Input form accepted by the estimation service.
//!
//! The pipeline does not re-check input bounds; every request passes
//! through [`PropertyForm::validate`] first.

use crate::types::{City, RawInput};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Land area bounds in m²
pub const AREA_RANGE: RangeInclusive<f64> = 30.0..=1000.0;
/// Building area bounds in m²
pub const BUILDING_AREA_RANGE: RangeInclusive<f64> = 30.0..=800.0;
/// Bedroom count bounds
pub const BEDROOMS_RANGE: RangeInclusive<i64> = 1..=10;
/// Bathroom count bounds
pub const BATHROOMS_RANGE: RangeInclusive<i64> = 1..=8;
/// Garage capacity bounds
pub const GARAGE_RANGE: RangeInclusive<i64> = 0..=5;

/// Reasons a form is rejected before inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error(transparent)]
    UnknownCity(#[from] crate::types::city::UnknownCity),
}

/// Property details as submitted by a requester.
///
/// Counts are signed so that negative submissions are reported as out of
/// range instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyForm {
    /// Optional caller-supplied identifier echoed in the response
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default = "default_area")]
    pub area: f64,
    #[serde(default = "default_building_area")]
    pub building_area: f64,
    #[serde(default = "default_bedrooms")]
    pub bedrooms: i64,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: i64,
    #[serde(default = "default_garage")]
    pub garage: i64,
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_area() -> f64 {
    120.0
}

fn default_building_area() -> f64 {
    90.0
}

fn default_bedrooms() -> i64 {
    3
}

fn default_bathrooms() -> i64 {
    1
}

fn default_garage() -> i64 {
    1
}

fn default_city() -> String {
    City::JakartaSelatan.as_str().to_string()
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            request_id: None,
            area: default_area(),
            building_area: default_building_area(),
            bedrooms: default_bedrooms(),
            bathrooms: default_bathrooms(),
            garage: default_garage(),
            city: default_city(),
        }
    }
}

impl PropertyForm {
    /// Check bounds and the city list, producing pipeline input
    pub fn validate(&self) -> Result<RawInput, FormError> {
        check_real("area", self.area, &AREA_RANGE)?;
        check_real("building_area", self.building_area, &BUILDING_AREA_RANGE)?;
        let bedrooms = check_count("bedrooms", self.bedrooms, &BEDROOMS_RANGE)?;
        let bathrooms = check_count("bathrooms", self.bathrooms, &BATHROOMS_RANGE)?;
        let garage = check_count("garage", self.garage, &GARAGE_RANGE)?;
        let city: City = self.city.parse()?;

        Ok(RawInput::new(
            self.area,
            self.building_area,
            bedrooms,
            bathrooms,
            garage,
            city.as_str(),
        ))
    }
}

fn check_real(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<(), FormError> {
    // NaN fails `contains`, so it is rejected here as well
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FormError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

fn check_count(field: &'static str, value: i64, range: &RangeInclusive<i64>) -> Result<u32, FormError> {
    if range.contains(&value) {
        Ok(value as u32)
    } else {
        Err(FormError::OutOfRange {
            field,
            min: *range.start() as f64,
            max: *range.end() as f64,
            value: value as f64,
        })
    }
}
