//! Raw property attributes supplied per request

use serde::{Deserialize, Serialize};

/// The six attributes of a property, as entered by the user.
///
/// Bounds and the closed city list are enforced by [`crate::form`] before a
/// `RawInput` reaches the pipeline. `city` stays a plain string so that a
/// name outside the training set can still flow through (it degrades to no
/// city indicator rather than an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Land area in m²
    pub area: f64,
    /// Building area in m²
    pub building_area: f64,
    /// Number of bedrooms
    pub bedrooms: u32,
    /// Number of bathrooms
    pub bathrooms: u32,
    /// Garage capacity in cars
    pub garage: u32,
    /// City name as it appears in the training data
    pub city: String,
}

impl RawInput {
    /// Create an input with explicit values for every field
    pub fn new(
        area: f64,
        building_area: f64,
        bedrooms: u32,
        bathrooms: u32,
        garage: u32,
        city: impl Into<String>,
    ) -> Self {
        Self {
            area,
            building_area,
            bedrooms,
            bathrooms,
            garage,
            city: city.into(),
        }
    }

    /// The two continuous columns, in fit order
    pub fn continuous(&self) -> [f64; 2] {
        [self.area, self.building_area]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_order() {
        let raw = RawInput::new(120.0, 90.0, 3, 1, 1, "Depok");
        assert_eq!(raw.continuous(), [120.0, 90.0]);
    }
}
