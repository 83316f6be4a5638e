//! Cities covered by the training data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Jakarta metro area cities the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "Jakarta Selatan")]
    JakartaSelatan,
    #[serde(rename = "Jakarta Timur")]
    JakartaTimur,
    #[serde(rename = "Jakarta Pusat")]
    JakartaPusat,
    #[serde(rename = "Jakarta Barat")]
    JakartaBarat,
    Depok,
    Bogor,
    Bekasi,
    Tangerang,
    #[serde(rename = "Tangerang Selatan")]
    TangerangSelatan,
}

impl City {
    /// All cities, in the order the input form lists them
    pub const ALL: [City; 9] = [
        City::JakartaSelatan,
        City::JakartaTimur,
        City::JakartaPusat,
        City::JakartaBarat,
        City::Depok,
        City::Bogor,
        City::Bekasi,
        City::Tangerang,
        City::TangerangSelatan,
    ];

    /// Name as it appears in the training data
    pub fn as_str(&self) -> &'static str {
        match self {
            City::JakartaSelatan => "Jakarta Selatan",
            City::JakartaTimur => "Jakarta Timur",
            City::JakartaPusat => "Jakarta Pusat",
            City::JakartaBarat => "Jakarta Barat",
            City::Depok => "Depok",
            City::Bogor => "Bogor",
            City::Bekasi => "Bekasi",
            City::Tangerang => "Tangerang",
            City::TangerangSelatan => "Tangerang Selatan",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a name is not one of the nine known cities
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown city: {0}")]
pub struct UnknownCity(pub String);

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .iter()
            .copied()
            .find(|city| city.as_str() == s)
            .ok_or_else(|| UnknownCity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse() {
        assert_eq!("Jakarta Selatan".parse::<City>(), Ok(City::JakartaSelatan));
        assert_eq!("Bogor".parse::<City>(), Ok(City::Bogor));
        assert!("Surabaya".parse::<City>().is_err());
        // Names are matched exactly
        assert!("jakarta selatan".parse::<City>().is_err());
    }

    #[test]
    fn test_city_serde_uses_display_names() {
        let json = serde_json::to_string(&City::TangerangSelatan).unwrap();
        assert_eq!(json, "\"Tangerang Selatan\"");

        let city: City = serde_json::from_str("\"Jakarta Barat\"").unwrap();
        assert_eq!(city, City::JakartaBarat);
    }

    #[test]
    fn test_all_names_round_trip() {
        for city in City::ALL {
            assert_eq!(city.as_str().parse::<City>(), Ok(city));
        }
    }
}
