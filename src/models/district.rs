//! Query-side types returned by the district resolver.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A congressional district reported for a point, code in display form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct District {
    /// State postal abbreviation (e.g., "AL")
    pub state: String,
    /// Normalized district code ("1", "12", "00" for at-large)
    pub district: String,
}

impl District {
    pub fn new(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
        }
    }
}

impl std::fmt::Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.state, self.district)
    }
}

/// Result of resolving a point: the queried coordinates echoed back with
/// every district whose boundary contains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictLookup {
    pub lat: f64,
    pub lng: f64,
    pub districts: Vec<District>,
}

impl DistrictLookup {
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}
