//! District resolution: point (or geocoded address) to congressional districts.

use std::sync::Arc;

use geo::Coord;
use tracing::debug;

use super::BoundaryCollection;
use crate::error::GeocodingError;
use crate::geocode::Geocoder;
use crate::models::{District, DistrictLookup};

/// Raw district code the census files use for special at-large seats
pub const AT_LARGE_SENTINEL: &str = "98";

/// Display code reported for [`AT_LARGE_SENTINEL`]
pub const AT_LARGE_CODE: &str = "00";

/// Canonical display form of a raw district code.
///
/// `"98"` becomes `"00"`; otherwise one leading zero is dropped when
/// something follows it (`"07"` -> `"7"`, `"0"` stays `"0"`).
pub fn normalize_district_code(raw: &str) -> &str {
    if raw == AT_LARGE_SENTINEL {
        AT_LARGE_CODE
    } else if raw.len() > 1 && raw.starts_with('0') {
        &raw[1..]
    } else {
        raw
    }
}

/// Dataset coordinates for a query point.
///
/// Boundaries are stored as (longitude, latitude) and the dataset is U.S.
/// only, so longitude is forced into the western hemisphere.
pub fn dataset_point(lat: f64, lng: f64) -> Coord<f64> {
    Coord {
        x: -lng.abs(),
        y: lat,
    }
}

/// Congressional district lookup over a shared, loaded collection
#[derive(Debug, Clone)]
pub struct DistrictResolver {
    collection: Arc<BoundaryCollection>,
}

impl DistrictResolver {
    pub fn new(collection: Arc<BoundaryCollection>) -> Self {
        Self { collection }
    }

    /// Every congressional district containing the point, in dataset order.
    ///
    /// Overlapping records are all reported. No match is an empty list.
    pub fn resolve_point(&self, lat: f64, lng: f64) -> DistrictLookup {
        let point = dataset_point(lat, lng);

        let districts: Vec<District> = self
            .collection
            .congressional_districts()
            .filter(|entity| entity.contains(point))
            .filter_map(|entity| {
                let state = entity.state_code()?;
                let code = entity.district_code()?;
                Some(District::new(state, normalize_district_code(code)))
            })
            .collect();

        debug!(
            "District lookup at ({}, {}): {} matches",
            lat,
            lng,
            districts.len()
        );

        DistrictLookup { lat, lng, districts }
    }

    /// Geocode the address, then resolve the resulting point.
    ///
    /// Geocoding failures are returned exactly as the geocoder reported them.
    pub async fn resolve_address<G: Geocoder>(
        &self,
        address: &str,
        geocoder: &G,
    ) -> Result<DistrictLookup, GeocodingError> {
        let point = geocoder.geocode(address).await?;
        Ok(self.resolve_point(point.lat, point.lon))
    }

    /// Get the collection (for stats/debugging)
    pub fn collection(&self) -> &BoundaryCollection {
        &self.collection
    }
}
