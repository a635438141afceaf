//! Core data models for district lookups.

pub mod district;

pub use district::{District, DistrictLookup, GeoPoint};
