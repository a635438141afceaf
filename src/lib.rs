//! district-pip - congressional district lookup over census boundary files
//!
//! This library provides shared types and modules for the query and batch binaries.

pub mod census;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod pip;

pub use error::{DatasetError, GeocodingError};
pub use models::{District, DistrictLookup, GeoPoint};
pub use pip::{BoundaryCollection, DistrictResolver};
