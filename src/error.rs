//! Error types for dataset loading and geocoding.

use std::path::PathBuf;

use thiserror::Error;

/// Load-time failure while building a boundary collection.
///
/// Any of these leaves the collection unusable; callers must not query a
/// partially loaded dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The geometry or attribute file could not be opened
    #[error("could not open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    /// The file opened but a record could not be decoded
    #[error("could not read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    /// Geometry and attribute files disagree on the number of records
    #[error("SHP/DBF record count mismatch (SHP={shapes}, DBF={attributes})")]
    RecordCountMismatch { shapes: usize, attributes: usize },

    /// A congressional district carries a state FIPS code with no postal mapping
    #[error("record {index}: unrecognized state FIPS code {fips:?}")]
    UnknownFips { index: usize, fips: String },

    /// A record is missing an attribute the dispatch needs
    #[error("record {index}: missing attribute field {field}")]
    MissingField { index: usize, field: &'static str },

    /// A geometry record is not a polygon
    #[error("record {index}: unsupported shape type {shape_type}")]
    UnsupportedShape { index: usize, shape_type: String },
}

/// Classified geocoding failure, propagated unchanged to the caller of
/// `resolve_address`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodingError {
    #[error("Empty Address")]
    EmptyAddress,

    #[error("Unknown Address")]
    UnknownAddress,

    /// Ambiguous or otherwise refused address
    #[error("Prohibited Address")]
    ProhibitedAddress,

    #[error("Unknown Geocoding Server Error: {0}")]
    Server(String),

    #[error("Bad API Key")]
    BadCredentials,

    #[error("Too Many Requests")]
    RateLimited,

    /// A status the backend returned that has no classification
    #[error("Unclassified geocoder status {code}: {detail}")]
    Unclassified { code: i32, detail: String },
}

impl GeocodingError {
    /// Map a legacy numeric geocoder status to its classification.
    pub fn from_status(code: i32, detail: impl Into<String>) -> Self {
        match code {
            500 => Self::Server(detail.into()),
            601 => Self::EmptyAddress,
            602 => Self::UnknownAddress,
            603 => Self::ProhibitedAddress,
            610 => Self::BadCredentials,
            620 => Self::RateLimited,
            code => Self::Unclassified {
                code,
                detail: detail.into(),
            },
        }
    }

    /// Numeric status code, for presentation layers that report one.
    pub fn code(&self) -> i32 {
        match self {
            Self::Server(_) => 500,
            Self::EmptyAddress => 601,
            Self::UnknownAddress => 602,
            Self::ProhibitedAddress => 603,
            Self::BadCredentials => 610,
            Self::RateLimited => 620,
            Self::Unclassified { code, .. } => *code,
        }
    }
}
