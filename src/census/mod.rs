//! Census boundary file input: record source interface, shapefile reader,
//! and the static code tables used to classify records.

pub mod fips;
pub mod lsad;
mod reader;
mod source;

pub use fips::state_for_fips;
pub use lsad::BoundaryClass;
pub use reader::CensusShapefile;
pub use source::{fields, Attributes, BoundarySource, MemorySource, ShapeGeometry};
