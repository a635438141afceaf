//! Point-in-Polygon (PIP) district lookup.
//!
//! Census boundaries are loaded once into an immutable collection; each
//! lookup scans it with a bounding-box pre-check followed by a winding test.

mod boundary;
mod collection;
mod resolver;
mod ring;

pub use boundary::{BoundaryEntity, BoundaryKind};
pub use collection::{build_entity, BoundaryCollection, LoadOptions};
pub use resolver::{
    dataset_point, normalize_district_code, DistrictResolver, AT_LARGE_CODE, AT_LARGE_SENTINEL,
};
pub use ring::{ContainsPoint, Ring, RingClosure};
