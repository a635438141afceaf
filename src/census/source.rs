//! Record source interface consumed when building a boundary collection.

use geo::{Coord, Rect};
use hashbrown::HashMap;

/// Attribute record for one boundary: field name -> stringified value
pub type Attributes = HashMap<String, String>;

/// Attribute field names used by census boundary files
pub mod fields {
    /// Boundary class code
    pub const LSAD: &str = "LSAD";
    /// Human-readable translation of the class code
    pub const LSAD_TRANS: &str = "LSAD_TRANS";
    /// Congressional district code
    pub const CD: &str = "CD";
    /// State FIPS code
    pub const STATE: &str = "STATE";
    /// Entity name (state name for state records)
    pub const NAME: &str = "NAME";
}

/// Parallel geometry and attribute records, as supplied by a shapefile reader.
///
/// Geometry and attribute counts are reported separately so a loader can
/// reject files that disagree. Indexes passed to the accessors must be below
/// both counts.
pub trait BoundarySource {
    /// Number of geometry records
    fn record_count(&self) -> usize;

    /// Number of attribute records
    fn attribute_count(&self) -> usize;

    /// Rings of the geometry at `index`, each an ordered vertex list
    fn vertices(&self, index: usize) -> &[Vec<Coord<f64>>];

    /// Precomputed bounding extents of the geometry at `index`
    fn extents(&self, index: usize) -> Rect<f64>;

    /// Attribute record at `index`
    fn attributes(&self, index: usize) -> &Attributes;
}

/// One geometry record: rings plus the extents the reader reported for them
#[derive(Debug, Clone)]
pub struct ShapeGeometry {
    pub rings: Vec<Vec<Coord<f64>>>,
    pub extents: Rect<f64>,
}

impl ShapeGeometry {
    pub fn new(rings: Vec<Vec<Coord<f64>>>, extents: Rect<f64>) -> Self {
        Self { rings, extents }
    }

    /// Build a geometry whose extents are computed from its vertices.
    ///
    /// Returns `None` when there are no vertices at all.
    pub fn from_rings(rings: Vec<Vec<Coord<f64>>>) -> Option<Self> {
        let mut coords = rings.iter().flatten();
        let first = *coords.next()?;
        let (mut min, mut max) = (first, first);
        for c in coords {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some(Self::new(rings, Rect::new(min, max)))
    }
}

/// In-memory record source for synthetic datasets
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    shapes: Vec<ShapeGeometry>,
    attributes: Vec<Attributes>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from independently supplied geometry and attribute lists.
    /// The lists are not required to have equal length here.
    pub fn from_parts(shapes: Vec<ShapeGeometry>, attributes: Vec<Attributes>) -> Self {
        Self { shapes, attributes }
    }

    pub fn push(&mut self, shape: ShapeGeometry, attributes: Attributes) {
        self.shapes.push(shape);
        self.attributes.push(attributes);
    }

    pub fn with_record(mut self, shape: ShapeGeometry, attributes: Attributes) -> Self {
        self.push(shape, attributes);
        self
    }
}

impl BoundarySource for MemorySource {
    fn record_count(&self) -> usize {
        self.shapes.len()
    }

    fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    fn vertices(&self, index: usize) -> &[Vec<Coord<f64>>] {
        &self.shapes[index].rings
    }

    fn extents(&self, index: usize) -> Rect<f64> {
        self.shapes[index].extents
    }

    fn attributes(&self, index: usize) -> &Attributes {
        &self.attributes[index]
    }
}
