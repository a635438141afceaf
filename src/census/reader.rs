//! Census boundary shapefile reader (.shp geometry + .dbf attributes).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use geo::{Coord, Rect};
use shapefile::dbase::{self, FieldValue};
use shapefile::{Shape, ShapeReader};
use tracing::{debug, info};

use super::source::{Attributes, BoundarySource, ShapeGeometry};
use crate::error::DatasetError;

/// Fully decoded census shapefile pair, held in memory
#[derive(Debug)]
pub struct CensusShapefile {
    shapes: Vec<ShapeGeometry>,
    attributes: Vec<Attributes>,
}

impl CensusShapefile {
    /// Open `<base>.shp` and `<base>.dbf`.
    ///
    /// `base` may be given with or without a `.shp`/`.dbf` extension.
    pub fn open(base: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let base = strip_known_extension(base.as_ref());
        let shp_path = with_suffix(&base, ".shp");
        let dbf_path = with_suffix(&base, ".dbf");

        info!("Reading census shapefile {}", shp_path.display());
        let shapes = read_shapes(&shp_path)?;
        debug!("Reading attributes from {}", dbf_path.display());
        let attributes = read_attributes(&dbf_path)?;
        debug!(
            "Decoded {} shapes and {} attribute records",
            shapes.len(),
            attributes.len()
        );

        Ok(Self { shapes, attributes })
    }
}

impl BoundarySource for CensusShapefile {
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

fn strip_known_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("shp") || ext.eq_ignore_ascii_case("dbf") => {
            path.with_extension("")
        }
        _ => path.to_path_buf(),
    }
}

/// Append a suffix without touching dots already in the file name
/// (census names like `cd99_110` are fine, but so is `tl_2020.cd116`).
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_shapes(path: &Path) -> Result<Vec<ShapeGeometry>, DatasetError> {
    let mut reader = ShapeReader::from_path(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut shapes = Vec::new();
    for (index, shape) in reader.iter_shapes().enumerate() {
        let shape = shape.map_err(|e| DatasetError::Read {
            path: path.to_path_buf(),
            reason: format!("shape {}: {}", index, e),
        })?;
        shapes.push(shape_geometry(index, shape)?);
    }
    Ok(shapes)
}

macro_rules! polygon_geometry {
    ($polygon:expr) => {{
        let polygon = $polygon;
        let rings: Vec<Vec<Coord<f64>>> = polygon
            .rings()
            .iter()
            .map(|ring| {
                ring.points()
                    .iter()
                    .map(|pt| Coord { x: pt.x, y: pt.y })
                    .collect()
            })
            .collect();
        let bbox = polygon.bbox();
        ShapeGeometry::new(
            rings,
            Rect::new(
                Coord {
                    x: bbox.min.x,
                    y: bbox.min.y,
                },
                Coord {
                    x: bbox.max.x,
                    y: bbox.max.y,
                },
            ),
        )
    }};
}

/// Convert a decoded shape, keeping the extents stored in the file.
fn shape_geometry(index: usize, shape: Shape) -> Result<ShapeGeometry, DatasetError> {
    match shape {
        Shape::Polygon(p) => Ok(polygon_geometry!(p)),
        Shape::PolygonM(p) => Ok(polygon_geometry!(p)),
        Shape::PolygonZ(p) => Ok(polygon_geometry!(p)),
        other => Err(DatasetError::UnsupportedShape {
            index,
            shape_type: format!("{:?}", other.shapetype()),
        }),
    }
}

fn read_attributes(path: &Path) -> Result<Vec<Attributes>, DatasetError> {
    let mut reader = dbase::Reader::from_path(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let names: Vec<String> = reader
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();

    let records = reader.read().map_err(|e| DatasetError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(records
        .iter()
        .map(|record| {
            names
                .iter()
                .filter_map(|name| {
                    let value = record.get(name).and_then(field_text)?;
                    Some((name.clone(), value))
                })
                .collect()
        })
        .collect())
}

/// Stringify a dBase value; empty/null values are dropped.
fn field_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(number_text(*n)),
        FieldValue::Float(Some(n)) => Some(number_text(f64::from(*n))),
        FieldValue::Double(n) => Some(number_text(*n)),
        FieldValue::Integer(n) => Some(n.to_string()),
        FieldValue::Logical(Some(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
