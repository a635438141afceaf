//! Immutable collection of boundary entities built from census records.

use std::path::Path;

use geo::{Coord, Rect};
use tracing::info;

use super::boundary::BoundaryEntity;
use super::ring::{Ring, RingClosure};
use crate::census::{fields, lsad, state_for_fips, Attributes, BoundaryClass, BoundarySource, CensusShapefile};
use crate::error::DatasetError;

/// Options applied while turning records into entities
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub closure: RingClosure,
}

/// Every boundary of a dataset, in record order. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCollection {
    entities: Vec<BoundaryEntity>,
}

impl BoundaryCollection {
    /// Open a census shapefile pair and load it
    pub fn open(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, DatasetError> {
        let shapefile = CensusShapefile::open(path)?;
        Self::load_with(&shapefile, options)
    }

    pub fn load<S: BoundarySource>(source: &S) -> Result<Self, DatasetError> {
        Self::load_with(source, LoadOptions::default())
    }

    /// Build one entity per record.
    ///
    /// Fails without producing a collection if the geometry and attribute
    /// counts differ or any record cannot be classified.
    pub fn load_with<S: BoundarySource>(source: &S, options: LoadOptions) -> Result<Self, DatasetError> {
        let shapes = source.record_count();
        let attributes = source.attribute_count();
        if shapes != attributes {
            return Err(DatasetError::RecordCountMismatch { shapes, attributes });
        }

        let entities = (0..shapes)
            .map(|index| {
                let rings = source
                    .vertices(index)
                    .iter()
                    .map(|vertices| Ring::with_closure(vertices.clone(), options.closure))
                    .collect();
                build_entity(index, rings, source.extents(index), source.attributes(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let collection = Self { entities };
        collection.log_summary();
        Ok(collection)
    }

    pub fn entities(&self) -> &[BoundaryEntity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every entity containing a point given in dataset coordinates (x, y)
    pub fn containing(&self, point: Coord<f64>) -> impl Iterator<Item = &BoundaryEntity> {
        self.entities.iter().filter(move |e| e.contains(point))
    }

    pub fn congressional_districts(&self) -> impl Iterator<Item = &BoundaryEntity> {
        self.entities.iter().filter(|e| e.is_congressional_district())
    }

    fn log_summary(&self) {
        let districts = self.congressional_districts().count();
        let states = self
            .entities
            .iter()
            .filter(|e| matches!(e.kind(), super::BoundaryKind::State { .. }))
            .count();
        info!(
            "Loaded {} boundaries ({} congressional districts, {} states, {} other)",
            self.entities.len(),
            districts,
            states,
            self.entities.len() - districts - states
        );
    }
}

fn field<'a>(attributes: &'a Attributes, index: usize, name: &'static str) -> Result<&'a str, DatasetError> {
    attributes
        .get(name)
        .map(String::as_str)
        .ok_or(DatasetError::MissingField { index, field: name })
}

/// Record label: the file's own translation, else the built-in one, else the raw code
fn class_label(attributes: &Attributes, code: &str) -> String {
    attributes
        .get(fields::LSAD_TRANS)
        .filter(|t| !t.is_empty())
        .cloned()
        .or_else(|| lsad::describe(code).map(str::to_string))
        .unwrap_or_else(|| code.to_string())
}

/// Pick the entity variant for a record from its class code.
pub fn build_entity(
    index: usize,
    rings: Vec<Ring>,
    extents: Rect<f64>,
    attributes: &Attributes,
) -> Result<BoundaryEntity, DatasetError> {
    let code = field(attributes, index, fields::LSAD)?;

    match BoundaryClass::from_lsad(code) {
        BoundaryClass::State => {
            let name = field(attributes, index, fields::NAME)?;
            Ok(BoundaryEntity::state(name, rings, extents))
        }
        BoundaryClass::CongressionalDistrict => {
            let fips = field(attributes, index, fields::STATE)?;
            let state = state_for_fips(fips).ok_or_else(|| DatasetError::UnknownFips {
                index,
                fips: fips.to_string(),
            })?;
            let district = field(attributes, index, fields::CD)?;
            Ok(BoundaryEntity::congressional_district(
                class_label(attributes, code),
                state,
                district,
                rings,
                extents,
            ))
        }
        BoundaryClass::Other => Ok(BoundaryEntity::generic(
            class_label(attributes, code),
            rings,
            extents,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::{MemorySource, ShapeGeometry};
    use crate::pip::BoundaryKind;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn square(x0: f64, y0: f64, size: f64) -> ShapeGeometry {
        ShapeGeometry::from_rings(vec![vec![
            Coord { x: x0, y: y0 },
            Coord { x: x0, y: y0 + size },
            Coord { x: x0 + size, y: y0 + size },
            Coord { x: x0 + size, y: y0 },
            Coord { x: x0, y: y0 },
        ]])
        .unwrap()
    }

    #[test]
    fn test_dispatch_by_class_code() {
        let source = MemorySource::new()
            .with_record(square(0.0, 0.0, 10.0), attrs(&[("LSAD", "01"), ("NAME", "AL")]))
            .with_record(
                square(0.0, 0.0, 10.0),
                attrs(&[
                    ("LSAD", "C2"),
                    ("LSAD_TRANS", "Congressional District"),
                    ("STATE", "01"),
                    ("CD", "01"),
                ]),
            )
            .with_record(
                square(0.0, 0.0, 10.0),
                attrs(&[("LSAD", "06"), ("LSAD_TRANS", "County")]),
            );

        let collection = BoundaryCollection::load(&source).unwrap();
        assert_eq!(collection.len(), 3);

        let kinds: Vec<&BoundaryKind> = collection.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                &BoundaryKind::State {
                    state: "AL".to_string()
                },
                &BoundaryKind::CongressionalDistrict {
                    state: "AL".to_string(),
                    district: "01".to_string()
                },
                &BoundaryKind::Generic,
            ]
        );
        assert_eq!(collection.entities()[2].label(), "County");
        assert_eq!(collection.congressional_districts().count(), 1);
    }

    #[test]
    fn test_count_mismatch_fails() {
        let shapes = (0..5).map(|i| square(i as f64, 0.0, 1.0)).collect();
        let records = (0..4).map(|_| attrs(&[("LSAD", "01"), ("NAME", "AL")])).collect();
        let source = MemorySource::from_parts(shapes, records);

        let err = BoundaryCollection::load(&source).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RecordCountMismatch {
                shapes: 5,
                attributes: 4
            }
        ));
    }

    #[test]
    fn test_unknown_fips_fails() {
        let source = MemorySource::new().with_record(
            square(0.0, 0.0, 1.0),
            attrs(&[("LSAD", "C1"), ("STATE", "03"), ("CD", "00")]),
        );
        let err = BoundaryCollection::load(&source).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownFips { index: 0, ref fips } if fips == "03"));
    }

    #[test]
    fn test_missing_class_code_fails() {
        let source = MemorySource::new().with_record(square(0.0, 0.0, 1.0), attrs(&[("NAME", "x")]));
        let err = BoundaryCollection::load(&source).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingField {
                index: 0,
                field: "LSAD"
            }
        ));
    }

    #[test]
    fn test_label_falls_back_to_builtin_translation() {
        let source = MemorySource::new()
            .with_record(
                square(0.0, 0.0, 1.0),
                attrs(&[("LSAD", "C1"), ("STATE", "02"), ("CD", "00")]),
            )
            .with_record(square(0.0, 0.0, 1.0), attrs(&[("LSAD", "ZZ")]));
        let collection = BoundaryCollection::load(&source).unwrap();
        assert_eq!(
            collection.entities()[0].label(),
            "Congressional District (at Large)"
        );
        assert_eq!(collection.entities()[1].label(), "ZZ");
    }

    #[test]
    fn test_district_code_kept_verbatim() {
        let source = MemorySource::new().with_record(
            square(0.0, 0.0, 1.0),
            attrs(&[("LSAD", "C2"), ("STATE", "06"), ("CD", "07")]),
        );
        let collection = BoundaryCollection::load(&source).unwrap();
        assert_eq!(collection.entities()[0].district_code(), Some("07"));
        assert_eq!(collection.entities()[0].name(), "CA-07");
    }

    #[test]
    fn test_closure_option_reaches_rings() {
        let open = ShapeGeometry::from_rings(vec![vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 0.0, y: 10.0 },
        ]])
        .unwrap();
        let source = MemorySource::new().with_record(open, attrs(&[("LSAD", "01"), ("NAME", "AL")]));
        let point = Coord { x: 5.0, y: 5.0 };

        let stored = BoundaryCollection::load(&source).unwrap();
        assert_eq!(stored.containing(point).count(), 0);

        let implicit = BoundaryCollection::load_with(
            &source,
            LoadOptions {
                closure: RingClosure::Implicit,
            },
        )
        .unwrap();
        assert_eq!(implicit.containing(point).count(), 1);
    }
}
