//! Political boundary entities: rings plus precomputed extents.

use geo::{Coord, Rect};

use super::ring::{ContainsPoint, Ring};

/// What a boundary represents, with the fields each kind carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Any boundary class without a dedicated variant
    Generic,
    /// A state, identified by the record's name field
    State { state: String },
    /// A congressional district; `district` is stored exactly as read
    CongressionalDistrict { state: String, district: String },
}

/// A named boundary made of one or more rings.
///
/// The extents come from the reader and are trusted to enclose every ring;
/// they are not recomputed.
#[derive(Debug, Clone)]
pub struct BoundaryEntity<R = Ring> {
    name: String,
    label: String,
    kind: BoundaryKind,
    rings: Vec<R>,
    extents: Rect<f64>,
}

impl<R> BoundaryEntity<R> {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: BoundaryKind,
        rings: Vec<R>,
        extents: Rect<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            rings,
            extents,
        }
    }

    /// Boundary of an unrecognized class, labelled with its class description
    pub fn generic(label: impl Into<String>, rings: Vec<R>, extents: Rect<f64>) -> Self {
        Self::new("", label, BoundaryKind::Generic, rings, extents)
    }

    pub fn state(state: impl Into<String>, rings: Vec<R>, extents: Rect<f64>) -> Self {
        let state = state.into();
        Self::new(
            "State",
            state.clone(),
            BoundaryKind::State { state },
            rings,
            extents,
        )
    }

    /// Congressional district named `<state>-<district>`
    pub fn congressional_district(
        label: impl Into<String>,
        state: impl Into<String>,
        district: impl Into<String>,
        rings: Vec<R>,
        extents: Rect<f64>,
    ) -> Self {
        let state = state.into();
        let district = district.into();
        Self::new(
            format!("{}-{}", state, district),
            label,
            BoundaryKind::CongressionalDistrict { state, district },
            rings,
            extents,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &BoundaryKind {
        &self.kind
    }

    pub fn rings(&self) -> &[R] {
        &self.rings
    }

    pub fn extents(&self) -> Rect<f64> {
        self.extents
    }

    pub fn is_congressional_district(&self) -> bool {
        matches!(self.kind, BoundaryKind::CongressionalDistrict { .. })
    }

    /// State abbreviation or name, for state and district boundaries
    pub fn state_code(&self) -> Option<&str> {
        match &self.kind {
            BoundaryKind::State { state } | BoundaryKind::CongressionalDistrict { state, .. } => {
                Some(state)
            }
            BoundaryKind::Generic => None,
        }
    }

    /// Raw (unnormalized) district code
    pub fn district_code(&self) -> Option<&str> {
        match &self.kind {
            BoundaryKind::CongressionalDistrict { district, .. } => Some(district),
            _ => None,
        }
    }

    /// Is the point strictly inside the extents on both axes
    pub fn in_extents(&self, point: Coord<f64>) -> bool {
        let (min, max) = (self.extents.min(), self.extents.max());
        min.x < point.x && point.x < max.x && min.y < point.y && point.y < max.y
    }
}

impl<R: ContainsPoint> BoundaryEntity<R> {
    /// Extents check first; rings are only consulted for points inside them.
    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.in_extents(point) && self.rings.iter().any(|ring| ring.contains_point(point))
    }
}

impl BoundaryEntity<Ring> {
    /// KML `<Placemark>` with every ring as a polygon
    pub fn to_kml(&self) -> String {
        let polygons: String = self.rings.iter().map(Ring::to_kml).collect();
        format!(
            "<Placemark><name>{}</name>\n<MultiGeometry>{}</MultiGeometry>\n</Placemark>",
            xml_escape(&self.name),
            polygons
        )
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
