//! Single polygon ring with a winding-number containment test.

use geo::Coord;

/// Anything that can answer "is this point inside me"
pub trait ContainsPoint {
    fn contains_point(&self, point: Coord<f64>) -> bool;
}

/// Which edges of a ring take part in the containment test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RingClosure {
    /// Only edges between consecutive stored vertices. A ring that does not
    /// repeat its first vertex at the end is tested as an open chain.
    #[default]
    Stored,
    /// Also test the edge from the last vertex back to the first when the
    /// stored ring is not already closed.
    Implicit,
}

/// Ordered ring of vertices, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<Coord<f64>>,
    closure: RingClosure,
}

impl Ring {
    pub fn new(vertices: Vec<Coord<f64>>) -> Self {
        Self::with_closure(vertices, RingClosure::Stored)
    }

    pub fn with_closure(vertices: Vec<Coord<f64>>, closure: RingClosure) -> Self {
        Self { vertices, closure }
    }

    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.vertices
    }

    /// Whether the stored vertex list repeats its first vertex at the end
    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 2 && self.vertices.first() == self.vertices.last()
    }

    fn edges(&self) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
        let closing = match (self.closure, self.vertices.first(), self.vertices.last()) {
            (RingClosure::Implicit, Some(&first), Some(&last)) if !self.is_closed() => {
                Some((last, first))
            }
            _ => None,
        };
        self.vertices
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    /// Winding test: count upward crossings with the point on the left and
    /// downward crossings with the point on the right; inside iff non-zero.
    ///
    /// Points exactly on an edge or vertex may land either way. Rings with
    /// fewer than two vertices contain nothing.
    pub fn contains(&self, point: Coord<f64>) -> bool {
        let mut winds = 0i32;

        for (a, b) in self.edges() {
            if a.y < point.y && point.y < b.y && left_of_edge(point, a, b) {
                winds += 1;
            } else if a.y > point.y && point.y > b.y && !left_of_edge(point, a, b) {
                winds -= 1;
            }
        }

        winds != 0
    }

    /// KML `<Polygon>` for this ring
    pub fn to_kml(&self) -> String {
        let coords = self
            .vertices
            .iter()
            .map(|v| format!("{:.15},{:.15}", v.x, v.y))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "<Polygon><outerBoundaryIs><LinearRing>\n<coordinates>{}</coordinates>\n</LinearRing></outerBoundaryIs></Polygon>",
            coords
        )
    }
}

impl ContainsPoint for Ring {
    fn contains_point(&self, point: Coord<f64>) -> bool {
        self.contains(point)
    }
}

/// Is `point` left of the infinite line through `e1` and `e2`
fn left_of_edge(point: Coord<f64>, e1: Coord<f64>, e2: Coord<f64>) -> bool {
    (e1.x - point.x) * (e2.y - point.y) - (e2.x - point.x) * (e1.y - point.y) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn square() -> Ring {
        Ring::new(vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0)])
    }

    #[test]
    fn test_square_contains_center() {
        assert!(square().contains(c(5.0, 5.0)));
    }

    #[test]
    fn test_square_excludes_outside() {
        let ring = square();
        assert!(!ring.contains(c(15.0, 15.0)));
        assert!(!ring.contains(c(-5.0, 5.0)));
        assert!(!ring.contains(c(15.0, 5.0)));
        assert!(!ring.contains(c(5.0, -5.0)));
    }

    #[test]
    fn test_orientation_does_not_matter_for_closed_rings() {
        let cw = Ring::new(vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(0.0, 0.0),
        ]);
        let ccw = Ring::new(vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
            c(0.0, 0.0),
        ]);
        assert!(cw.contains(c(5.0, 5.0)));
        assert!(ccw.contains(c(5.0, 5.0)));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upward
        let ring = Ring::new(vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(7.0, 10.0),
            c(7.0, 3.0),
            c(3.0, 3.0),
            c(3.0, 10.0),
            c(0.0, 10.0),
            c(0.0, 0.0),
        ]);
        assert!(ring.contains(c(1.5, 8.0)));
        assert!(ring.contains(c(8.5, 8.0)));
        assert!(ring.contains(c(5.0, 1.5)));
        assert!(!ring.contains(c(5.0, 8.0)));
    }

    #[test]
    fn test_open_ring_skips_closing_edge() {
        // counter-clockwise without the repeated first vertex: the missing
        // edge is the only one that would register a crossing
        let open = vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0)];
        assert!(!Ring::new(open.clone()).contains(c(5.0, 5.0)));
        assert!(Ring::with_closure(open, RingClosure::Implicit).contains(c(5.0, 5.0)));
    }

    #[test]
    fn test_implicit_closure_does_not_double_closed_rings() {
        let closed = vec![
            c(0.0, 0.0),
            c(10.0, 0.0),
            c(10.0, 10.0),
            c(0.0, 10.0),
            c(0.0, 0.0),
        ];
        let stored = Ring::new(closed.clone());
        let implicit = Ring::with_closure(closed, RingClosure::Implicit);
        assert!(stored.is_closed());
        assert_eq!(stored.edges().count(), implicit.edges().count());
        assert_eq!(stored.contains(c(5.0, 5.0)), implicit.contains(c(5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_rings_contain_nothing() {
        assert!(!Ring::new(vec![]).contains(c(0.0, 0.0)));
        assert!(!Ring::new(vec![c(1.0, 1.0)]).contains(c(1.0, 1.0)));
        assert!(!Ring::with_closure(vec![c(1.0, 1.0)], RingClosure::Implicit).contains(c(1.0, 1.0)));
    }

    #[test]
    fn test_kml_coordinates() {
        let kml = Ring::new(vec![c(-86.5, 32.25), c(-86.0, 33.0)]).to_kml();
        assert!(kml.starts_with("<Polygon><outerBoundaryIs><LinearRing>"));
        assert!(kml.contains(
            "<coordinates>-86.500000000000000,32.250000000000000 -86.000000000000000,33.000000000000000</coordinates>"
        ));
    }
}
