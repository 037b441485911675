use super::TilePolygon;
use crate::error::{Result, TilingError};
use geo::Area;
use geo_types::{Coord, LineString, Polygon, Rect};
use smallvec::SmallVec;

/// Relative slack allowed when an overlap area comes out larger than the
/// rectangle it was clipped to.
const AREA_SLACK: f64 = 1e-9;

type ClipBuffer = SmallVec<[Coord<f64>; 16]>;

// One half-plane of the clip rectangle
#[derive(Clone, Copy, Debug)]
enum Boundary {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Boundary {
    fn keeps(self, c: Coord<f64>) -> bool {
        match self {
            Boundary::Left(x) => c.x >= x,
            Boundary::Right(x) => c.x <= x,
            Boundary::Bottom(y) => c.y >= y,
            Boundary::Top(y) => c.y <= y,
        }
    }

    // Only called for segments with one end on each side, so the divisor is
    // never zero.
    fn crossing(self, p: Coord<f64>, q: Coord<f64>) -> Coord<f64> {
        match self {
            Boundary::Left(x) | Boundary::Right(x) => {
                let t = (x - p.x) / (q.x - p.x);
                Coord { x, y: p.y + t * (q.y - p.y) }
            }
            Boundary::Bottom(y) | Boundary::Top(y) => {
                let t = (y - p.y) / (q.y - p.y);
                Coord { x: p.x + t * (q.x - p.x), y }
            }
        }
    }
}

/// Sutherland-Hodgman clip of an open ring against an axis-aligned rectangle.
///
/// Concave rings can come back with zero-width bridges along the rectangle
/// sides; they contribute nothing to the shoelace area.
pub(crate) fn clip_ring_to_rect(ring: &[Coord<f64>], rect: &Rect<f64>) -> Vec<Coord<f64>> {
    let min = rect.min();
    let max = rect.max();

    let mut current: ClipBuffer = ring.iter().copied().collect();
    for boundary in [
        Boundary::Left(min.x),
        Boundary::Right(max.x),
        Boundary::Bottom(min.y),
        Boundary::Top(max.y),
    ] {
        if current.is_empty() {
            break;
        }
        current = clip_against(&current, boundary);
    }
    current.into_vec()
}

fn clip_against(input: &[Coord<f64>], boundary: Boundary) -> ClipBuffer {
    let mut output = ClipBuffer::new();
    let mut prev = input[input.len() - 1];

    for &cur in input {
        match (boundary.keeps(prev), boundary.keeps(cur)) {
            (true, true) => output.push(cur),
            (true, false) => output.push(boundary.crossing(prev, cur)),
            (false, true) => {
                output.push(boundary.crossing(prev, cur));
                output.push(cur);
            }
            (false, false) => {}
        }
        prev = cur;
    }
    output
}

impl TilePolygon {
    /// Area of the intersection of the polygon and `rect`.
    ///
    /// Returns 0 when they are disjoint and the rectangle's own area when it
    /// lies inside the polygon. A result that is not finite, or that exceeds
    /// the rectangle area, is reported as [`TilingError::GeometryFailure`]
    /// rather than clamped away.
    pub fn overlap_area(&self, rect: &Rect<f64>) -> Result<f64> {
        let rect_area = rect.width() * rect.height();

        let clipped = clip_ring_to_rect(self.ring(), rect);
        if clipped.len() < 3 {
            return Ok(0.0);
        }

        let area = Polygon::new(LineString::new(clipped), vec![]).unsigned_area();

        if !area.is_finite() {
            return Err(TilingError::GeometryFailure(format!(
                "overlap area with tile at ({}, {}) is not finite",
                rect.min().x,
                rect.min().y
            )));
        }
        if area > rect_area * (1.0 + AREA_SLACK) {
            return Err(TilingError::GeometryFailure(format!(
                "overlap area {} exceeds tile area {} at ({}, {})",
                area,
                rect_area,
                rect.min().x,
                rect.min().y
            )));
        }

        Ok(area.min(rect_area))
    }
}
