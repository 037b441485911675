use super::TilePolygon;
use geo::algorithm::contains::Contains;
use geo_types::{Coord, Line, Rect};

/// Edges that reach into a rectangle by less than this fraction of its larger
/// side are treated as touching its boundary.
const BOUNDARY_TOLERANCE: f64 = 1e-12;

/// How a rectangle sits relative to a polygon's closed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectRelation {
    /// The rectangle lies in the closed polygon.
    Inside,
    /// The polygon boundary passes through the rectangle's interior.
    Crossing,
    /// No interior overlap. The boundaries may still touch.
    Disjoint,
}

impl TilePolygon {
    /// Relates `rect` to the polygon.
    ///
    /// If no ring edge enters the open rectangle, its interior lies entirely
    /// inside or entirely outside the polygon, and the centre point decides.
    pub fn relate_rect(&self, rect: &Rect<f64>) -> RectRelation {
        let tol = BOUNDARY_TOLERANCE * rect.width().max(rect.height());

        if self.any_segment_near(rect, |line| crosses_interior(line, rect, tol)) {
            return RectRelation::Crossing;
        }

        let min = rect.min();
        let max = rect.max();
        let center = Coord {
            x: 0.5 * (min.x + max.x),
            y: 0.5 * (min.y + max.y),
        };
        if self.as_polygon().contains(&center) {
            RectRelation::Inside
        } else {
            RectRelation::Disjoint
        }
    }

    /// True iff `rect` lies in the polygon's closed region.
    pub fn covers(&self, rect: &Rect<f64>) -> bool {
        self.relate_rect(rect) == RectRelation::Inside
    }

    /// True iff the polygon and `rect` share interior area. Contact along the
    /// boundary alone does not count.
    pub fn intersects(&self, rect: &Rect<f64>) -> bool {
        self.relate_rect(rect) != RectRelation::Disjoint
    }
}

/// Liang-Barsky clip of `line` against `rect`. The clipped piece enters the
/// open interior iff its midpoint does, since a chord of a convex region is
/// either interior or lies on one face.
fn crosses_interior(line: &Line<f64>, rect: &Rect<f64>, tol: f64) -> bool {
    let min = rect.min();
    let max = rect.max();
    let a = line.start;
    let dx = line.end.x - a.x;
    let dy = line.end.y - a.y;

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.x - min.x),
        (dx, max.x - a.x),
        (-dy, a.y - min.y),
        (dy, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }

    if t0 >= t1 {
        return false;
    }

    let tm = 0.5 * (t0 + t1);
    let mx = a.x + dx * tm;
    let my = a.y + dy * tm;

    mx > min.x + tol && mx < max.x - tol && my > min.y + tol && my < max.y - tol
}
