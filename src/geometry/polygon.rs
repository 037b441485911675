use crate::error::{Result, TilingError};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::bounding_rect::BoundingRect;
use geo::Area;
use geo_types::{Coord, Line, LineString, Polygon, Rect};
use rstar::{RTree, RTreeObject, AABB};
use std::fmt;

/// Rings whose area is below this fraction of their bounding box area are
/// treated as zero-area.
const AREA_TOLERANCE: f64 = 1e-12;

// Ring segment indexable by rstar
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexedSegment {
    pub line: Line<f64>,
    pub index: usize,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let p1 = self.line.start;
        let p2 = self.line.end;
        AABB::from_corners(
            [p1.x.min(p2.x), p1.y.min(p2.y)],
            [p1.x.max(p2.x), p1.y.max(p2.y)],
        )
    }
}

/// A simple polygon (single ring, no holes) with positive area.
///
/// Construction validates the ring, so every `TilePolygon` that exists is safe
/// to hand to the classifier. Ring segments are kept in an R-tree so tile
/// queries only look at edges near the tile.
pub struct TilePolygon {
    polygon: Polygon<f64>,
    bbox: Rect<f64>,
    area: f64,
    segments: RTree<IndexedSegment>,
}

impl TilePolygon {
    /// Builds a polygon from its ring vertices in order.
    ///
    /// A repeated closing vertex and consecutive duplicates are dropped. Fails
    /// with [`TilingError::InvalidPolygon`] when fewer than three distinct
    /// vertices remain, a coordinate is not finite, the ring has no area, or
    /// the ring crosses or touches itself.
    pub fn new(vertices: Vec<Coord<f64>>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(TilingError::InvalidPolygon(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        if let Some(c) = vertices.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(TilingError::InvalidPolygon(format!(
                "vertex ({}, {}) is not finite",
                c.x, c.y
            )));
        }

        let mut ring = distinct_ring(vertices);
        if ring.len() < 3 {
            return Err(TilingError::InvalidPolygon(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                ring.len()
            )));
        }
        ring.push(ring[0]);

        let polygon = Polygon::new(LineString::new(ring), vec![]);
        let bbox = polygon
            .bounding_rect()
            .ok_or_else(|| TilingError::InvalidPolygon("polygon ring is empty".to_string()))?;

        let area = polygon.unsigned_area();
        if !(area > AREA_TOLERANCE * bbox.width() * bbox.height()) {
            return Err(TilingError::InvalidPolygon(
                "polygon encloses zero area".to_string(),
            ));
        }

        let indexed: Vec<IndexedSegment> = polygon
            .exterior()
            .lines()
            .enumerate()
            .map(|(index, line)| IndexedSegment { line, index })
            .collect();
        let segment_count = indexed.len();
        let segments = RTree::bulk_load(indexed);

        check_simple(&segments, segment_count)?;

        Ok(Self {
            polygon,
            bbox,
            area,
            segments,
        })
    }

    pub fn as_polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Closed exterior ring (first vertex repeated at the end).
    pub fn exterior(&self) -> &LineString<f64> {
        self.polygon.exterior()
    }

    /// Number of distinct ring vertices.
    pub fn vertex_count(&self) -> usize {
        self.polygon.exterior().0.len() - 1
    }

    pub fn bounding_rect(&self) -> Rect<f64> {
        self.bbox
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Open ring, without the closing vertex.
    pub(crate) fn ring(&self) -> &[Coord<f64>] {
        let coords = &self.polygon.exterior().0;
        &coords[..coords.len() - 1]
    }

    /// True if `pred` holds for any ring segment whose envelope touches `rect`.
    pub(crate) fn any_segment_near<F>(&self, rect: &Rect<f64>, mut pred: F) -> bool
    where
        F: FnMut(&Line<f64>) -> bool,
    {
        let envelope = AABB::from_corners(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        );
        self.segments
            .locate_in_envelope_intersecting(&envelope)
            .any(|s| pred(&s.line))
    }
}

impl fmt::Debug for TilePolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TilePolygon")
            .field("exterior", self.polygon.exterior())
            .field("area", &self.area)
            .finish()
    }
}

impl TryFrom<Polygon<f64>> for TilePolygon {
    type Error = TilingError;

    fn try_from(polygon: Polygon<f64>) -> Result<Self> {
        if !polygon.interiors().is_empty() {
            return Err(TilingError::InvalidPolygon(format!(
                "polygons with holes are not supported ({} interior rings)",
                polygon.interiors().len()
            )));
        }
        let (exterior, _) = polygon.into_inner();
        TilePolygon::new(exterior.0)
    }
}

/// Returns true iff `vertices` form a simple ring enclosing positive area.
pub fn validate(vertices: &[Coord<f64>]) -> bool {
    TilePolygon::new(vertices.to_vec()).is_ok()
}

fn distinct_ring(mut vertices: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

/// Rejects rings where non-adjacent edges meet, or adjacent edges fold back
/// onto each other.
fn check_simple(tree: &RTree<IndexedSegment>, segment_count: usize) -> Result<()> {
    for (a, b) in tree.intersection_candidates_with_other_tree(tree) {
        if a.index >= b.index {
            continue;
        }

        let Some(hit) = line_intersection(a.line, b.line) else {
            continue;
        };

        let adjacent = b.index == a.index + 1 || (a.index == 0 && b.index == segment_count - 1);

        match hit {
            // Neighbouring edges always share their common vertex.
            LineIntersection::SinglePoint { .. } if adjacent => {}
            LineIntersection::SinglePoint { intersection: pt, .. } => {
                return Err(TilingError::InvalidPolygon(format!(
                    "ring self-intersects at ({}, {})",
                    pt.x, pt.y
                )));
            }
            LineIntersection::Collinear { intersection: overlap } => {
                return Err(TilingError::InvalidPolygon(format!(
                    "ring edges {} and {} overlap between ({}, {}) and ({}, {})",
                    a.index, b.index, overlap.start.x, overlap.start.y, overlap.end.x, overlap.end.y
                )));
            }
        }
    }
    Ok(())
}
