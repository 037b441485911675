use crate::error::Result;
use crate::geometry::{RectRelation, TilePolygon};
use crate::grid::{Cell, Grid, TileSpec};
use crate::utils::parallel;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    FullyInside,
    PartiallyInside,
    Outside,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::FullyInside => "fully_inside",
            Classification::PartiallyInside => "partially_inside",
            Classification::Outside => "outside",
        }
    }
}

/// A grid cell with its classification and the area it shares with the
/// polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedCell {
    pub cell: Cell,
    pub classification: Classification,
    pub overlap_area: f64,
}

impl ClassifiedCell {
    pub fn coverage_fraction(&self, tile_area: f64) -> f64 {
        self.overlap_area / tile_area
    }
}

/// Classifies every cell of `grid` against `polygon`, preserving cell order.
///
/// Containment wins over intersection, and cells that only touch the polygon
/// boundary come back as [`Classification::Outside`]. Overlap areas are
/// computed here so that accounting never has to go back to the geometry.
pub fn classify(polygon: &TilePolygon, grid: &Grid) -> Result<Vec<ClassifiedCell>> {
    let tile = grid.tile;
    let classified = parallel::map_ordered(&grid.cells, |cell| classify_cell(polygon, cell, &tile))
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    if log::log_enabled!(log::Level::Debug) {
        let (full, partial, outside) = tally(&classified);
        debug!(
            "classified {} cells: {} fully inside, {} partial, {} outside",
            classified.len(),
            full,
            partial,
            outside
        );
    }

    Ok(classified)
}

pub fn classify_cell(polygon: &TilePolygon, cell: &Cell, tile: &TileSpec) -> Result<ClassifiedCell> {
    let rect = cell.rect(tile);
    let (classification, overlap_area) = match polygon.relate_rect(&rect) {
        RectRelation::Inside => (Classification::FullyInside, tile.area()),
        RectRelation::Crossing => (Classification::PartiallyInside, polygon.overlap_area(&rect)?),
        RectRelation::Disjoint => (Classification::Outside, 0.0),
    };

    Ok(ClassifiedCell {
        cell: *cell,
        classification,
        overlap_area,
    })
}

/// Counts cells per classification: (fully inside, partial, outside).
pub fn tally(cells: &[ClassifiedCell]) -> (usize, usize, usize) {
    cells.iter().fold((0, 0, 0), |(full, partial, outside), c| match c.classification {
        Classification::FullyInside => (full + 1, partial, outside),
        Classification::PartiallyInside => (full, partial + 1, outside),
        Classification::Outside => (full, partial, outside + 1),
    })
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
