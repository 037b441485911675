use crate::accounting::{count_with, CountingRules, CoverageResult};
use crate::classifier::{classify, tally, Classification, ClassifiedCell};
use crate::error::Result;
use crate::geometry::TilePolygon;
use crate::grid::{Grid, GridExtent, TileSpec};
use geo_types::Coord;
use log::debug;
use serde::Serialize;

/// Runs the whole count for one polygon: validate, build the grid, classify
/// every cell, then fold the classified cells into a [`CoverageResult`].
///
/// Every call starts from scratch. Nothing is cached between runs.
#[derive(Debug, Clone)]
pub struct TileCounter {
    tile_width: f64,
    tile_height: f64,
    rules: CountingRules,
}

impl TileCounter {
    pub fn new(tile_width: f64, tile_height: f64) -> Self {
        Self {
            tile_width,
            tile_height,
            rules: CountingRules::default(),
        }
    }

    pub fn with_promotion_threshold(mut self, threshold: f64) -> Self {
        self.rules.promotion_threshold = threshold;
        self
    }

    pub fn with_rules(mut self, rules: CountingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &CountingRules {
        &self.rules
    }

    /// Validates `vertices` as a polygon and counts tiles for it. The polygon
    /// is checked before anything else, so a bad ring never reaches the grid.
    pub fn run(&self, vertices: &[Coord<f64>]) -> Result<TilingReport> {
        let polygon = TilePolygon::new(vertices.to_vec())?;
        self.run_polygon(&polygon)
    }

    pub fn run_polygon(&self, polygon: &TilePolygon) -> Result<TilingReport> {
        let tile = TileSpec::new(self.tile_width, self.tile_height)?;
        self.rules.validate()?;

        let grid = Grid::for_polygon(polygon, tile)?;
        debug!(
            "grid {} x {} over [{}, {}] x [{}, {}] for {} vertex polygon",
            grid.extent.n_cols,
            grid.extent.n_rows,
            grid.extent.x_min,
            grid.extent.x_max,
            grid.extent.y_min,
            grid.extent.y_max,
            polygon.vertex_count()
        );

        let cells = classify(polygon, &grid)?;
        let coverage = count_with(&cells, tile.area(), &self.rules);
        debug!(
            "coverage: {} full, {} rollup, pool {:.4}, {} total",
            coverage.full_tile_count,
            coverage.rollup_count,
            coverage.residual_pool,
            coverage.total_tiles
        );

        Ok(TilingReport {
            extent: grid.extent,
            tile,
            cells,
            coverage,
        })
    }
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct TilingReport {
    pub extent: GridExtent,
    pub tile: TileSpec,
    pub cells: Vec<ClassifiedCell>,
    pub coverage: CoverageResult,
}

impl TilingReport {
    pub fn count_of(&self, classification: Classification) -> usize {
        let (full, partial, outside) = tally(&self.cells);
        match classification {
            Classification::FullyInside => full,
            Classification::PartiallyInside => partial,
            Classification::Outside => outside,
        }
    }

    /// Sum of per-cell overlap areas; equals the polygon area up to rounding.
    pub fn covered_area(&self) -> f64 {
        self.cells.iter().map(|c| c.overlap_area).sum()
    }
}

#[cfg(test)]
#[path = "tiling_tests.rs"]
mod tests;
