use crate::error::{Result, TilingError};
use crate::geometry::TilePolygon;
use geo_types::{Coord, Rect};
use serde::Serialize;

/// Upper bound on the number of cells a single grid may hold.
pub const MAX_GRID_CELLS: usize = 50_000_000;

/// Tile dimensions. Both are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileSpec {
    width: f64,
    height: f64,
}

impl TileSpec {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(TilingError::InvalidTileSize(format!(
                "tile width must be a positive finite number, got {}",
                width
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(TilingError::InvalidTileSize(format!(
                "tile height must be a positive finite number, got {}",
                height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Polygon bounding box snapped outward to tile multiples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub n_cols: usize,
    pub n_rows: usize,
}

impl GridExtent {
    pub fn cell_count(&self) -> usize {
        self.n_cols * self.n_rows
    }

    pub fn as_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.x_min, y: self.y_min },
            Coord { x: self.x_max, y: self.y_max },
        )
    }
}

/// One candidate tile: column `i`, row `j`, lower-left corner `(x0, y0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
    pub x0: f64,
    pub y0: f64,
}

impl Cell {
    pub fn origin(&self) -> Coord<f64> {
        Coord { x: self.x0, y: self.y0 }
    }

    pub fn rect(&self, tile: &TileSpec) -> Rect<f64> {
        Rect::new(
            Coord { x: self.x0, y: self.y0 },
            Coord {
                x: self.x0 + tile.width,
                y: self.y0 + tile.height,
            },
        )
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    pub extent: GridExtent,
    pub tile: TileSpec,
    /// Column-major: all rows of column 0, then column 1, and so on.
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn new(bbox: Rect<f64>, tile: TileSpec) -> Result<Self> {
        let (x_min, x_max, n_cols) = snap_axis(bbox.min().x, bbox.max().x, tile.width)?;
        let (y_min, y_max, n_rows) = snap_axis(bbox.min().y, bbox.max().y, tile.height)?;

        let cell_count = n_cols
            .checked_mul(n_rows)
            .filter(|n| *n <= MAX_GRID_CELLS)
            .ok_or_else(|| {
                TilingError::InvalidTileSize(format!(
                    "a {} x {} tile yields a {} x {} grid, above the {} cell limit",
                    tile.width, tile.height, n_cols, n_rows, MAX_GRID_CELLS
                ))
            })?;

        let mut cells = Vec::with_capacity(cell_count);
        for i in 0..n_cols {
            for j in 0..n_rows {
                cells.push(Cell {
                    i,
                    j,
                    x0: x_min + i as f64 * tile.width,
                    y0: y_min + j as f64 * tile.height,
                });
            }
        }

        Ok(Self {
            extent: GridExtent {
                x_min,
                x_max,
                y_min,
                y_max,
                n_cols,
                n_rows,
            },
            tile,
            cells,
        })
    }

    pub fn for_polygon(polygon: &TilePolygon, tile: TileSpec) -> Result<Self> {
        Self::new(polygon.bounding_rect(), tile)
    }
}

/// Builds the tile-aligned grid covering `bbox`.
pub fn build_grid(bbox: Rect<f64>, tile_width: f64, tile_height: f64) -> Result<Grid> {
    let tile = TileSpec::new(tile_width, tile_height)?;
    Grid::new(bbox, tile)
}

/// Snaps `[lo, hi]` outward to multiples of `size` and counts the tiles.
///
/// The count is rounded rather than truncated so that `(hi - lo) / size`
/// landing a hair under an integer does not drop a column. A zero-length
/// range gets no tiles.
fn snap_axis(lo: f64, hi: f64, size: f64) -> Result<(f64, f64, usize)> {
    let snapped_lo = (lo / size).floor() * size;
    let snapped_hi = (hi / size).ceil() * size;

    let count = ((snapped_hi - snapped_lo) / size).round();
    if !count.is_finite() || count > MAX_GRID_CELLS as f64 {
        return Err(TilingError::InvalidTileSize(format!(
            "tile size {} is too small for extent [{}, {}]",
            size, lo, hi
        )));
    }

    if hi <= lo {
        return Ok((snapped_lo, snapped_hi, 0));
    }
    Ok((snapped_lo, snapped_hi, count as usize))
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
