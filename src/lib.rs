//! Counts the fixed-size rectangular tiles needed to cover a simple polygon.
//!
//! Cells of a tile-aligned grid are classified as fully inside, partially
//! inside, or outside the polygon. Partial cells at or above a promotion
//! threshold count as whole tiles; smaller fragments are pooled until they add
//! up to one.

pub mod accounting;
pub mod classifier;
pub mod error;
pub mod geojson_io;
pub mod geometry;
pub mod grid;
pub mod tiling;
pub mod utils;
pub mod wasm;

pub use accounting::{count, count_with, CountingRules, CoverageAccumulator, CoverageResult};
pub use classifier::{classify, Classification, ClassifiedCell};
pub use error::{ErrorKind, Result, TilingError};
pub use geometry::{validate, RectRelation, TilePolygon};
pub use grid::{build_grid, Cell, Grid, GridExtent, TileSpec};
pub use tiling::{TileCounter, TilingReport};
