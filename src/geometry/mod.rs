//! Polygon validity and polygon/rectangle relations.

mod clip;
mod polygon;
mod relate;

pub use polygon::{validate, TilePolygon};
pub use relate::RectRelation;
