use crate::accounting::CoverageResult;
use crate::classifier::Classification;
use crate::error::{ErrorKind, Result, TilingError};
use crate::geojson_io::{polygon_from_geojson, report_to_geojson_string};
use crate::TileCounter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
struct TileCountOutput {
    coverage: CoverageResult,
    fully_inside: usize,
    partially_inside: usize,
    outside: usize,
    /// FeatureCollection of classified cells, ready for a map layer.
    cells: String,
}

#[derive(Serialize)]
struct ErrorOutput {
    kind: ErrorKind,
    message: String,
}

/// Counts tiles for the first polygon in `geojson_str`.
///
/// Resolves to `{ coverage, fully_inside, partially_inside, outside, cells }`
/// or rejects with `{ kind, message }`.
#[wasm_bindgen]
pub fn count_tiles(
    geojson_str: &str,
    tile_width: f64,
    tile_height: f64,
    promotion_threshold: Option<f64>,
) -> std::result::Result<JsValue, JsValue> {
    let output = run(geojson_str, tile_width, tile_height, promotion_threshold).map_err(to_js_error)?;

    serde_wasm_bindgen::to_value(&output)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}

fn run(
    geojson_str: &str,
    tile_width: f64,
    tile_height: f64,
    promotion_threshold: Option<f64>,
) -> Result<TileCountOutput> {
    let polygon = polygon_from_geojson(geojson_str)?;

    let mut counter = TileCounter::new(tile_width, tile_height);
    if let Some(threshold) = promotion_threshold {
        counter = counter.with_promotion_threshold(threshold);
    }

    let report = counter.run_polygon(&polygon)?;

    Ok(TileCountOutput {
        coverage: report.coverage,
        fully_inside: report.count_of(Classification::FullyInside),
        partially_inside: report.count_of(Classification::PartiallyInside),
        outside: report.count_of(Classification::Outside),
        cells: report_to_geojson_string(&report)?,
    })
}

fn to_js_error(err: TilingError) -> JsValue {
    let payload = ErrorOutput {
        kind: err.kind(),
        message: err.to_string(),
    };
    serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| JsValue::from_str(&payload.message))
}
