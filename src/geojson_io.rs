//! GeoJSON in and out: read the polygon to tile, write classified cells for
//! display.

use crate::error::{Result, TilingError};
use crate::geometry::TilePolygon;
use crate::tiling::TilingReport;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;
use std::str::FromStr;

/// Reads the first geometry of a GeoJSON document as a polygon.
///
/// Accepts a bare Geometry, a Feature, or a FeatureCollection. The geometry
/// must be a Polygon without holes, or a MultiPolygon with exactly one part.
pub fn polygon_from_geojson(geojson_str: &str) -> Result<TilePolygon> {
    let geojson = GeoJson::from_str(geojson_str)
        .map_err(|e| TilingError::GeoJson(format!("failed to parse GeoJSON: {}", e)))?;

    let geometry = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.into_iter().find_map(|f| f.geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::Geometry(geometry) => Some(geometry),
    }
    .ok_or_else(|| TilingError::InvalidPolygon("GeoJSON contains no geometry".to_string()))?;

    polygon_from_geometry(geometry)
}

pub fn polygon_from_geometry(geometry: Geometry) -> Result<TilePolygon> {
    let geo_geom: geo_types::Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| TilingError::GeoJson(e.to_string()))?;

    match geo_geom {
        geo_types::Geometry::Polygon(poly) => TilePolygon::try_from(poly),
        geo_types::Geometry::MultiPolygon(mpoly) => {
            let mut parts = mpoly.0.into_iter();
            match (parts.next(), parts.next()) {
                (Some(poly), None) => TilePolygon::try_from(poly),
                _ => Err(TilingError::InvalidPolygon(
                    "multi-part polygons are not supported".to_string(),
                )),
            }
        }
        _ => Err(TilingError::InvalidPolygon(
            "expected a Polygon geometry".to_string(),
        )),
    }
}

/// One Polygon feature per cell, with the coverage result attached to the
/// collection as a foreign member named `coverage`.
pub fn report_to_geojson(report: &TilingReport) -> Result<FeatureCollection> {
    let tile_area = report.tile.area();

    let features: Vec<Feature> = report
        .cells
        .iter()
        .map(|c| {
            let rect = c.cell.rect(&report.tile);
            let mut properties = JsonObject::new();
            properties.insert("i".to_string(), json!(c.cell.i));
            properties.insert("j".to_string(), json!(c.cell.j));
            properties.insert("classification".to_string(), json!(c.classification.as_str()));
            properties.insert("overlap_area".to_string(), json!(c.overlap_area));
            properties.insert(
                "coverage_fraction".to_string(),
                json!(c.coverage_fraction(tile_area)),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&rect.to_polygon()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let coverage = serde_json::to_value(report.coverage)
        .map_err(|e| TilingError::GeoJson(format!("failed to encode coverage: {}", e)))?;
    let mut foreign_members = JsonObject::new();
    foreign_members.insert("coverage".to_string(), coverage);

    let extent = &report.extent;
    Ok(FeatureCollection {
        bbox: Some(vec![extent.x_min, extent.y_min, extent.x_max, extent.y_max]),
        features,
        foreign_members: Some(foreign_members),
    })
}

pub fn report_to_geojson_string(report: &TilingReport) -> Result<String> {
    Ok(GeoJson::FeatureCollection(report_to_geojson(report)?).to_string())
}
