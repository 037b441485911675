use approx::assert_relative_eq;
use geo_tilecount::geojson_io::{polygon_from_geojson, report_to_geojson};
use geo_tilecount::{
    build_grid, classify, count, Classification, TileCounter, TilePolygon, TilingError,
};
use geo_types::Coord;

fn vertices(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
    points.iter().copied().map(Coord::from).collect()
}

#[test]
fn test_pipeline_stages_match_tile_counter() {
    let ring = vertices(&[(0.0, 0.0), (300.0, 0.0), (300.0, 300.0), (0.0, 300.0)]);

    // Stage by stage
    let polygon = TilePolygon::new(ring.clone()).unwrap();
    let grid = build_grid(polygon.bounding_rect(), 200.0, 200.0).unwrap();
    let cells = classify(&polygon, &grid).unwrap();
    let coverage = count(&cells, grid.tile.area());

    // All at once
    let report = TileCounter::new(200.0, 200.0).run(&ring).unwrap();

    assert_eq!(report.cells, cells);
    assert_eq!(report.coverage, coverage);
    assert_eq!(coverage.total_tiles, 3);
    assert!((3..=4).contains(&coverage.total_tiles));
}

#[test]
fn test_room_floor_plan() {
    // L-shaped room, 60x40 tiles
    //
    //  0,300 +------+ 120,300
    //        |      |
    //        |      +-----------+ 360,120
    //        |                  |
    //  0,0   +------------------+ 360,0
    let room = vertices(&[
        (0.0, 0.0),
        (360.0, 0.0),
        (360.0, 120.0),
        (120.0, 120.0),
        (120.0, 300.0),
        (0.0, 300.0),
    ]);
    let report = TileCounter::new(60.0, 40.0).run(&room).unwrap();

    // Every x edge sits on the 60 grid; y = 300 falls halfway through a row
    assert_eq!(report.extent.n_cols, 6);
    assert_eq!(report.extent.n_rows, 8);

    // Bottom band: 6 cols x 3 rows. Left arm: 2 cols x 4 full rows (y 120..280)
    // plus 2 half tiles at the top (y 280..300).
    assert_eq!(report.count_of(Classification::FullyInside), 18 + 8);
    assert_eq!(report.count_of(Classification::PartiallyInside), 2);

    let coverage = report.coverage;
    assert_eq!(coverage.full_tile_count, 26);
    assert_eq!(coverage.rollup_count, 1);
    assert_eq!(coverage.residual_pool, 0.0);
    assert_eq!(coverage.total_tiles, 27);

    assert_relative_eq!(report.covered_area(), 360.0 * 120.0 + 120.0 * 180.0, epsilon = 1e-6);
}

#[test]
fn test_circle_like_polygon() {
    let ring: Vec<Coord<f64>> = (0..120)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::TAU / 120.0;
            Coord {
                x: 500.0 + 330.0 * angle.cos(),
                y: 500.0 + 330.0 * angle.sin(),
            }
        })
        .collect();
    let polygon = TilePolygon::new(ring).unwrap();
    let report = TileCounter::new(50.0, 50.0).run_polygon(&polygon).unwrap();

    assert_relative_eq!(report.covered_area(), polygon.area(), max_relative = 1e-9);

    let coverage = report.coverage;
    let inside = report.count_of(Classification::FullyInside);
    let partial = report.count_of(Classification::PartiallyInside);
    assert!(inside > 0 && partial > 0);
    assert!(coverage.full_tile_count >= inside);
    assert!(coverage.residual_pool < 1.0);
    // Each touched cell adds at most one tile
    assert!(coverage.total_tiles <= inside + partial);
}

#[test]
fn test_geojson_in_geojson_out() {
    let doc = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "patio" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [30, 0], [30, 10], [0, 10], [0, 0]]]
            }
        }]
    }"#;
    let polygon = polygon_from_geojson(doc).unwrap();
    let report = TileCounter::new(10.0, 10.0).run_polygon(&polygon).unwrap();

    assert_eq!(report.coverage.full_tile_count, 3);
    assert_eq!(report.coverage.total_tiles, 3);

    let fc = report_to_geojson(&report).unwrap();
    assert_eq!(fc.features.len(), 3);
    assert!(fc
        .features
        .iter()
        .all(|f| f.properties.as_ref().unwrap()["classification"] == "fully_inside"));
}

#[test]
fn test_two_vertex_polygon_is_rejected() {
    let err = TileCounter::new(200.0, 200.0)
        .run(&vertices(&[(0.0, 0.0), (100.0, 100.0)]))
        .unwrap_err();
    assert!(matches!(err, TilingError::InvalidPolygon(_)));
    assert_eq!(err.kind(), geo_tilecount::ErrorKind::InvalidPolygon);
}

#[test]
fn test_self_intersecting_polygon_is_rejected() {
    let err = TileCounter::new(10.0, 10.0)
        .run(&vertices(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 5.0)]))
        .unwrap_err();
    assert!(matches!(err, TilingError::InvalidPolygon(_)));
}
