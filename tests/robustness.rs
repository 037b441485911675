use approx::assert_relative_eq;
use geo_tilecount::classifier::classify_cell;
use geo_tilecount::{build_grid, classify, count, Classification, Grid, TileCounter, TilePolygon, TileSpec};
use geo_types::{Coord, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random star-shaped polygon: one vertex per angular sector, so the ring
/// never crosses itself.
fn random_star(rng: &mut StdRng, n: usize) -> TilePolygon {
    let cx = rng.gen_range(-500.0..500.0);
    let cy = rng.gen_range(-500.0..500.0);
    let ring: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let angle = (i as f64 + rng.gen_range(0.1..0.9)) / n as f64 * std::f64::consts::TAU;
            let radius = rng.gen_range(40.0..400.0);
            Coord {
                x: cx + radius * angle.cos(),
                y: cy + radius * angle.sin(),
            }
        })
        .collect();
    TilePolygon::new(ring).expect("star polygons are simple")
}

fn random_tile(rng: &mut StdRng) -> TileSpec {
    TileSpec::new(rng.gen_range(15.0..120.0), rng.gen_range(15.0..120.0)).unwrap()
}

#[test]
fn test_kernel_predicates_agree_with_overlap_area() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..40 {
        let n = rng.gen_range(5..40);
        let polygon = random_star(&mut rng, n);
        let tile = random_tile(&mut rng);
        let grid = Grid::for_polygon(&polygon, tile).unwrap();

        for cell in &grid.cells {
            let rect = cell.rect(&tile);
            let overlap = polygon.overlap_area(&rect).unwrap();

            if polygon.covers(&rect) {
                assert_relative_eq!(overlap, tile.area(), max_relative = 1e-9);
            }
            if !polygon.intersects(&rect) {
                assert!(
                    overlap <= 1e-9 * tile.area(),
                    "disjoint cell at ({}, {}) has overlap {}",
                    cell.x0,
                    cell.y0,
                    overlap
                );
            }
        }
    }
}

#[test]
fn test_overlaps_sum_to_polygon_area() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..40 {
        let n = rng.gen_range(5..60);
        let polygon = random_star(&mut rng, n);
        let tile = random_tile(&mut rng);
        let report = TileCounter::new(tile.width(), tile.height())
            .run_polygon(&polygon)
            .unwrap();

        assert_relative_eq!(report.covered_area(), polygon.area(), max_relative = 1e-9);
    }
}

#[test]
fn test_coverage_result_invariants() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..40 {
        let n = rng.gen_range(5..30);
        let polygon = random_star(&mut rng, n);
        let tile = random_tile(&mut rng);
        let report = TileCounter::new(tile.width(), tile.height())
            .run_polygon(&polygon)
            .unwrap();
        let coverage = report.coverage;

        assert!(coverage.residual_pool >= 0.0 && coverage.residual_pool < 1.0);
        let leftover = usize::from(coverage.residual_pool > 0.0);
        assert_eq!(
            coverage.total_tiles,
            coverage.full_tile_count + coverage.rollup_count + leftover
        );
        assert!(coverage.full_tile_count >= report.count_of(Classification::FullyInside));
        assert!(
            coverage.total_tiles
                <= report.count_of(Classification::FullyInside)
                    + report.count_of(Classification::PartiallyInside)
        );
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(31);
    let polygon = random_star(&mut rng, 25);
    let grid = build_grid(polygon.bounding_rect(), 33.0, 47.0).unwrap();

    let first = classify(&polygon, &grid).unwrap();
    let second = classify(&polygon, &grid).unwrap();
    assert_eq!(first, second);
    assert_eq!(count(&first, grid.tile.area()), count(&second, grid.tile.area()));
}

#[test]
fn test_large_grid_keeps_cell_order() {
    // Small tiles push the grid past the parallel threshold
    let mut rng = StdRng::seed_from_u64(43);
    let polygon = random_star(&mut rng, 50);
    let grid = build_grid(polygon.bounding_rect(), 9.0, 9.0).unwrap();
    assert!(grid.cells.len() > 1000);

    let classified = classify(&polygon, &grid).unwrap();
    assert_eq!(classified.len(), grid.cells.len());

    for (expected, got) in grid.cells.iter().zip(&classified) {
        assert_eq!(got.cell, *expected);
        assert_eq!(*got, classify_cell(&polygon, expected, &grid.tile).unwrap());
    }
}

#[test]
fn test_larger_tiles_never_add_cells() {
    let mut rng = StdRng::seed_from_u64(59);

    for _ in 0..200 {
        // Boxes anchored at the origin: any growth in tile size
        let corner = Coord {
            x: rng.gen_range(1.0..1000.0),
            y: rng.gen_range(1.0..1000.0),
        };
        let anchored = Rect::new(Coord { x: 0.0, y: 0.0 }, corner);
        let w = rng.gen_range(1.0..100.0);
        let h = rng.gen_range(1.0..100.0);
        let grow_w = w + rng.gen_range(0.0..100.0);
        let grow_h = h + rng.gen_range(0.0..100.0);

        let fine = build_grid(anchored, w, h).unwrap();
        let coarse = build_grid(anchored, grow_w, h).unwrap();
        assert!(coarse.cells.len() <= fine.cells.len());
        let coarse = build_grid(anchored, w, grow_h).unwrap();
        assert!(coarse.cells.len() <= fine.cells.len());

        // Arbitrary boxes: coarser grids made of whole multiples of the tile
        let min = Coord {
            x: rng.gen_range(-1000.0..1000.0),
            y: rng.gen_range(-1000.0..1000.0),
        };
        let max = Coord {
            x: min.x + rng.gen_range(1.0..1000.0),
            y: min.y + rng.gen_range(1.0..1000.0),
        };
        let bbox = Rect::new(min, max);
        let k = rng.gen_range(2..6) as f64;

        let fine = build_grid(bbox, w, h).unwrap();
        let coarse = build_grid(bbox, w * k, h * k).unwrap();
        assert!(coarse.cells.len() <= fine.cells.len());
    }
}

#[test]
fn test_grid_extent_contains_polygon() {
    let mut rng = StdRng::seed_from_u64(61);

    for _ in 0..50 {
        let polygon = random_star(&mut rng, 12);
        let tile = random_tile(&mut rng);
        let grid = Grid::for_polygon(&polygon, tile).unwrap();
        let bbox = polygon.bounding_rect();

        assert!(grid.extent.x_min <= bbox.min().x);
        assert!(grid.extent.y_min <= bbox.min().y);
        assert!(grid.extent.x_max >= bbox.max().x);
        assert!(grid.extent.y_max >= bbox.max().y);
        assert_eq!(grid.cells.len(), grid.extent.cell_count());
    }
}
