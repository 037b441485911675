use clap::Parser;
use geo_tilecount::accounting::DEFAULT_PROMOTION_THRESHOLD;
use geo_tilecount::geojson_io::{polygon_from_geojson, report_to_geojson};
use geo_tilecount::{Classification, TileCounter, TilePolygon};
use geo_types::Coord;
use geojson::GeoJson;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON file holding one Polygon
    #[arg(short, long, conflicts_with = "vertex")]
    input: Option<PathBuf>,

    /// Polygon vertex as `x,y`; repeat once per vertex, in ring order
    #[arg(short, long, value_parser = parse_vertex, allow_hyphen_values = true)]
    vertex: Vec<Coord<f64>>,

    /// Tile width
    #[arg(long, default_value_t = 200.0)]
    tile_width: f64,

    /// Tile height
    #[arg(long, default_value_t = 200.0)]
    tile_height: f64,

    /// Coverage fraction at which a partial tile counts as a whole one
    #[arg(long, default_value_t = DEFAULT_PROMOTION_THRESHOLD)]
    threshold: f64,

    /// Output GeoJSON file (classified cells)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn parse_vertex(s: &str) -> Result<Coord<f64>, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in `{}`: {}", s, e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in `{}`: {}", s, e))?;
    Ok(Coord { x, y })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let polygon = match &args.input {
        Some(path) => {
            log::info!("reading polygon from {:?}", path);
            polygon_from_geojson(&fs::read_to_string(path)?)?
        }
        None => TilePolygon::new(args.vertex.clone())?,
    };

    let report = TileCounter::new(args.tile_width, args.tile_height)
        .with_promotion_threshold(args.threshold)
        .run_polygon(&polygon)?;

    if let Some(path) = &args.output {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(report_to_geojson(&report)?))?;
        log::info!("wrote {} cells to {:?}", report.cells.len(), path);
    }

    let coverage = report.coverage;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&coverage)?);
        return Ok(());
    }

    println!(
        "Grid: {} x {} tiles of {} x {}",
        report.extent.n_cols, report.extent.n_rows, args.tile_width, args.tile_height
    );
    println!(
        "Cells: {} fully inside, {} partial, {} outside",
        report.count_of(Classification::FullyInside),
        report.count_of(Classification::PartiallyInside),
        report.count_of(Classification::Outside)
    );
    println!("Full tiles: {}", coverage.full_tile_count);
    println!("Partial tiles converted to full: {}", coverage.rollup_count);
    println!("Remaining fractional pool: {:.2}", coverage.residual_pool);
    println!("Total tiles required: {}", coverage.total_tiles);

    Ok(())
}
