//! Offline area filter.
//!
//! Reads a listings file and a GeoJSON polygon and prints the listings that
//! fall inside the polygon as JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use habitat::models::Listing;
use habitat::pip::{filter_inside_par, parse_area};
use habitat::store::ListingFilters;

#[derive(Parser, Debug)]
#[command(name = "filter")]
#[command(about = "Filter a listings file by a GeoJSON polygon")]
struct Args {
    /// Listings JSON file
    #[arg(short, long)]
    listings: PathBuf,

    /// GeoJSON Feature or Polygon file, positions in [lng, lat] order
    #[arg(short, long)]
    area: PathBuf,

    /// Maximum polygon vertices
    #[arg(long, default_value = "1000")]
    max_vertices: usize,

    /// Log the parameterized query a relational backend would run
    #[arg(long)]
    sql: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let content = fs::read_to_string(&args.listings).context("Failed to read listings file")?;
    let listings: Vec<Listing> =
        serde_json::from_str(&content).context("Failed to parse listings file")?;

    let raw_area = fs::read_to_string(&args.area).context("Failed to read area file")?;
    let ring = parse_area(&raw_area, args.max_vertices).context("Failed to parse area")?;

    info!(
        "Filtering {} listings against a {}-vertex polygon",
        listings.len(),
        ring.len()
    );

    if args.sql {
        let query = ListingFilters::default().to_sql(ring.bounding_box().as_ref());
        info!("SQL: {}", query.text);
        info!("Params: {:?}", query.params);
    }

    let start = Instant::now();
    let inside = filter_inside_par(&listings, ring.vertices());
    info!(
        "{} listings inside area ({} ms)",
        inside.len(),
        start.elapsed().as_millis()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &inside)?;
    writeln!(out)?;

    Ok(())
}
