//! Aggregation driver: per-reservation acreage statistics from the
//! processed parcel set, cross-checked against the aggregate collection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Deserialize;

use stlor_core::geometry::FeatureCollection;
use stlor_core::parcel::{
    ProcessedParcelProperties, ReservationAggProperties, ReservationProperties,
};
use stlor_core::stats::compute_reservation_stats;

/// The aggregate file carries dissolved per-reservation geometries that
/// the cross-check never looks at; only the properties are decoded.
#[derive(Debug, Deserialize)]
struct AggFeature {
    properties: ReservationAggProperties,
}

#[derive(Debug, Deserialize)]
struct AggCollection {
    features: Vec<AggFeature>,
}

#[derive(Parser, Debug)]
#[command(
    name = "reservation_stats",
    about = "Aggregate per-reservation acreage, land-use, and rights-type statistics"
)]
struct Args {
    /// Reservation boundary GeoJSON.
    #[arg(long, default_value = "data/raw/reservations.geojson")]
    reservations: PathBuf,

    /// Per-reservation aggregate GeoJSON, used as an integrity cross-check.
    #[arg(long)]
    aggregates: PathBuf,

    /// Processed parcel GeoJSON (output of process_parcels).
    #[arg(long, default_value = "data/processed/stlors.geojson")]
    parcels: PathBuf,

    /// Output statistics JSON, keyed by reservation name.
    #[arg(short, long, default_value = "data/processed/reservation-stats.json")]
    output: PathBuf,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("decoding {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let reservations: FeatureCollection<ReservationProperties> = read_json(&args.reservations)?;
    let aggregates: AggCollection = read_json(&args.aggregates)?;
    let parcels: FeatureCollection<ProcessedParcelProperties> = read_json(&args.parcels)?;

    let agg_records: Vec<ReservationAggProperties> = aggregates
        .features
        .into_iter()
        .map(|feature| feature.properties)
        .collect();

    let stats = compute_reservation_stats(
        &reservations.features,
        &agg_records,
        &parcels.features,
    )?;
    info!("computed statistics for {} reservations", stats.len());

    write_json(&args.output, &stats)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
