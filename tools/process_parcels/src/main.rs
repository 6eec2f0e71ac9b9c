//! Parcel enrichment driver: rights-type normalization, land-use
//! classification, and geometry deduplication, raw GeoJSON in, processed
//! GeoJSON out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use stlor_core::dedupe::dedupe_parcels;
use stlor_core::geometry::FeatureCollection;
use stlor_core::landuse::{
    enrich_with_land_use, LandUseMapping, MappingIndex, RightsTypeInfoMapping,
};
use stlor_core::parcel::{normalize_rights_type, ParcelProperties};

#[derive(Parser, Debug)]
#[command(
    name = "process_parcels",
    about = "Classify and deduplicate reservation land parcels"
)]
struct Args {
    /// Raw parcel GeoJSON.
    #[arg(long)]
    parcels: PathBuf,

    /// Activity → land-use mapping JSON.
    #[arg(long, default_value = "data/raw/land-use-mapping.json")]
    land_use_mapping: PathBuf,

    /// rights_type_info → land-use mapping JSON.
    #[arg(long, default_value = "data/raw/rights-type-info-mapping.json")]
    rights_type_info_mapping: PathBuf,

    /// Output GeoJSON with land_use and has_rights_type_dual added.
    #[arg(short, long, default_value = "data/processed/stlors.geojson")]
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

    let parcels: FeatureCollection<ParcelProperties> = read_json(&args.parcels)?;
    let activity_mappings: Vec<LandUseMapping> = read_json(&args.land_use_mapping)?;
    let info_mappings: Vec<RightsTypeInfoMapping> = read_json(&args.rights_type_info_mapping)?;

    let activity_index = MappingIndex::from_activity_mappings(activity_mappings)?;
    let info_index = MappingIndex::from_rights_type_info_mappings(info_mappings)?;

    let raw_count = parcels.features.len();
    let normalized = normalize_rights_type(parcels.features);
    let classified = enrich_with_land_use(normalized, &activity_index, &info_index);
    let deduped = dedupe_parcels(classified);
    info!("{raw_count} raw parcels, {} after deduplication", deduped.len());

    write_json(&args.output, &FeatureCollection::new(deduped))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
