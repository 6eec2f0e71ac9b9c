//! Pattern-key driver: scans the processed parcel set for distinct
//! land-use combinations and writes one deterministic pattern tile per
//! renderable combination, plus the standalone rights-type pattern.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use stlor_core::geometry::FeatureCollection;
use stlor_core::parcel::ProcessedParcelProperties;
use stlor_core::pattern::{generate_pattern_keys, rights_type_pattern};

#[derive(Parser, Debug)]
#[command(
    name = "generate_patterns",
    about = "Generate rendering patterns for land-use combinations"
)]
struct Args {
    /// Processed parcel GeoJSON (output of process_parcels).
    #[arg(long, default_value = "data/processed/stlors.geojson")]
    parcels: PathBuf,

    /// Output JSON listing one {combo, pattern} entry per combination.
    #[arg(long, default_value = "data/processed/land-use-patterns.json")]
    patterns_output: PathBuf,

    /// Output JSON holding the surface/subsurface two-tone pattern.
    #[arg(long, default_value = "data/processed/rights-type-pattern.json")]
    rights_type_output: PathBuf,
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

    let parcels: FeatureCollection<ProcessedParcelProperties> = read_json(&args.parcels)?;

    let patterns = generate_pattern_keys(&parcels.features)?;
    info!("{} renderable land-use combinations", patterns.len());
    write_json(&args.patterns_output, &patterns)?;
    println!("Wrote {}", args.patterns_output.display());

    write_json(&args.rights_type_output, &rights_type_pattern()?)?;
    println!("Wrote {}", args.rights_type_output.display());
    Ok(())
}
