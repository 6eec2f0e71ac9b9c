//! Deterministic raster pattern tiles for multi-label parcels.
//!
//! Every distinct 2-, 3-, or 4-label combination observed in the data gets
//! one 32×32 tile built from the fixed label→color table: two labels as a
//! diagonal hatch, three or four as equal-width horizontal bands. Tiles
//! are PNG-encoded and wrapped as data URLs for the renderer. Generation
//! is pure pixel math over the sorted label list, so re-running on the
//! same input reproduces the output byte for byte.

use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageEncoder, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Feature;
use crate::landuse::LandUse;
use crate::parcel::ProcessedParcelProperties;

pub type Color = [u8; 3];

// ── Color tables ─────────────────────────────────────────────────────────────

// Brand colors.
const EARTH: Color = [0x3c, 0x38, 0x30];
const ORANGE: Color = [0xec, 0x6c, 0x37];
const GOLD: Color = [0xd9, 0xac, 0x4a];
const GRAY: Color = [0x9c, 0xa3, 0xaf];
const GREEN: Color = [0x47, 0x60, 0x39];
const PALE_GREEN: Color = [0x9c, 0xa1, 0x8c];

// Qualitative paired scheme entries referenced by the land-use table.
const PAIRED_LIGHT_BLUE: Color = [0xa6, 0xce, 0xe3];
const PAIRED_BLUE: Color = [0x1f, 0x78, 0xb4];
const PAIRED_LIGHT_GREEN: Color = [0xb2, 0xdf, 0x8a];
const PAIRED_GREEN: Color = [0x33, 0xa0, 0x2c];
const PAIRED_PINK: Color = [0xfb, 0x9a, 0x99];
const PAIRED_PURPLE: Color = [0x6a, 0x3d, 0x9a];

const SLATE: Color = [0x64, 0x74, 0x8b];

/// The surface/subsurface two-tone pair.
const RIGHTS_TYPE_PRIMARY: Color = [0x38, 0x77, 0xf3];
const RIGHTS_TYPE_SECONDARY: Color = EARTH;

/// Fixed label→color table; process-wide read-only configuration.
pub fn land_use_color(land_use: LandUse) -> Color {
    match land_use {
        LandUse::Grazing => PALE_GREEN,
        LandUse::Agriculture => PAIRED_GREEN,
        LandUse::Infrastructure => SLATE,
        LandUse::Renewables => ORANGE,
        LandUse::Conservation => PAIRED_LIGHT_GREEN,
        LandUse::FossilFuels => EARTH,
        LandUse::Mining => GOLD,
        LandUse::Timber => GREEN,
        LandUse::Commercial => PAIRED_PURPLE,
        LandUse::Uncategorized => GRAY,
        LandUse::Recreation => PAIRED_PINK,
        LandUse::FederalGovernment => PAIRED_BLUE,
        LandUse::Water => PAIRED_LIGHT_BLUE,
    }
}

// ── Tile drawing ─────────────────────────────────────────────────────────────

/// Side length in pixels of every generated tile.
pub const TILE_SIZE: u32 = 32;

/// Diagonal stripe geometry for the two-color hatch: stripes repeat every
/// `STRIPE_PERIOD` pixels along the `y − x` axis, so the tile wraps
/// seamlessly when repeated.
const STRIPE_PERIOD: i64 = 16;
const STRIPE_WIDTH: i64 = 6;

fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 0xff])
}

/// Two-color hatch: `primary` background, diagonal `secondary` stripes.
fn hatch_tile(primary: Color, secondary: Color) -> RgbaImage {
    RgbaImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
        let d = (y as i64 - x as i64).rem_euclid(STRIPE_PERIOD);
        if d < STRIPE_WIDTH {
            opaque(secondary)
        } else {
            opaque(primary)
        }
    })
}

/// Horizontal bands of equal width, one per color, top to bottom.
fn banded_tile(colors: &[Color]) -> RgbaImage {
    let bands = colors.len() as u32;
    RgbaImage::from_fn(TILE_SIZE, TILE_SIZE, |_, y| {
        let band = (y * bands / TILE_SIZE).min(bands - 1) as usize;
        opaque(colors[band])
    })
}

/// Encode a tile as a `data:image/png;base64,…` URL.
fn encode_data_url(tile: &RgbaImage) -> Result<String> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png).write_image(
        tile.as_raw(),
        tile.width(),
        tile.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

// ── Combination scan ─────────────────────────────────────────────────────────

/// A renderable pattern for one distinct land-use combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternKeyEntry {
    pub combo: String,
    pub pattern: String,
}

/// Canonical combination string: the sorted label list joined with ", ".
/// Classified `land_use` sets are already sorted, so equal sets always
/// produce the same string.
pub fn combo_string(land_use: &[LandUse]) -> String {
    land_use
        .iter()
        .map(|land_use| land_use.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The distinct label combinations present on the parcel set.
pub fn distinct_combinations(
    parcels: &[Feature<ProcessedParcelProperties>],
) -> BTreeSet<Vec<LandUse>> {
    parcels
        .iter()
        .map(|parcel| parcel.properties.land_use.clone())
        .collect()
}

/// Generate one pattern per distinct 2-, 3-, or 4-label combination.
///
/// Single labels render as flat fills elsewhere and combinations of five
/// or more do not occur in the dataset; both are skipped, as are the
/// residual combinations still carrying `Uncategorized`. Entries are
/// grouped by combination size, then ordered by label list.
pub fn generate_pattern_keys(
    parcels: &[Feature<ProcessedParcelProperties>],
) -> Result<Vec<PatternKeyEntry>> {
    let combinations = distinct_combinations(parcels);

    let mut entries = Vec::new();
    for size in 2..=4usize {
        for combo in combinations
            .iter()
            .filter(|combo| combo.len() == size && !combo.contains(&LandUse::Uncategorized))
        {
            let colors: Vec<Color> = combo.iter().map(|&label| land_use_color(label)).collect();
            let tile = match colors.as_slice() {
                [primary, secondary] => hatch_tile(*primary, *secondary),
                _ => banded_tile(&colors),
            };
            entries.push(PatternKeyEntry {
                combo: combo_string(combo),
                pattern: encode_data_url(&tile)?,
            });
        }
    }
    Ok(entries)
}

/// The standalone two-tone pattern for the surface/subsurface rights-type
/// visualization.
pub fn rights_type_pattern() -> Result<String> {
    encode_data_url(&hatch_tile(RIGHTS_TYPE_PRIMARY, RIGHTS_TYPE_SECONDARY))
}
