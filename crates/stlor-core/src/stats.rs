//! Per-reservation acreage aggregation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geometry::Feature;
use crate::landuse::LandUse;
use crate::parcel::{
    ProcessedParcelProperties, ReservationAggProperties, ReservationProperties,
};

/// Number of ranked land-use entries reported per reservation.
pub const TOP_LAND_USE_COUNT: usize = 5;

/// One ranked land-use entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandUseAcreage {
    pub land_use: LandUse,
    pub acreage: f64,
}

/// Ranked land uses plus the uncategorized remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationLandUses {
    pub top_land_uses: Vec<LandUseAcreage>,
    pub uncategorized_acreage: f64,
}

/// Aggregated acreage, land-use, and rights-type statistics for one
/// reservation. Rebuilt wholesale on every pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStats {
    pub reservation_name: String,
    pub acres: f64,
    pub land_uses: ReservationLandUses,
    /// `[west, south, east, north]` of the reservation boundary itself,
    /// not of the union of its parcels.
    pub bounds: [f64; 4],
    pub stl_total_acres: f64,
    pub stl_surface_acres: f64,
    pub stl_subsurface_acres: f64,
}

/// Round to two decimal places, the precision of all rendered acreage.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accumulate `clipped_acres` per land-use label over the full closed
/// enumeration, then rank. A parcel with N labels contributes its whole
/// area to each of the N buckets; areas are deliberately not divided
/// across multi-label parcels.
fn land_use_acreage(parcels: &[&Feature<ProcessedParcelProperties>]) -> ReservationLandUses {
    let mut acreage = [0.0f64; LandUse::ALL.len()];
    for parcel in parcels {
        for land_use in &parcel.properties.land_use {
            acreage[land_use.index()] += parcel.properties.parcel.clipped_acres;
        }
    }

    // Every non-Uncategorized label enters the ranking, zero buckets
    // included, laid out in declaration order so the stable sort breaks
    // acreage ties in that order.
    let mut ranked: Vec<LandUseAcreage> = LandUse::ALL
        .iter()
        .filter(|&&land_use| land_use != LandUse::Uncategorized)
        .map(|&land_use| LandUseAcreage {
            land_use,
            acreage: round2(acreage[land_use.index()]),
        })
        .collect();
    ranked.sort_by(|a, b| b.acreage.total_cmp(&a.acreage));
    ranked.truncate(TOP_LAND_USE_COUNT);

    ReservationLandUses {
        top_land_uses: ranked,
        uncategorized_acreage: round2(acreage[LandUse::Uncategorized.index()]),
    }
}

/// Sum `clipped_acres` by rights type. A collapsed dual-rights parcel
/// lists both types in its comma-joined `rights_type` field and counts
/// toward both totals, matching the pre-deduplication sums.
fn rights_type_acreage(parcels: &[&Feature<ProcessedParcelProperties>]) -> (f64, f64) {
    let mut surface = 0.0;
    let mut subsurface = 0.0;
    for parcel in parcels {
        for rights in parcel.properties.parcel.rights_type.split(',') {
            match rights.trim().to_lowercase().as_str() {
                "surface" => surface += parcel.properties.parcel.clipped_acres,
                "subsurface" => subsurface += parcel.properties.parcel.clipped_acres,
                _ => {}
            }
        }
    }
    (surface, subsurface)
}

fn stats_for_reservation(
    reservation: &Feature<ReservationProperties>,
    parcels: &[&Feature<ProcessedParcelProperties>],
    agg_names: &HashSet<&str>,
) -> Result<(String, ReservationStats)> {
    // Cross-check before any accumulation: a missing aggregate record is
    // a mismatch between input files and aborts the run.
    let name = reservation.properties.reservation_name.clone();
    if !agg_names.contains(name.as_str()) {
        return Err(Error::MissingAggregate(name));
    }

    let land_uses = land_use_acreage(parcels);
    let (surface, subsurface) = rights_type_acreage(parcels);

    let stats = ReservationStats {
        reservation_name: name.clone(),
        acres: reservation.properties.acres,
        land_uses,
        bounds: reservation.geometry.bbox(),
        stl_total_acres: round2(surface + subsurface),
        stl_surface_acres: round2(surface),
        stl_subsurface_acres: round2(subsurface),
    };
    Ok((name, stats))
}

/// Build the reservation-keyed statistics map.
///
/// Only reservations with at least one associated parcel are aggregated,
/// and each of those must appear in the aggregate cross-check collection;
/// a missing record is a data-integrity mismatch between input files and
/// aborts the run. The returned map iterates in name order, so serialized
/// output is deterministic.
pub fn compute_reservation_stats(
    reservations: &[Feature<ReservationProperties>],
    aggregates: &[ReservationAggProperties],
    parcels: &[Feature<ProcessedParcelProperties>],
) -> Result<BTreeMap<String, ReservationStats>> {
    let agg_names: HashSet<&str> = aggregates
        .iter()
        .map(|agg| agg.reservation_name.as_str())
        .collect();

    let mut by_reservation: HashMap<&str, Vec<&Feature<ProcessedParcelProperties>>> =
        HashMap::new();
    for parcel in parcels {
        by_reservation
            .entry(parcel.properties.parcel.reservation_name.as_str())
            .or_default()
            .push(parcel);
    }

    #[cfg(feature = "threading")]
    {
        reservations
            .par_iter()
            .filter_map(|reservation| {
                by_reservation
                    .get(reservation.properties.reservation_name.as_str())
                    .map(|parcels| (reservation, parcels))
            })
            .map(|(reservation, parcels)| stats_for_reservation(reservation, parcels, &agg_names))
            .collect()
    }

    #[cfg(not(feature = "threading"))]
    {
        reservations
            .iter()
            .filter_map(|reservation| {
                by_reservation
                    .get(reservation.properties.reservation_name.as_str())
                    .map(|parcels| (reservation, parcels))
            })
            .map(|(reservation, parcels)| stats_for_reservation(reservation, parcels, &agg_names))
            .collect()
    }
}
