//! Parcel, reservation, and aggregate attribute records, and the
//! rights-type normalizer that opens the pipeline.

use serde::{Deserialize, Serialize};

use crate::geometry::Feature;
use crate::landuse::LandUse;

/// Attributes on one cadastral polygon as delivered by the source dataset.
/// Carried through the pipeline verbatim apart from `rights_type` casing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelProperties {
    pub object_id: i64,
    pub state: String,
    pub managing_agency: String,
    pub state_enabling_act: String,
    pub trust_name: String,
    pub reservation_name: String,
    /// "surface" or "subsurface", free-case until normalized.
    pub rights_type: String,
    #[serde(default)]
    pub rights_type_info: String,
    pub acres: String,
    pub gis_acres: f64,
    pub net_acres: String,
    pub clipped_acres: f64,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub activity_info: String,
    pub county: String,
    pub meridian: String,
    pub township: String,
    pub range: String,
    pub section: String,
    pub aliquot: String,
}

/// Parcel attributes after classification and deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedParcelProperties {
    #[serde(flatten)]
    pub parcel: ParcelProperties,
    /// Sorted, deduplicated land-use labels. Never empty.
    pub land_use: Vec<LandUse>,
    pub has_rights_type_dual: bool,
}

/// Attributes on one reservation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationProperties {
    pub reservation_name: String,
    pub acres: f64,
}

/// Pre-computed per-reservation acreage record. Consumed only as an
/// integrity cross-check during aggregation; the acreage values are
/// recomputed from the parcel set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationAggProperties {
    pub reservation_name: String,
    #[serde(default)]
    pub clipped_acres: f64,
    #[serde(default)]
    pub surface_clipped_acres: f64,
    #[serde(default)]
    pub subsurface_clipped_acres: f64,
}

/// Lowercase the `rights_type` field on every parcel. Values other than
/// surface/subsurface (up to case) are an upstream data invariant and are
/// passed through untouched apart from casing.
pub fn normalize_rights_type(
    parcels: Vec<Feature<ParcelProperties>>,
) -> Vec<Feature<ParcelProperties>> {
    parcels
        .into_iter()
        .map(|mut parcel| {
            parcel.properties.rights_type = parcel.properties.rights_type.to_lowercase();
            parcel
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::{parcel, unit_square};
    use super::*;

    #[test]
    fn normalize_lowercases_rights_type() {
        let parcels = vec![
            parcel(1, "Flathead", "Surface", "", "", 40.0, unit_square(0.0)),
            parcel(2, "Flathead", "SUBSURFACE", "", "", 40.0, unit_square(1.0)),
        ];
        let normalized = normalize_rights_type(parcels);
        assert_eq!(normalized[0].properties.rights_type, "surface");
        assert_eq!(normalized[1].properties.rights_type, "subsurface");
    }

    #[test]
    fn processed_properties_serialize_flat() {
        let feature = parcel(7, "Flathead", "surface", "Grazing Lease", "", 120.0, unit_square(0.0));
        let processed = feature.with_properties(ProcessedParcelProperties {
            parcel: parcel(7, "Flathead", "surface", "Grazing Lease", "", 120.0, unit_square(0.0))
                .properties,
            land_use: vec![LandUse::Grazing],
            has_rights_type_dual: false,
        });
        let raw = serde_json::to_value(&processed).unwrap();
        // land_use sits beside the source attributes, not nested under them.
        assert_eq!(raw["properties"]["reservation_name"], "Flathead");
        assert_eq!(raw["properties"]["land_use"][0], "Grazing");
        assert_eq!(raw["properties"]["has_rights_type_dual"], false);
    }
}
