//! Land-use labels, mapping tables, and the classifier.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Feature;
use crate::parcel::{ParcelProperties, ProcessedParcelProperties};

/// Closed set of land-use categories.
///
/// Declaration order fixes the aggregation accumulator layout and the
/// ranking tie-break; label (lexicographic) order, via `Ord`, governs the
/// ordering of `land_use` sets on parcels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandUse {
    Grazing,
    Agriculture,
    Infrastructure,
    Renewables,
    Conservation,
    #[serde(rename = "Fossil Fuels")]
    FossilFuels,
    Mining,
    Timber,
    Commercial,
    Uncategorized,
    Recreation,
    #[serde(rename = "Federal Government")]
    FederalGovernment,
    Water,
}

impl LandUse {
    /// Every label, in declaration order.
    pub const ALL: [LandUse; 13] = [
        LandUse::Grazing,
        LandUse::Agriculture,
        LandUse::Infrastructure,
        LandUse::Renewables,
        LandUse::Conservation,
        LandUse::FossilFuels,
        LandUse::Mining,
        LandUse::Timber,
        LandUse::Commercial,
        LandUse::Uncategorized,
        LandUse::Recreation,
        LandUse::FederalGovernment,
        LandUse::Water,
    ];

    /// Display label, matching the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            LandUse::Grazing => "Grazing",
            LandUse::Agriculture => "Agriculture",
            LandUse::Infrastructure => "Infrastructure",
            LandUse::Renewables => "Renewables",
            LandUse::Conservation => "Conservation",
            LandUse::FossilFuels => "Fossil Fuels",
            LandUse::Mining => "Mining",
            LandUse::Timber => "Timber",
            LandUse::Commercial => "Commercial",
            LandUse::Uncategorized => "Uncategorized",
            LandUse::Recreation => "Recreation",
            LandUse::FederalGovernment => "Federal Government",
            LandUse::Water => "Water",
        }
    }

    /// Position in declaration order; indexes the aggregation accumulator.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LandUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PartialOrd for LandUse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LandUse {
    /// Lexicographic label order, so sorted sets serialize identically
    /// whenever they hold the same labels.
    fn cmp(&self, other: &Self) -> Ordering {
        self.label().cmp(other.label())
    }
}

/// One activity → land-use mapping record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUseMapping {
    pub activity: String,
    pub land_use: Vec<LandUse>,
}

/// One rights_type_info → land-use mapping record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightsTypeInfoMapping {
    pub rights_type_info: String,
    pub land_use: Vec<LandUse>,
}

/// Exact-match lookup index over one mapping table.
#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
    entries: HashMap<String, Vec<LandUse>>,
}

impl MappingIndex {
    /// Index `(raw string, labels)` pairs. A raw string appearing twice is
    /// a reference-data defect and fails the load.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<LandUse>)>,
    {
        let mut map = HashMap::new();
        for (key, labels) in entries {
            if map.insert(key.clone(), labels).is_some() {
                return Err(Error::DuplicateMappingKey(key));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn from_activity_mappings(mappings: Vec<LandUseMapping>) -> Result<Self> {
        Self::from_entries(mappings.into_iter().map(|m| (m.activity, m.land_use)))
    }

    pub fn from_rights_type_info_mappings(mappings: Vec<RightsTypeInfoMapping>) -> Result<Self> {
        Self::from_entries(mappings.into_iter().map(|m| (m.rights_type_info, m.land_use)))
    }

    pub fn get(&self, key: &str) -> Option<&[LandUse]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

/// Classify one parcel's free-text fields into land-use labels.
///
/// Both lookups are exact string matches; either, both, or neither may
/// hit. A parcel with no usable text or no matching entry falls back to
/// `Uncategorized`, in the latter case with a warning, never an error.
/// The result is non-empty, deduplicated, and sorted lexicographically.
pub fn classify_land_use(
    properties: &ParcelProperties,
    activity_index: &MappingIndex,
    rights_type_info_index: &MappingIndex,
) -> Vec<LandUse> {
    let activity = properties.activity.as_str();
    let rights_type_info = properties.rights_type_info.as_str();

    if activity.is_empty() && rights_type_info.is_empty() {
        return vec![LandUse::Uncategorized];
    }

    let activity_match = activity_index.get(activity);
    let info_match = rights_type_info_index.get(rights_type_info);

    if activity_match.is_none() && info_match.is_none() {
        warn!("no land use mapping for activity {activity:?} and rights_type_info {rights_type_info:?}");
        return vec![LandUse::Uncategorized];
    }

    let mut labels: BTreeSet<LandUse> = BTreeSet::new();
    labels.extend(activity_match.into_iter().flatten().copied());
    labels.extend(info_match.into_iter().flatten().copied());

    // A parcel in any real category is never also flagged uncategorized;
    // the bare {Uncategorized} union is kept as-is.
    if labels.len() > 1 {
        labels.remove(&LandUse::Uncategorized);
    }

    labels.into_iter().collect()
}

/// Enrich every parcel with its land-use classification. The dual-rights
/// flag starts false; only the deduplicator raises it.
pub fn enrich_with_land_use(
    parcels: Vec<Feature<ParcelProperties>>,
    activity_index: &MappingIndex,
    rights_type_info_index: &MappingIndex,
) -> Vec<Feature<ProcessedParcelProperties>> {
    parcels
        .into_iter()
        .map(|feature| {
            let land_use =
                classify_land_use(&feature.properties, activity_index, rights_type_info_index);
            let properties = ProcessedParcelProperties {
                parcel: feature.properties,
                land_use,
                has_rights_type_dual: false,
            };
            Feature {
                feature_type: feature.feature_type,
                properties,
                geometry: feature.geometry,
            }
        })
        .collect()
}
