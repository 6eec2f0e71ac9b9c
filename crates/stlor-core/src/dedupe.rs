//! Collapse parcels that share identical geometry within a reservation.
//!
//! Surface and subsurface rights over the same ground arrive as two
//! records with bit-identical rings; collapsing them into one flagged
//! feature is what lets the renderer show a single dual-rights parcel.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use crate::geometry::{Feature, GeometryKey};
use crate::landuse::LandUse;
use crate::parcel::ProcessedParcelProperties;

/// Grouping key: same reservation, bit-identical ring coordinates.
/// Identical rings on different reservations never merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupeKey {
    reservation_name: String,
    geometry: GeometryKey,
}

/// Collapse duplicate-geometry parcels into one feature per group.
///
/// Groups keep first-occurrence input order, and the first member of each
/// group is the survivor. A group of exactly two members holding surface
/// and subsurface rights becomes a dual-rights parcel; larger groups and
/// same-rights pairs are folded without the flag. Land-use labels and
/// rights types of dropped members are folded into the survivor, so no
/// contribution is lost. Singleton groups pass through untouched, which
/// makes the operation idempotent.
pub fn dedupe_parcels(
    parcels: Vec<Feature<ProcessedParcelProperties>>,
) -> Vec<Feature<ProcessedParcelProperties>> {
    let mut groups: Vec<Vec<Feature<ProcessedParcelProperties>>> = Vec::new();
    let mut index: HashMap<DedupeKey, usize> = HashMap::new();

    for parcel in parcels {
        let key = DedupeKey {
            reservation_name: parcel.properties.parcel.reservation_name.clone(),
            geometry: parcel.geometry.exact_key(),
        };
        match index.entry(key) {
            Entry::Occupied(slot) => groups[*slot.get()].push(parcel),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(vec![parcel]);
            }
        }
    }

    groups.into_iter().map(collapse_group).collect()
}

/// True when the pair is one surface and one subsurface record.
fn is_dual_rights_pair(group: &[Feature<ProcessedParcelProperties>]) -> bool {
    if group.len() != 2 {
        return false;
    }
    let first = group[0].properties.parcel.rights_type.to_lowercase();
    let second = group[1].properties.parcel.rights_type.to_lowercase();
    (first == "surface" && second == "subsurface")
        || (first == "subsurface" && second == "surface")
}

fn collapse_group(
    mut group: Vec<Feature<ProcessedParcelProperties>>,
) -> Feature<ProcessedParcelProperties> {
    if group.len() == 1 {
        return group.remove(0);
    }

    let dual = is_dual_rights_pair(&group);

    let mut labels: BTreeSet<LandUse> = BTreeSet::new();
    let mut rights: BTreeSet<String> = BTreeSet::new();
    for member in &group {
        labels.extend(member.properties.land_use.iter().copied());
        for value in member.properties.parcel.rights_type.split(',') {
            let value = value.trim();
            if !value.is_empty() {
                rights.insert(value.to_lowercase());
            }
        }
    }
    // The folded set obeys the same suppression rule as classification.
    if labels.len() > 1 {
        labels.remove(&LandUse::Uncategorized);
    }

    let mut survivor = group.remove(0);
    survivor.properties.land_use = labels.into_iter().collect();
    survivor.properties.parcel.rights_type = rights.into_iter().collect::<Vec<_>>().join(",");
    survivor.properties.has_rights_type_dual = dual;
    survivor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parcel::test_fixtures::{parcel, unit_square};

    fn make(
        object_id: i64,
        reservation_name: &str,
        rights_type: &str,
        land_use: Vec<LandUse>,
        offset: f64,
    ) -> Feature<ProcessedParcelProperties> {
        let base = parcel(object_id, reservation_name, rights_type, "", "", 40.0, unit_square(offset));
        let geometry = base.geometry;
        Feature::new(
            ProcessedParcelProperties {
                parcel: base.properties,
                land_use,
                has_rights_type_dual: false,
            },
            geometry,
        )
    }

    #[test]
    fn surface_subsurface_pair_collapses_to_dual() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Flathead", "subsurface", vec![LandUse::FossilFuels], 0.0),
        ]);
        assert_eq!(deduped.len(), 1);
        let survivor = &deduped[0];
        assert_eq!(survivor.properties.parcel.object_id, 1);
        assert!(survivor.properties.has_rights_type_dual);
        assert_eq!(
            survivor.properties.land_use,
            vec![LandUse::FossilFuels, LandUse::Grazing]
        );
        assert_eq!(survivor.properties.parcel.rights_type, "subsurface,surface");
    }

    #[test]
    fn same_rights_pair_is_folded_but_not_dual() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Flathead", "surface", vec![LandUse::Agriculture], 0.0),
        ]);
        assert_eq!(deduped.len(), 1);
        assert!(!deduped[0].properties.has_rights_type_dual);
        assert_eq!(
            deduped[0].properties.land_use,
            vec![LandUse::Agriculture, LandUse::Grazing]
        );
        assert_eq!(deduped[0].properties.parcel.rights_type, "surface");
    }

    #[test]
    fn triple_group_never_flags_dual() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Flathead", "subsurface", vec![LandUse::Mining], 0.0),
            make(3, "Flathead", "surface", vec![LandUse::Timber], 0.0),
        ]);
        assert_eq!(deduped.len(), 1);
        assert!(!deduped[0].properties.has_rights_type_dual);
        assert_eq!(
            deduped[0].properties.land_use,
            vec![LandUse::Grazing, LandUse::Mining, LandUse::Timber]
        );
    }

    #[test]
    fn distinct_geometry_and_reservations_stay_apart() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Flathead", "subsurface", vec![LandUse::Grazing], 5.0),
            make(3, "Crow", "subsurface", vec![LandUse::Grazing], 0.0),
        ]);
        assert_eq!(deduped.len(), 3);
        assert!(deduped.iter().all(|p| !p.properties.has_rights_type_dual));
    }

    #[test]
    fn uncategorized_dropped_when_fold_adds_real_labels() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Uncategorized], 0.0),
            make(2, "Flathead", "subsurface", vec![LandUse::Mining], 0.0),
        ]);
        assert_eq!(deduped[0].properties.land_use, vec![LandUse::Mining]);
    }

    #[test]
    fn deduplication_is_idempotent() {
        let once = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Flathead", "subsurface", vec![LandUse::FossilFuels], 0.0),
            make(3, "Flathead", "surface", vec![LandUse::Water], 3.0),
        ]);
        let twice = dedupe_parcels(once.clone());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.properties.parcel.object_id, b.properties.parcel.object_id);
            assert_eq!(a.properties.parcel.rights_type, b.properties.parcel.rights_type);
            assert_eq!(a.properties.land_use, b.properties.land_use);
            assert_eq!(
                a.properties.has_rights_type_dual,
                b.properties.has_rights_type_dual
            );
        }
    }

    #[test]
    fn output_keeps_first_occurrence_order() {
        let deduped = dedupe_parcels(vec![
            make(1, "Flathead", "surface", vec![LandUse::Grazing], 0.0),
            make(2, "Crow", "surface", vec![LandUse::Mining], 1.0),
            make(3, "Flathead", "subsurface", vec![LandUse::FossilFuels], 0.0),
        ]);
        let ids: Vec<i64> = deduped.iter().map(|p| p.properties.parcel.object_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
