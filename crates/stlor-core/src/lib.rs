//! Classification, deduplication, and aggregation for reservation
//! land-parcel datasets, plus deterministic raster pattern keys for
//! rendering multi-category parcels.
//!
//! Pipeline order: rights-type normalization → land-use classification →
//! geometry deduplication → per-reservation aggregation. Pattern-key
//! generation branches off the deduplicated parcel set and is independent
//! of aggregation.

pub mod dedupe;
pub mod error;
pub mod geometry;
pub mod landuse;
pub mod parcel;
pub mod pattern;
pub mod stats;

pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use crate::dedupe::dedupe_parcels;
    use crate::geometry::Feature;
    use crate::landuse::{enrich_with_land_use, LandUse, MappingIndex};
    use crate::parcel::test_fixtures::{parcel, unit_square};
    use crate::parcel::{normalize_rights_type, ReservationAggProperties, ReservationProperties};
    use crate::stats::compute_reservation_stats;

    /// Full pipeline over a small Flathead fixture: a mapped grazing
    /// lease, an unmappable empty parcel, and a surface/subsurface pair
    /// sharing one geometry.
    #[test]
    fn pipeline_classifies_dedupes_and_aggregates() {
        let activity_index = MappingIndex::from_entries([(
            "Grazing Lease".to_string(),
            vec![LandUse::Grazing],
        )])
        .unwrap();
        let info_index = MappingIndex::default();

        let raw = vec![
            parcel(1, "Flathead", "Surface", "Grazing Lease", "", 120.0, unit_square(0.0)),
            parcel(2, "Flathead", "Surface", "", "", 30.0, unit_square(1.0)),
            parcel(3, "Flathead", "Surface", "Grazing Lease", "", 55.0, unit_square(2.0)),
            parcel(4, "Flathead", "Subsurface", "", "", 55.0, unit_square(2.0)),
        ];

        let normalized = normalize_rights_type(raw);
        let classified = enrich_with_land_use(normalized, &activity_index, &info_index);
        assert_eq!(classified[0].properties.land_use, vec![LandUse::Grazing]);
        assert_eq!(classified[1].properties.land_use, vec![LandUse::Uncategorized]);

        let deduped = dedupe_parcels(classified);
        assert_eq!(deduped.len(), 3);
        let dual = &deduped[2];
        assert!(dual.properties.has_rights_type_dual);
        assert_eq!(dual.properties.land_use, vec![LandUse::Grazing]);

        let reservations = vec![Feature::new(
            ReservationProperties {
                reservation_name: "Flathead".to_string(),
                acres: 1_300_000.0,
            },
            unit_square(0.0),
        )];
        let aggregates = vec![ReservationAggProperties {
            reservation_name: "Flathead".to_string(),
            clipped_acres: 0.0,
            surface_clipped_acres: 0.0,
            subsurface_clipped_acres: 0.0,
        }];

        let stats = compute_reservation_stats(&reservations, &aggregates, &deduped).unwrap();
        let flathead = &stats["Flathead"];

        // Grazing leads the ranking; the empty parcel lands only in the
        // uncategorized bucket.
        assert_eq!(flathead.land_uses.top_land_uses[0].land_use, LandUse::Grazing);
        assert_eq!(flathead.land_uses.top_land_uses[0].acreage, 175.0);
        assert_eq!(flathead.land_uses.uncategorized_acreage, 30.0);

        // The dual parcel counts toward both rights-type totals.
        assert_eq!(flathead.stl_surface_acres, 205.0);
        assert_eq!(flathead.stl_subsurface_acres, 55.0);
        assert_eq!(flathead.stl_total_acres, 260.0);
    }
}
