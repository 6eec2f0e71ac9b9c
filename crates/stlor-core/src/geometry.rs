//! Typed GeoJSON containers and exact-geometry keys.
//! All coordinate math uses f64; positions are `[lon, lat]`.

use serde::{Deserialize, Serialize};

/// A GeoJSON polygon: outer ring first, then holes. Rings are closed
/// (first position repeated last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonGeometry {
    pub fn new(coordinates: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            geometry_type: "Polygon".to_string(),
            coordinates,
        }
    }

    /// Structural key for duplicate detection, built from the `f64` bit
    /// patterns of every position. Comparison is exact: geometries that
    /// differ in the last ulp are distinct parcels, so jitter introduced
    /// by upstream GIS tooling never merges.
    pub fn exact_key(&self) -> GeometryKey {
        GeometryKey(
            self.coordinates
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|&[lon, lat]| [lon.to_bits(), lat.to_bits()])
                        .collect()
                })
                .collect(),
        )
    }

    /// Axis-aligned bounding box as `[west, south, east, north]`.
    pub fn bbox(&self) -> [f64; 4] {
        let mut bounds = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for ring in &self.coordinates {
            for &[lon, lat] in ring {
                bounds[0] = bounds[0].min(lon);
                bounds[1] = bounds[1].min(lat);
                bounds[2] = bounds[2].max(lon);
                bounds[3] = bounds[3].max(lat);
            }
        }
        bounds
    }
}

/// Hashable stand-in for polygon coordinates; two keys are equal exactly
/// when every position is bit-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryKey(Vec<Vec<[u64; 2]>>);

/// One GeoJSON feature, generic over its properties record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: P,
    pub geometry: PolygonGeometry,
}

impl<P> Feature<P> {
    pub fn new(properties: P, geometry: PolygonGeometry) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            properties,
            geometry,
        }
    }

    /// Re-wrap this feature's geometry around a new properties record.
    pub fn with_properties<Q>(self, properties: Q) -> Feature<Q> {
        Feature {
            feature_type: self.feature_type,
            properties,
            geometry: self.geometry,
        }
    }
}

/// A GeoJSON feature collection, generic over its features' properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
        }
    }
}
