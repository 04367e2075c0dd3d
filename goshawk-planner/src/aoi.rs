//! AOI bounding-box loading
//!
//! Geometry math is out of scope; the planner only needs the bounding box of
//! the first polygon feature in a GeoJSON file for display and for the
//! downstream crop stage.

use goshawk_common::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Axis-aligned bounding box of an area of interest, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AoiBoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

/// Load the bounding box of the first polygon feature in a GeoJSON file
pub fn load_bounding_box(path: &Path) -> Result<AoiBoundingBox> {
    let content = std::fs::read_to_string(path)?;
    let geojson: Value = serde_json::from_str(&content)
        .map_err(|e| Error::InvalidInput(format!("invalid GeoJSON {}: {}", path.display(), e)))?;

    let ring = geojson
        .pointer("/features/0/geometry/coordinates/0")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "no polygon coordinates in {}",
                path.display()
            ))
        })?;

    let mut bbox: Option<AoiBoundingBox> = None;
    for point in ring {
        let lon = point.get(0).and_then(Value::as_f64);
        let lat = point.get(1).and_then(Value::as_f64);
        let (Some(lon), Some(lat)) = (lon, lat) else {
            return Err(Error::InvalidInput(format!(
                "malformed coordinate in {}",
                path.display()
            )));
        };
        bbox = Some(match bbox {
            None => AoiBoundingBox {
                min_lon: lon,
                max_lon: lon,
                min_lat: lat,
                max_lat: lat,
            },
            Some(b) => AoiBoundingBox {
                min_lon: b.min_lon.min(lon),
                max_lon: b.max_lon.max(lon),
                min_lat: b.min_lat.min(lat),
                max_lat: b.max_lat.max(lat),
            },
        });
    }

    bbox.ok_or_else(|| Error::InvalidInput(format!("empty polygon ring in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AOI: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[2.4, 41.5], [2.6, 41.5], [2.6, 41.7], [2.4, 41.7], [2.4, 41.5]]]
            }
        }]
    }"#;

    #[test]
    fn loads_bbox_from_polygon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.geojson");
        std::fs::write(&path, AOI).unwrap();

        let bbox = load_bounding_box(&path).unwrap();
        assert_eq!(bbox.min_lon, 2.4);
        assert_eq!(bbox.max_lon, 2.6);
        assert_eq!(bbox.min_lat, 41.5);
        assert_eq!(bbox.max_lat, 41.7);
    }

    #[test]
    fn rejects_missing_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aoi.geojson");
        std::fs::write(&path, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(load_bounding_box(&path).is_err());
    }
}
