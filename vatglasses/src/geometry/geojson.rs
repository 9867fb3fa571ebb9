//! GeoJSON geometry (de)serialization for `geo` polygons.
//!
//! Use with `#[serde(with = "...")]`:
//!
//! ```ignore
//! #[serde(with = "crate::geometry::geojson::polygon")]
//! geometry: Polygon<f64>,
//! ```

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

type Ring = Vec<[f64; 2]>;

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

fn ring_to_json(ring: &LineString<f64>) -> Ring {
    ring.0.iter().map(|c| [c.x, c.y]).collect()
}

fn ring_from_json(ring: Ring) -> LineString<f64> {
    LineString::new(ring.into_iter().map(|[x, y]| Coord { x, y }).collect())
}

fn polygon_to_json(polygon: &Polygon<f64>) -> Vec<Ring> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_to_json)
        .collect()
}

fn polygon_from_json(rings: Vec<Ring>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(ring_from_json);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Convert a polygon to a GeoJSON geometry value.
pub fn polygon_to_value(polygon: &Polygon<f64>) -> serde_json::Value {
    serde_json::json!({ "type": "Polygon", "coordinates": polygon_to_json(polygon) })
}

/// Convert a multipolygon to a GeoJSON geometry value.
pub fn multi_polygon_to_value(multi: &MultiPolygon<f64>) -> serde_json::Value {
    let coordinates: Vec<Vec<Ring>> = multi.0.iter().map(polygon_to_json).collect();
    serde_json::json!({ "type": "MultiPolygon", "coordinates": coordinates })
}

pub mod polygon {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(polygon: &Polygon<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        GeoJsonGeometry::Polygon {
            coordinates: polygon_to_json(polygon),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Polygon<f64>, D::Error> {
        match GeoJsonGeometry::deserialize(deserializer)? {
            GeoJsonGeometry::Polygon { coordinates } => Ok(polygon_from_json(coordinates)),
            GeoJsonGeometry::MultiPolygon { .. } => {
                Err(de::Error::custom("expected Polygon, found MultiPolygon"))
            }
        }
    }
}

pub mod multi_polygon {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(multi: &MultiPolygon<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        GeoJsonGeometry::MultiPolygon {
            coordinates: multi.0.iter().map(polygon_to_json).collect(),
        }
        .serialize(serializer)
    }

    /// Accepts either geometry type; a Polygon becomes a one-part MultiPolygon.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MultiPolygon<f64>, D::Error> {
        Ok(match GeoJsonGeometry::deserialize(deserializer)? {
            GeoJsonGeometry::Polygon { coordinates } => {
                MultiPolygon::new(vec![polygon_from_json(coordinates)])
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                MultiPolygon::new(coordinates.into_iter().map(polygon_from_json).collect())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper {
        #[serde(with = "super::polygon")]
        geometry: Polygon<f64>,
    }

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct MultiWrapper {
        #[serde(with = "super::multi_polygon")]
        geometry: MultiPolygon<f64>,
    }

    #[test]
    fn test_polygon_writes_geojson_coordinates() {
        let wrapper = Wrapper {
            geometry: Polygon::new(
                LineString::from(vec![(11.0, 48.0), (12.0, 48.0), (12.0, 49.0)]),
                vec![],
            ),
        };
        let json = serde_json::to_value(&wrapper).unwrap();
        assert_eq!(json["geometry"]["type"], "Polygon");
        assert_eq!(json["geometry"]["coordinates"][0][0], serde_json::json!([11.0, 48.0]));
        assert_eq!(json["geometry"]["coordinates"][0].as_array().unwrap().len(), 4);

        let back: Wrapper = serde_json::from_value(json).unwrap();
        assert_eq!(back, wrapper);
    }

    #[test]
    fn test_multi_polygon_accepts_single_polygon() {
        let json = r#"{ "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }"#;
        let wrapper: MultiWrapper = serde_json::from_str(json).unwrap();
        assert_eq!(wrapper.geometry.0.len(), 1);
    }

    #[test]
    fn test_polygon_rejects_multi_polygon() {
        let json = r#"{ "geometry": { "type": "MultiPolygon", "coordinates": [] } }"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());
    }
}
