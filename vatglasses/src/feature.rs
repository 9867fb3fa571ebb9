//! Sector features handed to the rendering layer.
//!
//! A [`SectorFeature`] is one non-overlapping fragment from the splitter; a
//! [`CombinedFeature`] is the union of every fragment sharing the same
//! altitude-range list. Both carry [`SectorProperties`], which serialize to the
//! GeoJSON property names the renderer expects.

use serde::{Deserialize, Serialize};

use crate::geometry::{geojson, AltitudeRange, MultiPolygon, Polygon};
use crate::roster::Controller;

/// Feature `type` property value.
pub const SECTOR_TYPE: &str = "sector";

fn sector_type() -> String {
    SECTOR_TYPE.to_string()
}

/// Properties attached to every sector feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorProperties {
    /// Lowest floor covered by this feature.
    pub min: u32,
    /// Highest ceiling covered by this feature.
    pub max: u32,
    pub country_group_id: String,
    pub position_id: String,
    /// Controllers staffing the owning position.
    pub atc: Vec<Controller>,
    pub colour: String,
    #[serde(rename = "type", default = "sector_type")]
    pub kind: String,
    /// Every altitude band stacked over this area.
    #[serde(default)]
    pub altitude_ranges: Vec<AltitudeRange>,
}

impl SectorProperties {
    /// Replace the roster-derived fields; returns whether anything changed.
    pub fn retag(&mut self, atc: &[Controller], colour: &str) -> bool {
        let changed = self.atc.as_slice() != atc || self.colour != colour;
        if changed {
            self.atc = atc.to_vec();
            self.colour = colour.to_string();
        }
        changed
    }
}

/// One fragment of a position's partitioned airspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorFeature {
    #[serde(with = "geojson::polygon")]
    pub geometry: Polygon<f64>,
    pub properties: SectorProperties,
}

/// Same-band fragments merged for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFeature {
    #[serde(with = "geojson::multi_polygon")]
    pub geometry: MultiPolygon<f64>,
    pub properties: SectorProperties,
}

/// GeoJSON `Feature` value for a fragment.
pub(crate) fn sector_to_geojson(feature: &SectorFeature) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "geometry": geojson::polygon_to_value(&feature.geometry),
        "properties": feature.properties,
    })
}

/// GeoJSON `Feature` value for a combined sector.
pub(crate) fn combined_to_geojson(feature: &CombinedFeature) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "geometry": geojson::multi_polygon_to_value(&feature.geometry),
        "properties": feature.properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Facility;
    use geo::polygon;

    fn properties() -> SectorProperties {
        SectorProperties {
            min: 100,
            max: 245,
            country_group_id: "ed".into(),
            position_id: "ALB".into(),
            atc: vec![Controller::new(1, "EDMM_ALB_CTR", "132.555", Facility::Ctr)],
            colour: "#aa00aa".into(),
            kind: sector_type(),
            altitude_ranges: vec![AltitudeRange::new(100, 245)],
        }
    }

    #[test]
    fn test_properties_use_camel_case_names() {
        let json = serde_json::to_value(properties()).unwrap();
        assert_eq!(json["countryGroupId"], "ed");
        assert_eq!(json["positionId"], "ALB");
        assert_eq!(json["type"], "sector");
        assert_eq!(json["altitudeRanges"], serde_json::json!([[100, 245]]));
        assert_eq!(json["atc"][0]["callsign"], "EDMM_ALB_CTR");
    }

    #[test]
    fn test_retag_reports_change() {
        let mut props = properties();
        let same = props.atc.clone();
        assert!(!props.retag(&same, "#aa00aa"));
        assert!(props.retag(&same, "#ffffff"));
        assert_eq!(props.colour, "#ffffff");
        assert!(props.retag(&[], "#ffffff"));
        assert!(props.atc.is_empty());
    }

    #[test]
    fn test_sector_feature_geojson() {
        let feature = SectorFeature {
            geometry: polygon![(x: 11.0, y: 48.0), (x: 12.0, y: 48.0), (x: 12.0, y: 49.0)],
            properties: properties(),
        };
        let value = sector_to_geojson(&feature);
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["properties"]["min"], 100);
    }
}
