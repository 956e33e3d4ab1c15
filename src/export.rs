//! GeoJSON export of a zone partition for visual inspection.

use crate::error::Result;
use geojson::{Feature, FeatureCollection, Geometry, Value, feature::Id};
use serde_json::{Map, json};
use zonestat_types::Zone;

/// Renders one zone as a polygon feature.
///
/// Properties carry the total count and area, per-category areas and
/// per-height-class counts.
pub fn zone_to_feature(zone: &Zone) -> Feature {
    let ring: Vec<Vec<f64>> = zone
        .corners
        .to_polygon()
        .exterior()
        .coords()
        .map(|coord| vec![coord.x, coord.y])
        .collect();

    let mut properties = Map::new();
    properties.insert("zone_id".to_string(), json!(zone.id));
    properties.insert("building_count".to_string(), json!(zone.stats.total.count));
    properties.insert("building_area".to_string(), json!(zone.stats.total.area));

    let category_areas: Map<String, serde_json::Value> = zone
        .stats
        .by_category
        .iter()
        .map(|(category, tally)| (category.clone(), json!(tally.area)))
        .collect();
    properties.insert("category_areas".to_string(), category_areas.into());

    let height_counts: Map<String, serde_json::Value> = zone
        .stats
        .by_height
        .iter()
        .map(|(class, tally)| (class.as_str().to_string(), json!(tally.count)))
        .collect();
    properties.insert("height_counts".to_string(), height_counts.into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: Some(Id::String(zone.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Renders a zone list as a feature collection.
pub fn zones_to_feature_collection(zones: &[Zone]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.iter().map(zone_to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes a zone list to a GeoJSON string.
pub fn zones_to_geojson(zones: &[Zone]) -> Result<String> {
    Ok(serde_json::to_string(&zones_to_feature_collection(zones))?)
}
