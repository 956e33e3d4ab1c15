//! Hand-off from upstream building sources.
//!
//! Raw records carry the source's own building type and an unvalidated
//! outline. [`prepare_buildings`] maps types to normalized categories, drops
//! outlines with fewer than three resolvable points, and returns the
//! immutable building list the engine consumes.

use crate::category::CategoryConfig;
use geo::Coord;
use serde::{Deserialize, Serialize};
use zonestat_types::Building;

/// A building as delivered by the map-data parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBuilding {
    pub id: u64,
    /// Source building type, e.g. `"apartments"`
    pub raw_type: String,
    pub outline: Vec<Coord<f64>>,
    #[serde(default)]
    pub levels: Option<u32>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Convert raw records into buildings, skipping unusable outlines.
///
/// # Examples
///
/// ```rust
/// use geo::coord;
/// use zonestat::CategoryConfig;
/// use zonestat::ingest::{RawBuilding, prepare_buildings};
///
/// let categories = CategoryConfig::from_json(r#"{"raw_types": {"house": "residential"}}"#)?;
/// let raw = vec![
///     RawBuilding {
///         id: 1,
///         raw_type: "house".into(),
///         outline: vec![
///             coord! { x: 0.0, y: 0.0 },
///             coord! { x: 0.0001, y: 0.0 },
///             coord! { x: 0.0001, y: 0.0001 },
///         ],
///         levels: Some(2),
///         height: None,
///     },
///     RawBuilding {
///         id: 2,
///         raw_type: "house".into(),
///         outline: vec![coord! { x: 0.0, y: 0.0 }, coord! { x: 0.0001, y: 0.0 }],
///         levels: None,
///         height: None,
///     },
/// ];
///
/// let buildings = prepare_buildings(raw, &categories);
/// assert_eq!(buildings.len(), 1);
/// assert_eq!(buildings[0].category, "residential");
/// # Ok::<(), zonestat::ZoneError>(())
/// ```
pub fn prepare_buildings(
    raw: impl IntoIterator<Item = RawBuilding>,
    categories: &CategoryConfig,
) -> Vec<Building> {
    let mut excluded = 0usize;
    let buildings: Vec<Building> = raw
        .into_iter()
        .filter_map(|record| {
            let category = categories.map_raw_category(&record.raw_type);
            let building = Building::from_outline(
                record.id,
                category,
                record.outline,
                record.levels,
                record.height,
            );
            if building.is_none() {
                log::trace!("Excluding building {} with unusable outline", record.id);
                excluded += 1;
            }
            building
        })
        .collect();

    if excluded > 0 {
        log::warn!(
            "Excluded {} buildings with fewer than 3 resolvable outline points",
            excluded
        );
    }
    buildings
}
