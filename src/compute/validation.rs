//! Validation for zone geometry and the working zone set.

use crate::error::{Result, ZoneError};
use geo::Coord;
use rustc_hash::FxHashSet;
use zonestat_types::Zone;

/// Validates a coordinate has finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geo::coord;
/// use zonestat::compute::validation::validate_coord;
///
/// assert!(validate_coord(&coord! { x: -74.0060, y: 40.7128 }).is_ok());
/// assert!(validate_coord(&coord! { x: 200.0, y: 40.0 }).is_err());
/// assert!(validate_coord(&coord! { x: -74.0, y: f64::NAN }).is_err());
/// ```
pub fn validate_coord(coord: &Coord<f64>) -> std::result::Result<(), String> {
    let (x, y) = (coord.x, coord.y);

    if !x.is_finite() {
        return Err(format!("longitude must be finite, got: {}", x));
    }

    if !y.is_finite() {
        return Err(format!("latitude must be finite, got: {}", y));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(format!("longitude out of range [-180.0, 180.0]: {}", x));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(format!("latitude out of range [-90.0, 90.0]: {}", y));
    }

    Ok(())
}

/// Prepares a zone's geometry, failing with the zone ID when its corners are
/// unusable.
pub fn prepare_zone(zone: &mut Zone) -> Result<()> {
    let corners = zone.corners;
    let names = ["top_left", "top_right", "bottom_left", "bottom_right"];
    for (name, coord) in names.iter().zip(corners.to_array()) {
        validate_coord(&coord).map_err(|reason| ZoneError::DegenerateZone {
            zone_id: zone.id.clone(),
            reason: format!("{} corner: {}", name, reason),
        })?;
    }

    if zone.prepare().is_none() {
        return Err(ZoneError::DegenerateZone {
            zone_id: zone.id.clone(),
            reason: "corners span no area".to_string(),
        });
    }
    Ok(())
}

/// Ensures no two zones share an ID.
pub fn validate_unique_ids<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Result<()> {
    let mut seen = FxHashSet::default();
    for zone in zones {
        if !seen.insert(zone.id.as_str()) {
            return Err(ZoneError::DuplicateZoneId(zone.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;
    use zonestat_types::ZoneCorners;

    #[test]
    fn test_coordinate_edges() {
        assert!(validate_coord(&coord! { x: 180.0, y: 90.0 }).is_ok());
        assert!(validate_coord(&coord! { x: -180.0, y: -90.0 }).is_ok());
        assert!(validate_coord(&coord! { x: 0.0, y: 90.1 }).is_err());
        assert!(validate_coord(&coord! { x: f64::INFINITY, y: 0.0 }).is_err());
    }

    #[test]
    fn test_prepare_zone_reports_id() {
        let mut zone = Zone::new("broken", ZoneCorners::from_bounds(1.0, 1.0, 1.0, 2.0));
        match prepare_zone(&mut zone) {
            Err(ZoneError::DegenerateZone { zone_id, .. }) => assert_eq!(zone_id, "broken"),
            other => panic!("expected degenerate zone error, got {:?}", other),
        }

        let mut corners = ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0);
        corners.top_right.y = 123.0;
        let mut zone = Zone::new("out-of-range", corners);
        let err = prepare_zone(&mut zone).unwrap_err();
        assert!(err.to_string().contains("top_right"));
    }

    #[test]
    fn test_prepare_zone_caches_geometry() {
        let mut zone = Zone::new("ok", ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0));
        prepare_zone(&mut zone).unwrap();
        assert!(zone.geometry().is_some());
    }

    #[test]
    fn test_duplicate_ids() {
        let corners = ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0);
        let zones = vec![
            Zone::new("a", corners),
            Zone::new("b", corners),
            Zone::new("a", corners),
        ];
        match validate_unique_ids(&zones) {
            Err(ZoneError::DuplicateZoneId(id)) => assert_eq!(id, "a"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
        assert!(validate_unique_ids(&zones[..2]).is_ok());
    }
}
