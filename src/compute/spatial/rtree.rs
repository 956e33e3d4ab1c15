//! 2D zone index using an R-tree over zone bounding boxes.
//!
//! The index is rebuilt wholesale from the current zone list at the start of
//! every subdivision iteration. Zones are added, removed and split between
//! iterations, and a full rebuild avoids incremental delete bookkeeping.
//!
//! ## Radius Queries
//!
//! A radius query does not test circle/polygon intersection. The radius is
//! converted into a lon/lat rectangle around the center:
//!
//! 1. **Latitude extent**: `radius / 111000` degrees.
//! 2. **Longitude extent**: the same, divided by `cos(latitude)`.
//! 3. **Envelope match**: every zone whose bounding box intersects that
//!    rectangle is returned.
//!
//! This is an approximation. Zones near a corner of the rectangle can match
//! even though they lie outside the true circle.
//!
//! ## Example
//!
//! ```rust
//! use zonestat::ZoneIndex;
//! use zonestat_types::{Zone, ZoneCorners};
//!
//! let mut zones = vec![
//!     Zone::new("west", ZoneCorners::from_bounds(13.0, 52.0, 13.1, 52.1)),
//!     Zone::new("east", ZoneCorners::from_bounds(13.1, 52.0, 13.2, 52.1)),
//! ];
//! let index = ZoneIndex::build(&mut zones).unwrap();
//!
//! let hits = index.query_radius(52.05, 13.05, 100.0);
//! assert_eq!(hits, vec![0]);
//! ```

use crate::compute::geometry::radius_to_degrees;
use crate::compute::validation::prepare_zone;
use crate::error::Result;
use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};
use zonestat_types::Zone;

/// Bounding box of one zone, keyed by its position in the zone slice the
/// index was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedZone {
    pub slot: usize,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl IndexedZone {
    pub fn new(slot: usize, bounds: &Rect<f64>) -> Self {
        Self {
            slot,
            min_x: bounds.min().x,
            min_y: bounds.min().y,
            max_x: bounds.max().x,
            max_y: bounds.max().y,
        }
    }
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// R-tree over zone bounding boxes.
#[derive(Debug)]
pub struct ZoneIndex {
    tree: RTree<IndexedZone>,
}

impl ZoneIndex {
    /// Build an index over `zones`, preparing each zone's cached geometry.
    ///
    /// Fails with the offending zone ID when a zone's corners are degenerate.
    /// Query results are slots into this same slice.
    pub fn build(zones: &mut [Zone]) -> Result<Self> {
        let mut entries = Vec::with_capacity(zones.len());
        for (slot, zone) in zones.iter_mut().enumerate() {
            prepare_zone(zone)?;
            if let Some(geometry) = zone.geometry() {
                entries.push(IndexedZone::new(slot, &geometry.bounds));
            }
        }

        Ok(Self {
            tree: RTree::bulk_load(entries),
        })
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slots of zones whose bounding box intersects the rectangle, ascending.
    ///
    /// Touching edges count as intersecting. Non-finite coordinates match
    /// nothing.
    pub fn query_rect(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Vec<usize> {
        if ![min_lon, min_lat, max_lon, max_lat]
            .iter()
            .all(|v| v.is_finite())
        {
            log::warn!("Rejecting zone query with non-finite coordinates");
            return Vec::new();
        }

        let envelope = AABB::from_corners([min_lon, min_lat], [max_lon, max_lat]);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Slots of zones whose bounding box intersects the rectangle
    /// approximating a circle of `radius` meters around the center.
    pub fn query_radius(&self, center_lat: f64, center_lon: f64, radius: f64) -> Vec<usize> {
        let (lat_degrees, lon_degrees) = radius_to_degrees(center_lat, radius.max(0.0));
        self.query_rect(
            center_lon - lon_degrees,
            center_lat - lat_degrees,
            center_lon + lon_degrees,
            center_lat + lat_degrees,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZoneError;
    use zonestat_types::ZoneCorners;

    fn grid() -> Vec<Zone> {
        let mut zones = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                let lon = col as f64 * 0.01;
                let lat = row as f64 * 0.01;
                zones.push(Zone::new(
                    format!("r{}c{}", row, col),
                    ZoneCorners::from_bounds(lon, lat, lon + 0.01, lat + 0.01),
                ));
            }
        }
        zones
    }

    #[test]
    fn test_build_prepares_every_zone() {
        let mut zones = grid();
        let index = ZoneIndex::build(&mut zones).unwrap();
        assert_eq!(index.len(), 9);
        assert!(zones.iter().all(|z| z.geometry().is_some()));
    }

    #[test]
    fn test_build_fails_on_degenerate_zone() {
        let mut zones = grid();
        zones.push(Zone::new(
            "flat",
            ZoneCorners::from_bounds(0.0, 0.0, 0.0, 0.0),
        ));
        match ZoneIndex::build(&mut zones) {
            Err(ZoneError::DegenerateZone { zone_id, .. }) => assert_eq!(zone_id, "flat"),
            other => panic!("expected degenerate zone error, got {:?}", other),
        }
    }

    #[test]
    fn test_small_radius_hits_single_zone() {
        let mut zones = grid();
        let index = ZoneIndex::build(&mut zones).unwrap();
        let hits = index.query_radius(0.015, 0.015, 10.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(zones[hits[0]].id, "r1c1");
    }

    #[test]
    fn test_radius_crossing_boundary_hits_neighbours() {
        let mut zones = grid();
        let index = ZoneIndex::build(&mut zones).unwrap();
        // 0.0005 degrees from the r1c1/r1c2 edge, radius ~0.0009 degrees
        let hits = index.query_radius(0.015, 0.0195, 100.0);
        let ids: Vec<&str> = hits.iter().map(|&s| zones[s].id.as_str()).collect();
        assert_eq!(ids, vec!["r1c1", "r1c2"]);
    }

    #[test]
    fn test_large_radius_hits_everything() {
        let mut zones = grid();
        let index = ZoneIndex::build(&mut zones).unwrap();
        assert_eq!(index.query_radius(0.015, 0.015, 5000.0).len(), 9);
    }

    #[test]
    fn test_index_only_covers_given_zones() {
        let mut zones = grid();
        zones.truncate(2);
        let index = ZoneIndex::build(&mut zones).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.query_radius(0.025, 0.025, 10.0).is_empty());
    }

    #[test]
    fn test_non_finite_query_matches_nothing() {
        let mut zones = grid();
        let index = ZoneIndex::build(&mut zones).unwrap();
        assert!(index.query_radius(f64::NAN, 0.0, 10.0).is_empty());
    }
}
