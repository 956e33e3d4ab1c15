//! Zone persistence abstraction.
//!
//! The subdivision engine never touches storage itself. Callers load the
//! initial partition from a store, run the engine, and hand the outcome back
//! with [`persist_zones`], which deletes split zones before upserting the
//! final list so an ID is never both a stale parent and a new child.

use crate::error::Result;
use crate::subdivision::SubdivisionOutcome;
use std::collections::BTreeMap;
use zonestat_types::{GeoBounds, Zone, ZoneCorners};

#[cfg(feature = "snapshot")]
pub mod snapshot;

#[cfg(feature = "snapshot")]
pub use snapshot::SnapshotZoneStore;

/// Trait for zone store implementations
pub trait ZoneStore {
    /// Zones whose bounding box intersects `bounds`, ordered by ID
    fn load_initial_zones(&self, bounds: &GeoBounds) -> Result<Vec<Zone>>;

    /// Delete zones by ID and return how many existed
    fn delete_zones(&mut self, ids: &[String]) -> Result<usize>;

    /// Insert or replace zones by ID
    fn upsert_zones(&mut self, zones: &[Zone]) -> Result<()>;

    /// Get store statistics
    fn stats(&self) -> Result<StoreStats>;
}

/// Zone store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Zones currently stored
    pub zone_count: usize,
    /// Zones written by upserts
    pub upserted: u64,
    /// Zones removed by deletes
    pub deleted: u64,
    /// Number of store calls performed
    pub operations_count: u64,
}

/// In-memory zone store using BTreeMap
#[derive(Debug, Default)]
pub struct MemoryZoneStore {
    zones: BTreeMap<String, Zone>,
    stats: StoreStats,
}

impl MemoryZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `zones`.
    pub fn with_zones(zones: impl IntoIterator<Item = Zone>) -> Self {
        let zones: BTreeMap<String, Zone> = zones
            .into_iter()
            .map(|zone| (zone.id.clone(), zone))
            .collect();
        Self {
            stats: StoreStats {
                zone_count: zones.len(),
                ..StoreStats::default()
            },
            zones,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }
}

impl ZoneStore for MemoryZoneStore {
    fn load_initial_zones(&self, bounds: &GeoBounds) -> Result<Vec<Zone>> {
        Ok(self
            .zones
            .values()
            .filter(|zone| zone.bounds().is_some_and(|rect| bounds.intersects_rect(&rect)))
            .cloned()
            .collect())
    }

    fn delete_zones(&mut self, ids: &[String]) -> Result<usize> {
        let mut removed = 0;
        for id in ids {
            if self.zones.remove(id).is_some() {
                removed += 1;
            }
        }
        self.stats.deleted += removed as u64;
        self.stats.operations_count += 1;
        self.stats.zone_count = self.zones.len();
        Ok(removed)
    }

    fn upsert_zones(&mut self, zones: &[Zone]) -> Result<()> {
        for zone in zones {
            self.zones.insert(zone.id.clone(), zone.clone());
        }
        self.stats.upserted += zones.len() as u64;
        self.stats.operations_count += 1;
        self.stats.zone_count = self.zones.len();
        Ok(())
    }

    fn stats(&self) -> Result<StoreStats> {
        let mut stats = self.stats.clone();
        stats.zone_count = self.zones.len();
        Ok(stats)
    }
}

/// Write a run's result: deletions first, then upserts.
///
/// Works for both a converged outcome and the partial result carried by a
/// convergence failure.
pub fn persist_zones<S: ZoneStore + ?Sized>(
    store: &mut S,
    pending_deletion: &[String],
    zones: &[Zone],
) -> Result<()> {
    let removed = store.delete_zones(pending_deletion)?;
    store.upsert_zones(zones)?;
    log::info!(
        "Persisted {} zones, removed {} of {} split zones",
        zones.len(),
        removed,
        pending_deletion.len()
    );
    Ok(())
}

/// Persist a converged run.
pub fn persist_outcome<S: ZoneStore + ?Sized>(
    store: &mut S,
    outcome: &SubdivisionOutcome,
) -> Result<()> {
    persist_zones(store, &outcome.pending_deletion, &outcome.zones)
}

/// Regular starting partition of `bounds` with IDs `r{row}c{col}`.
///
/// Row 0 is the southernmost row.
///
/// # Examples
///
/// ```rust
/// use zonestat::storage::initial_grid;
/// use zonestat_types::GeoBounds;
///
/// let zones = initial_grid(&GeoBounds::new(13.0, 52.0, 13.4, 52.2), 2, 4);
/// assert_eq!(zones.len(), 8);
/// assert_eq!(zones[5].id, "r1c1");
/// ```
pub fn initial_grid(bounds: &GeoBounds, rows: usize, cols: usize) -> Vec<Zone> {
    let lat_step = bounds.height() / rows.max(1) as f64;
    let lon_step = bounds.width() / cols.max(1) as f64;

    let mut zones = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let min_lat = bounds.min_lat() + row as f64 * lat_step;
            let min_lon = bounds.min_lon() + col as f64 * lon_step;
            let max_lat = if row + 1 == rows {
                bounds.max_lat()
            } else {
                min_lat + lat_step
            };
            let max_lon = if col + 1 == cols {
                bounds.max_lon()
            } else {
                min_lon + lon_step
            };
            zones.push(Zone::new(
                format!("r{}c{}", row, col),
                ZoneCorners::from_bounds(min_lon, min_lat, max_lon, max_lat),
            ));
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = MemoryZoneStore::new();
        let mut zone = Zone::new("a", ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0));
        store.upsert_zones(std::slice::from_ref(&zone)).unwrap();

        zone.recalculate_needed = false;
        store.upsert_zones(&[zone]).unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.get("a").unwrap().recalculate_needed);
        let stats = store.stats().unwrap();
        assert_eq!(stats.upserted, 2);
        assert_eq!(stats.operations_count, 2);
    }

    #[test]
    fn test_load_filters_by_bounds() {
        let store = MemoryZoneStore::with_zones(initial_grid(
            &GeoBounds::new(0.0, 0.0, 4.0, 4.0),
            4,
            4,
        ));
        let loaded = store
            .load_initial_zones(&GeoBounds::new(0.5, 0.5, 1.5, 0.9))
            .unwrap();
        let ids: Vec<&str> = loaded.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["r0c0", "r0c1"]);
    }

    #[test]
    fn test_persist_deletes_before_upserting() {
        let parent = Zone::new("p", ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0));
        let mut store = MemoryZoneStore::with_zones(vec![parent.clone()]);

        let children = crate::subdivision::split_into_four(&parent);
        persist_zones(&mut store, &["p".to_string()], &children).unwrap();

        assert!(store.get("p").is_none());
        assert_eq!(store.len(), 4);
        let stats = store.stats().unwrap();
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.upserted, 4);
    }

    #[test]
    fn test_persist_outcome_writes_final_partition() {
        let mut store = MemoryZoneStore::with_zones(initial_grid(
            &GeoBounds::new(0.0, 0.0, 0.02, 0.02),
            1,
            1,
        ));
        let mut zones = Vec::from(crate::subdivision::split_into_four(store.get("r0c0").unwrap()));
        for zone in zones.iter_mut() {
            zone.recalculate_needed = false;
        }
        let outcome = SubdivisionOutcome {
            zones,
            pending_deletion: vec!["r0c0".to_string()],
            iterations: 2,
        };

        persist_outcome(&mut store, &outcome).unwrap();
        let ids: Vec<&str> = store.zones().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["r0c0_bl", "r0c0_br", "r0c0_tl", "r0c0_tr"]);
    }

    #[test]
    fn test_persist_readds_zone_deleted_and_upserted() {
        let zone = Zone::new("same", ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0));
        let mut store = MemoryZoneStore::with_zones(vec![zone.clone()]);
        persist_zones(&mut store, &["same".to_string()], &[zone]).unwrap();
        assert!(store.get("same").is_some());
    }

    #[test]
    fn test_initial_grid_tiles_bounds() {
        let bounds = GeoBounds::new(10.0, 50.0, 10.3, 50.2);
        let zones = initial_grid(&bounds, 2, 3);
        assert_eq!(zones.len(), 6);
        assert_eq!(zones[0].corners.bottom_left, geo::coord! { x: 10.0, y: 50.0 });
        assert_eq!(zones[5].corners.top_right, geo::coord! { x: 10.3, y: 50.2 });
        assert_eq!(zones[0].corners.top_right, zones[4].corners.bottom_left);
        assert!(zones.iter().all(|z| z.recalculate_needed));
    }
}
