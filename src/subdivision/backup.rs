//! Pre-pass snapshots of zones about to be recomputed.
//!
//! Before each distribution pass every zone flagged for recalculation is
//! deep-copied. Zones that turn out overweight, or that share buildings with
//! an overweight zone, are rolled back to that copy so stats computed against
//! a distribution that is about to change never leak into the next iteration.

use crate::error::{Result, ZoneError};
use rustc_hash::FxHashMap;
use zonestat_types::Zone;

/// Deep copies of the zones flagged at snapshot time, keyed by zone ID.
#[derive(Debug, Clone, Default)]
pub struct ZoneBackup {
    zones: FxHashMap<String, Zone>,
}

impl ZoneBackup {
    /// Copy every zone currently flagged `recalculate_needed`.
    pub fn snapshot_recalc_needed(zones: &[Zone]) -> Self {
        let zones = zones
            .iter()
            .filter(|zone| zone.recalculate_needed)
            .map(|zone| (zone.id.clone(), zone.clone()))
            .collect();
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Replace each listed live zone with its snapshot and re-flag it.
    ///
    /// Every ID must be present both in the live set and in the backup;
    /// otherwise nothing is modified and `ZoneNotFound` is returned.
    /// Returns the number of zones restored.
    pub fn restore<S: AsRef<str>>(&self, ids: &[S], zones: &mut [Zone]) -> Result<usize> {
        let slots: FxHashMap<&str, usize> = zones
            .iter()
            .enumerate()
            .map(|(slot, zone)| (zone.id.as_str(), slot))
            .collect();

        let mut plan = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            let slot = slots
                .get(id)
                .copied()
                .ok_or_else(|| ZoneError::ZoneNotFound(id.to_string()))?;
            let saved = self
                .zones
                .get(id)
                .ok_or_else(|| ZoneError::ZoneNotFound(id.to_string()))?;
            plan.push((slot, saved));
        }

        for (slot, saved) in &plan {
            let zone = &mut zones[*slot];
            *zone = (*saved).clone();
            zone.recalculate_needed = true;
        }

        Ok(plan.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonestat_types::{HeightClass, ZoneCorners};

    fn zone(id: &str, flagged: bool) -> Zone {
        let mut zone = Zone::new(id, ZoneCorners::from_bounds(0.0, 0.0, 1.0, 1.0));
        zone.recalculate_needed = flagged;
        zone
    }

    #[test]
    fn test_snapshot_only_copies_flagged_zones() {
        let zones = vec![zone("a", true), zone("b", false), zone("c", true)];
        let backup = ZoneBackup::snapshot_recalc_needed(&zones);
        assert_eq!(backup.len(), 2);
        assert!(backup.restore(&["a", "c"], &mut zones.clone()).is_ok());
        assert!(backup.restore(&["b"], &mut zones.clone()).is_err());
    }

    #[test]
    fn test_restore_discards_pass_results() {
        let mut zones = vec![zone("a", true), zone("b", true)];
        zones[0]
            .stats
            .record("shop", HeightClass::LowRise, 10.0);
        let backup = ZoneBackup::snapshot_recalc_needed(&zones);

        for zone in zones.iter_mut() {
            zone.stats.record("office", HeightClass::HighRise, 500.0);
            zone.recalculate_needed = false;
        }

        let restored = backup.restore(&["a"], &mut zones).unwrap();
        assert_eq!(restored, 1);
        assert!(zones[0].recalculate_needed);
        assert_eq!(zones[0].stats.area_of("shop"), 10.0);
        assert_eq!(zones[0].stats.area_of("office"), 0.0);

        assert!(!zones[1].recalculate_needed);
        assert_eq!(zones[1].stats.area_of("office"), 500.0);
    }

    #[test]
    fn test_restore_unknown_id_changes_nothing() {
        let mut zones = vec![zone("a", true), zone("b", false)];
        let backup = ZoneBackup::snapshot_recalc_needed(&zones);
        zones[0].recalculate_needed = false;

        match backup.restore(&["a", "b"], &mut zones) {
            Err(ZoneError::ZoneNotFound(id)) => assert_eq!(id, "b"),
            other => panic!("expected zone not found, got {:?}", other),
        }
        assert!(!zones[0].recalculate_needed);

        assert!(backup.restore(&["missing"], &mut zones).is_err());
    }
}
