//! Adaptive zone subdivision.
//!
//! The engine drives the working zone list to a fixed point: buildings are
//! distributed into every zone pending recalculation, zones heavier than the
//! configured threshold are rolled back and split into quadrants, and zones
//! sharing buildings with them are rolled back and recomputed next round.
//!
//! ## Iteration
//!
//! 1. Snapshot zones flagged for recalculation.
//! 2. Rebuild the zone index.
//! 3. Distribute all buildings; this clears the flags and builds the
//!    building-sharing graph.
//! 4. Collect overweight zones. None means the run has converged.
//! 5. Collect zones connected to them through shared buildings.
//! 6. Restore overweight and affected zones from the snapshot.
//! 7. Replace every overweight zone by its four children.
//!
//! The loop boundary is the only point at which the working set is
//! consistent, so an observer may stop the run there and nowhere else.
//!
//! ```rust
//! use geo::coord;
//! use zonestat::{CategoryConfig, Config, SubdivisionEngine};
//! use zonestat_types::{Building, Zone, ZoneCorners};
//!
//! let config = Config::default().with_weight_threshold(50_000.0);
//! let categories = CategoryConfig::default();
//! let engine = SubdivisionEngine::new(&config, &categories);
//!
//! let zones = vec![Zone::new("root", ZoneCorners::from_bounds(13.0, 52.0, 13.1, 52.1))];
//! let outline = vec![
//!     coord! { x: 13.05, y: 52.05 },
//!     coord! { x: 13.0505, y: 52.05 },
//!     coord! { x: 13.0505, y: 52.0503 },
//!     coord! { x: 13.05, y: 52.0503 },
//! ];
//! let buildings = vec![Building::from_outline(1, "house", outline, Some(2), None).unwrap()];
//!
//! let outcome = engine.run(zones, &buildings)?;
//! assert_eq!(outcome.zones.len(), 1);
//! assert!(outcome.pending_deletion.is_empty());
//! # Ok::<(), zonestat::ZoneError>(())
//! ```

pub mod backup;
pub mod dependency;
pub mod distribution;
pub mod split;

pub use backup::ZoneBackup;
pub use dependency::ZoneDependencies;
pub use distribution::{DistributionEngine, DistributionSummary, Footprint};
pub use split::{Quadrant, split_into_four};

use crate::category::CategoryConfig;
use crate::compute::spatial::ZoneIndex;
use crate::compute::validation::{prepare_zone, validate_unique_ids};
use crate::config::Config;
use crate::error::{Result, ZoneError};
use rustc_hash::FxHashSet;
use std::ops::ControlFlow;
use zonestat_types::{Building, Zone};

/// Weight of a zone: category areas multiplied by category weights.
pub fn zone_weight(zone: &Zone, categories: &CategoryConfig) -> f64 {
    zone.stats
        .by_category
        .iter()
        .map(|(category, tally)| tally.area * categories.weight(category))
        .sum()
}

/// What happened in one iteration, handed to the observer at the loop
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// 1-based iteration number
    pub iteration: usize,
    /// Working set size after the iteration
    pub zone_count: usize,
    /// Zones split in this iteration
    pub overweight: Vec<String>,
    /// Zones rolled back because they share buildings with an overweight zone
    pub affected: Vec<String>,
    pub distribution: DistributionSummary,
}

impl IterationReport {
    pub fn converged(&self) -> bool {
        self.overweight.is_empty()
    }
}

/// Result of a converged run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubdivisionOutcome {
    /// Final partition with current stats
    pub zones: Vec<Zone>,
    /// IDs of every zone split during the run, in split order
    pub pending_deletion: Vec<String>,
    /// Iterations executed, including the converging one
    pub iterations: usize,
}

/// Convergence loop over the zone partition.
#[derive(Debug, Clone, Copy)]
pub struct SubdivisionEngine<'a> {
    config: &'a Config,
    categories: &'a CategoryConfig,
}

impl<'a> SubdivisionEngine<'a> {
    pub fn new(config: &'a Config, categories: &'a CategoryConfig) -> Self {
        Self { config, categories }
    }

    /// Run to convergence or to the iteration cap.
    pub fn run(&self, zones: Vec<Zone>, buildings: &[Building]) -> Result<SubdivisionOutcome> {
        self.run_with(zones, buildings, |_| ControlFlow::Continue(()))
    }

    /// Run with an observer invoked after every iteration.
    ///
    /// Returning `ControlFlow::Break` from the observer stops the run with
    /// `ZoneError::Cancelled`. The observer is not consulted once the run has
    /// converged.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an invalid configuration
    /// - `DuplicateZoneId` when two zones share an ID, initially or after a split
    /// - `DegenerateZone` when a zone's corners cannot be prepared
    /// - `ConvergenceFailed` after `max_iterations` iterations without an empty
    ///   overweight set, carrying the unfinished zone list
    pub fn run_with<F>(
        &self,
        mut zones: Vec<Zone>,
        buildings: &[Building],
        mut observer: F,
    ) -> Result<SubdivisionOutcome>
    where
        F: FnMut(&IterationReport) -> ControlFlow<()>,
    {
        self.config.validate().map_err(ZoneError::InvalidInput)?;
        validate_unique_ids(&zones)?;
        for zone in zones.iter_mut() {
            prepare_zone(zone)?;
            zone.recalculate_needed = true;
        }

        if self.categories.is_degraded() {
            log::warn!("Running subdivision with degraded category configuration");
        }

        let distribution = DistributionEngine::new(self.config, self.categories);
        let footprints = distribution.footprints(buildings);
        let mut pending_deletion: Vec<String> = Vec::new();

        log::info!(
            "Starting subdivision: {} zones, {} buildings, threshold {}",
            zones.len(),
            footprints.len(),
            self.config.weight_threshold
        );

        for iteration in 1..=self.config.max_iterations {
            let backup = ZoneBackup::snapshot_recalc_needed(&zones);
            let index = ZoneIndex::build(&mut zones)?;
            let mut dependencies = ZoneDependencies::new();
            let summary = distribution.distribute(&footprints, &mut zones, &index, &mut dependencies);

            let overweight: Vec<String> = zones
                .iter()
                .filter(|zone| zone_weight(zone, self.categories) > self.config.weight_threshold)
                .map(|zone| zone.id.clone())
                .collect();

            if overweight.is_empty() {
                log::info!(
                    "Subdivision converged after {} iterations with {} zones ({} split)",
                    iteration,
                    zones.len(),
                    pending_deletion.len()
                );
                return Ok(SubdivisionOutcome {
                    zones,
                    pending_deletion,
                    iterations: iteration,
                });
            }

            let overweight_set: FxHashSet<&str> = overweight.iter().map(String::as_str).collect();
            let affected: Vec<String> = dependencies
                .connected_component(&overweight)
                .into_iter()
                .filter(|id| !overweight_set.contains(id.as_str()))
                .collect();

            let rollback: Vec<&str> = overweight
                .iter()
                .chain(affected.iter())
                .map(String::as_str)
                .collect();
            backup.restore(&rollback, &mut zones)?;

            let children: Vec<Zone> = zones
                .iter()
                .filter(|zone| overweight_set.contains(zone.id.as_str()))
                .flat_map(split_into_four)
                .collect();

            zones.retain(|zone| !overweight_set.contains(zone.id.as_str()));
            self.append_children(&mut zones, children)?;
            pending_deletion.extend(overweight.iter().cloned());

            log::debug!(
                "Iteration {}: {} zones, {} overweight, {} affected of {} snapshotted, {} sharing edges, {} buildings dropped",
                iteration,
                zones.len(),
                overweight.len(),
                affected.len(),
                backup.len(),
                dependencies.edge_count(),
                summary.dropped
            );

            let report = IterationReport {
                iteration,
                zone_count: zones.len(),
                overweight,
                affected,
                distribution: summary,
            };
            if observer(&report).is_break() {
                log::info!("Subdivision cancelled after iteration {}", iteration);
                return Err(ZoneError::Cancelled { iteration });
            }
        }

        log::warn!(
            "Subdivision did not converge within {} iterations",
            self.config.max_iterations
        );
        Err(ZoneError::ConvergenceFailed {
            iterations: self.config.max_iterations,
            pending_deletion,
            zones,
        })
    }

    fn append_children(&self, zones: &mut Vec<Zone>, children: Vec<Zone>) -> Result<()> {
        let mut ids: FxHashSet<String> = zones.iter().map(|zone| zone.id.clone()).collect();
        for child in &children {
            if !ids.insert(child.id.clone()) {
                return Err(ZoneError::DuplicateZoneId(child.id.clone()));
            }
        }
        zones.extend(children);
        Ok(())
    }
}
