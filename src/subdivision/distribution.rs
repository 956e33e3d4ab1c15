//! Distribution of buildings into zone statistics.
//!
//! Each pass walks the full building list once. A building's influence
//! radius grows with its floor area; every zone flagged for recalculation
//! whose bounding box meets the radius rectangle receives an equal share of
//! the building's area. Buildings reaching several zones are recorded in the
//! dependency graph.

use crate::category::CategoryConfig;
use crate::compute::geometry::{floor_area, influence_radius};
use crate::compute::spatial::ZoneIndex;
use crate::config::Config;
use crate::subdivision::dependency::ZoneDependencies;
use geo::Point;
use smallvec::SmallVec;
use zonestat_types::{Building, HeightClass, Zone};

/// Values derived from a building that stay fixed for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub building_id: u64,
    pub category: String,
    pub height_class: HeightClass,
    pub centroid: Point<f64>,
    /// Floor area in square meters
    pub area: f64,
    /// Influence radius in meters
    pub radius: f64,
}

/// Counters for one distribution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributionSummary {
    /// Zones that were flagged for recalculation at the start of the pass
    pub eligible_zones: usize,
    /// Buildings matched to exactly one zone
    pub single_zone: usize,
    /// Buildings split across several zones
    pub shared: usize,
    /// Buildings that reached no eligible zone
    pub dropped: usize,
}

impl DistributionSummary {
    pub fn distributed(&self) -> usize {
        self.single_zone + self.shared
    }
}

/// Assigns buildings to zones for one subdivision run.
#[derive(Debug, Clone, Copy)]
pub struct DistributionEngine<'a> {
    config: &'a Config,
    categories: &'a CategoryConfig,
}

impl<'a> DistributionEngine<'a> {
    pub fn new(config: &'a Config, categories: &'a CategoryConfig) -> Self {
        Self { config, categories }
    }

    /// Floor area and influence radius of a building.
    ///
    /// The building's category is already normalized and is used as is.
    /// Categories without an effects entry use a radius coefficient of 1.
    pub fn footprint(&self, building: &Building) -> Footprint {
        let category = building.category.clone();
        let area = floor_area(building);
        let extra_radius_kf = self.categories.extra_radius_kf(&category);

        Footprint {
            building_id: building.id,
            height_class: building.height_class(),
            centroid: building.centroid(),
            radius: influence_radius(area, extra_radius_kf, self.config),
            category,
            area,
        }
    }

    pub fn footprints(&self, buildings: &[Building]) -> Vec<Footprint> {
        buildings.iter().map(|b| self.footprint(b)).collect()
    }

    /// Run one distribution pass.
    ///
    /// Zones flagged `recalculate_needed` start from empty stats and
    /// accumulate every footprint whose radius rectangle meets their bounding
    /// box. Zones not flagged are left untouched. After the pass every zone
    /// that was flagged is cleared, whether or not anything matched it.
    ///
    /// `index` must have been built from `zones` in their current order.
    pub fn distribute(
        &self,
        footprints: &[Footprint],
        zones: &mut [Zone],
        index: &ZoneIndex,
        dependencies: &mut ZoneDependencies,
    ) -> DistributionSummary {
        let eligible: Vec<usize> = zones
            .iter()
            .enumerate()
            .filter(|(_, zone)| zone.recalculate_needed)
            .map(|(slot, _)| slot)
            .collect();

        let mut summary = DistributionSummary {
            eligible_zones: eligible.len(),
            ..DistributionSummary::default()
        };

        for &slot in &eligible {
            zones[slot].stats.clear();
        }

        for footprint in footprints {
            let matched: SmallVec<[usize; 8]> = index
                .query_radius(
                    footprint.centroid.y(),
                    footprint.centroid.x(),
                    footprint.radius,
                )
                .into_iter()
                .filter(|&slot| zones.get(slot).is_some_and(|zone| zone.recalculate_needed))
                .collect();

            match matched.len() {
                0 => {
                    log::trace!(
                        "Building {} reached no zone pending recalculation",
                        footprint.building_id
                    );
                    summary.dropped += 1;
                    continue;
                }
                1 => summary.single_zone += 1,
                _ => {
                    let ids: SmallVec<[&str; 8]> =
                        matched.iter().map(|&slot| zones[slot].id.as_str()).collect();
                    dependencies.add_group(ids.as_slice());
                    summary.shared += 1;
                }
            }

            let share = footprint.area / matched.len() as f64;
            for &slot in &matched {
                zones[slot]
                    .stats
                    .record(&footprint.category, footprint.height_class, share);
            }
        }

        for slot in eligible {
            zones[slot].recalculate_needed = false;
        }

        summary
    }
}
