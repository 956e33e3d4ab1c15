use crate::building::HeightClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Building count and accumulated footprint area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub count: u64,
    /// Square meters (footprint area multiplied by level count)
    pub area: f64,
}

impl Tally {
    fn add(&mut self, area: f64) {
        self.count += 1;
        self.area += area;
    }
}

/// Aggregated building statistics owned by a single zone.
///
/// Every recorded building contributes to one category entry, one height
/// class entry and the grand total, so `total` always equals the sum over
/// either breakdown.
///
/// # Examples
///
/// ```
/// use zonestat_types::building::HeightClass;
/// use zonestat_types::stats::BuildingStats;
///
/// let mut stats = BuildingStats::default();
/// stats.record("residential", HeightClass::LowRise, 120.0);
/// stats.record("office", HeightClass::HighRise, 800.0);
///
/// assert_eq!(stats.total.count, 2);
/// assert_eq!(stats.area_of("office"), 800.0);
/// assert!(stats.is_consistent(1e-9));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    #[serde(default)]
    pub by_category: BTreeMap<String, Tally>,
    #[serde(default)]
    pub by_height: BTreeMap<HeightClass, Tally>,
    #[serde(default)]
    pub total: Tally,
}

impl BuildingStats {
    /// Record one building (or its share of one) in all three aggregates.
    pub fn record(&mut self, category: &str, class: HeightClass, area: f64) {
        match self.by_category.get_mut(category) {
            Some(tally) => tally.add(area),
            None => {
                let mut tally = Tally::default();
                tally.add(area);
                self.by_category.insert(category.to_string(), tally);
            }
        }
        self.by_height.entry(class).or_default().add(area);
        self.total.add(area);
    }

    /// Accumulated area for a category, zero when absent.
    pub fn area_of(&self, category: &str) -> f64 {
        self.by_category.get(category).map_or(0.0, |t| t.area)
    }

    pub fn count_of(&self, category: &str) -> u64 {
        self.by_category.get(category).map_or(0, |t| t.count)
    }

    pub fn height(&self, class: HeightClass) -> Tally {
        self.by_height.get(&class).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.total.count == 0 && self.by_category.is_empty() && self.by_height.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_category.clear();
        self.by_height.clear();
        self.total = Tally::default();
    }

    /// Check that the grand total matches both breakdowns.
    ///
    /// Areas are compared with an absolute tolerance, counts exactly.
    pub fn is_consistent(&self, epsilon: f64) -> bool {
        let (cat_count, cat_area) = sum_tallies(self.by_category.values());
        let (height_count, height_area) = sum_tallies(self.by_height.values());

        cat_count == self.total.count
            && height_count == self.total.count
            && (cat_area - self.total.area).abs() <= epsilon
            && (height_area - self.total.area).abs() <= epsilon
    }
}

fn sum_tallies<'a>(tallies: impl Iterator<Item = &'a Tally>) -> (u64, f64) {
    tallies.fold((0, 0.0), |(count, area), t| (count + t.count, area + t.area))
}
