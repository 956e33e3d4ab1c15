//! Category configuration lookup.
//!
//! Maps raw building types to normalized categories and normalized categories
//! to their weight, radius coefficient and gameplay effect deltas. The table is
//! loaded once at startup and passed by reference to the engine. A table that
//! fails to load degrades to defaults instead of aborting the run.

use crate::error::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Category every unmapped raw type falls into.
pub const OTHER_CATEGORY: &str = "other";

/// Weight used for categories without an entry.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Radius coefficient used for categories without an entry.
pub const DEFAULT_EXTRA_RADIUS_KF: f64 = 1.0;

/// Settings for a single normalized category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEffects {
    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default = "default_extra_radius_kf")]
    pub extra_radius_kf: f64,

    /// Per-effect deltas consumed by the runtime simulation
    #[serde(default)]
    pub effects: BTreeMap<String, f64>,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_extra_radius_kf() -> f64 {
    DEFAULT_EXTRA_RADIUS_KF
}

impl Default for CategoryEffects {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            extra_radius_kf: DEFAULT_EXTRA_RADIUS_KF,
            effects: BTreeMap::new(),
        }
    }
}

/// Read-only category lookup table.
///
/// # Example
///
/// ```rust
/// use zonestat::CategoryConfig;
///
/// let json = r#"{
///     "categories": {
///         "residential": { "weight": 1.5, "extra_radius_kf": 0.5 }
///     },
///     "raw_types": { "apartments": "residential", "house": "residential" }
/// }"#;
/// let categories = CategoryConfig::from_json(json).unwrap();
///
/// assert_eq!(categories.map_raw_category("Apartments"), "residential");
/// assert_eq!(categories.map_raw_category("hangar"), "other");
/// assert_eq!(categories.weight("residential"), 1.5);
/// assert_eq!(categories.weight("other"), 1.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    categories: FxHashMap<String, CategoryEffects>,

    #[serde(default)]
    raw_types: FxHashMap<String, String>,

    #[serde(skip)]
    degraded: bool,
}

impl CategoryConfig {
    /// Parse a category table, normalizing all keys.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: CategoryConfig = serde_json::from_str(json)?;
        Ok(parsed.normalized())
    }

    /// Load a category table from disk.
    ///
    /// Never fails: an unreadable or malformed file is logged and replaced by
    /// the degraded default, where every category weighs 1 and uses a radius
    /// coefficient of 1.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(crate::error::ZoneError::from)
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(config) => {
                log::info!(
                    "Loaded {} categories and {} raw type mappings from {}",
                    config.categories.len(),
                    config.raw_types.len(),
                    path.display()
                );
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load category config from {}: {}; using default weights",
                    path.display(),
                    e
                );
                Self::degraded()
            }
        }
    }

    /// Empty table flagged as degraded.
    pub fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    /// True when the table is a fallback for a failed load.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn insert_category(&mut self, category: &str, effects: CategoryEffects) {
        self.categories.insert(normalize(category), effects);
    }

    pub fn insert_raw_type(&mut self, raw_type: &str, category: &str) {
        self.raw_types.insert(normalize(raw_type), normalize(category));
    }

    /// Normalized category for a raw type.
    ///
    /// Raw types are trimmed and lowercased before lookup. A raw type that is
    /// already a known category name maps to itself; anything else unmapped
    /// becomes `"other"`.
    pub fn map_raw_category(&self, raw_type: &str) -> String {
        let key = normalize(raw_type);
        if let Some(category) = self.raw_types.get(&key) {
            return category.clone();
        }
        if self.categories.contains_key(&key) {
            return key;
        }
        OTHER_CATEGORY.to_string()
    }

    /// Settings for a normalized category, `None` when unmapped.
    pub fn effects_config(&self, category: &str) -> Option<&CategoryEffects> {
        self.categories.get(category)
    }

    /// Weight of a normalized category, 1 when unmapped.
    pub fn weight(&self, category: &str) -> f64 {
        self.effects_config(category)
            .map_or(DEFAULT_WEIGHT, |effects| effects.weight)
    }

    /// Radius coefficient of a normalized category, 1 when unmapped.
    pub fn extra_radius_kf(&self, category: &str) -> f64 {
        self.effects_config(category)
            .map_or(DEFAULT_EXTRA_RADIUS_KF, |effects| effects.extra_radius_kf)
    }

    fn normalized(self) -> Self {
        let categories = self
            .categories
            .into_iter()
            .map(|(name, effects)| (normalize(&name), effects))
            .collect();
        let raw_types = self
            .raw_types
            .into_iter()
            .map(|(raw, category)| (normalize(&raw), normalize(&category)))
            .collect();
        Self {
            categories,
            raw_types,
            degraded: false,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
