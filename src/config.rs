//! Run configuration for the subdivision engine.
//!
//! Threshold and radius constants are read once at startup and passed by
//! reference into the engine. The type is serializable so it can be loaded
//! from JSON, or TOML with the `toml` feature.

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Subdivision constants.
///
/// # Example
///
/// ```rust
/// use zonestat::Config;
///
/// let config = Config::default();
/// assert_eq!(config.max_iterations, 50);
///
/// let json = r#"{
///     "weight_threshold": 20000.0,
///     "base_radius": 30.0
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.weight_threshold, 20000.0);
/// assert_eq!(config.max_radius, 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Zones whose weight is strictly greater than this are split
    #[serde(default = "Config::default_weight_threshold")]
    pub weight_threshold: f64,

    /// Constant part of a building's influence radius, in meters
    #[serde(default = "Config::default_base_radius")]
    pub base_radius: f64,

    /// Multiplier applied to `sqrt(area) * extra_radius_kf`
    #[serde(default = "Config::default_base_area_kf")]
    pub base_area_kf: f64,

    /// Upper bound on the influence radius, in meters
    #[serde(default = "Config::default_max_radius")]
    pub max_radius: f64,

    /// Hard cap on subdivision iterations
    #[serde(default = "Config::default_max_iterations")]
    pub max_iterations: usize,
}

impl Config {
    const fn default_weight_threshold() -> f64 {
        50_000.0
    }

    const fn default_base_radius() -> f64 {
        50.0
    }

    const fn default_base_area_kf() -> f64 {
        1.0
    }

    const fn default_max_radius() -> f64 {
        1000.0
    }

    const fn default_max_iterations() -> usize {
        50
    }

    pub fn with_weight_threshold(mut self, threshold: f64) -> Self {
        self.weight_threshold = threshold;
        self
    }

    pub fn with_base_radius(mut self, meters: f64) -> Self {
        self.base_radius = meters;
        self
    }

    pub fn with_base_area_kf(mut self, kf: f64) -> Self {
        self.base_area_kf = kf;
        self
    }

    pub fn with_max_radius(mut self, meters: f64) -> Self {
        self.max_radius = meters;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.weight_threshold.is_finite() || self.weight_threshold <= 0.0 {
            return Err(format!(
                "Weight threshold must be finite and positive, got: {}",
                self.weight_threshold
            ));
        }

        for (name, value) in [
            ("Base radius", self.base_radius),
            ("Base area coefficient", self.base_area_kf),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{} must be finite and non-negative, got: {}",
                    name, value
                ));
            }
        }

        if !self.max_radius.is_finite() || self.max_radius <= 0.0 {
            return Err(format!(
                "Max radius must be finite and positive, got: {}",
                self.max_radius
            ));
        }

        if self.max_iterations == 0 {
            return Err("Max iterations must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weight_threshold: Self::default_weight_threshold(),
            base_radius: Self::default_base_radius(),
            base_area_kf: Self::default_base_area_kf(),
            max_radius: Self::default_max_radius(),
            max_iterations: Self::default_max_iterations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(
            Config::default()
                .with_weight_threshold(0.0)
                .validate()
                .is_err()
        );
        assert!(
            Config::default()
                .with_weight_threshold(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(Config::default().with_base_radius(-1.0).validate().is_err());
        assert!(Config::default().with_max_radius(0.0).validate().is_err());
        assert!(Config::default().with_max_iterations(0).validate().is_err());
        assert!(Config::default().with_base_area_kf(0.0).validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_and_rejection() {
        let config = Config::default().with_max_iterations(7);
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);

        assert!(Config::from_json(r#"{"max_iterations": 0}"#).is_err());
        assert!(Config::from_json(r#"{"weight_threshold": -5.0}"#).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_config() {
        let config = Config::from_toml("weight_threshold = 1000.0\nmax_iterations = 3\n").unwrap();
        assert_eq!(config.weight_threshold, 1000.0);
        assert_eq!(config.max_iterations, 3);
        assert!(Config::to_toml(&config).unwrap().contains("max_radius"));
    }
}
