//! Footprint area and influence radius calculations.

use crate::config::Config;
use geo::ChamberlainDuquetteArea;
use zonestat_types::Building;

/// Meters per degree of latitude used for radius-to-degree conversion.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Floor area of a building in square meters: outline area times levels.
///
/// The outline area uses the Chamberlain-Duquette algorithm, which assumes a
/// spherical Earth and is accurate enough for building-sized polygons.
///
/// # Examples
///
/// ```rust
/// use geo::coord;
/// use zonestat::compute::geometry::floor_area;
/// use zonestat_types::Building;
///
/// let outline = vec![
///     coord! { x: 0.0, y: 0.0 },
///     coord! { x: 0.001, y: 0.0 },
///     coord! { x: 0.001, y: 0.001 },
///     coord! { x: 0.0, y: 0.001 },
/// ];
/// let one = Building::from_outline(1, "other", outline.clone(), Some(1), None).unwrap();
/// let four = Building::from_outline(2, "other", outline, Some(4), None).unwrap();
///
/// assert!(floor_area(&one) > 12_000.0);
/// assert!((floor_area(&four) - 4.0 * floor_area(&one)).abs() < 1e-6);
/// ```
pub fn floor_area(building: &Building) -> f64 {
    building.outline().chamberlain_duquette_unsigned_area() * f64::from(building.levels())
}

/// Influence radius in meters.
///
/// `base_radius + sqrt(area) * extra_radius_kf * base_area_kf`, capped at
/// `config.max_radius`.
pub fn influence_radius(area: f64, extra_radius_kf: f64, config: &Config) -> f64 {
    let radius = config.base_radius + area.max(0.0).sqrt() * extra_radius_kf * config.base_area_kf;
    radius.min(config.max_radius)
}

/// Half-extents in degrees `(lat, lon)` of the rectangle approximating a
/// circle of `radius` meters around `latitude`.
///
/// Longitude degrees shrink with `cos(latitude)`; the cosine is clamped so
/// queries near the poles stay finite.
pub fn radius_to_degrees(latitude: f64, radius: f64) -> (f64, f64) {
    let lat_degrees = radius / METERS_PER_DEGREE;
    let cos_lat = latitude.to_radians().cos().abs().max(1e-6);
    let lon_degrees = radius / (METERS_PER_DEGREE * cos_lat);
    (lat_degrees, lon_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influence_radius_formula() {
        let config = Config::default()
            .with_base_radius(50.0)
            .with_base_area_kf(2.0);
        let radius = influence_radius(400.0, 1.5, &config);
        assert!((radius - (50.0 + 20.0 * 1.5 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_influence_radius_is_capped() {
        let config = Config::default().with_max_radius(1000.0);
        assert_eq!(influence_radius(1.0e12, 1.0, &config), 1000.0);
    }

    #[test]
    fn test_radius_degrees_scale_with_latitude() {
        let (lat_eq, lon_eq) = radius_to_degrees(0.0, 1110.0);
        assert!((lat_eq - 0.01).abs() < 1e-12);
        assert!((lon_eq - 0.01).abs() < 1e-9);

        let (lat_60, lon_60) = radius_to_degrees(60.0, 1110.0);
        assert_eq!(lat_60, lat_eq);
        assert!((lon_60 - 0.02).abs() < 1e-9);

        let (_, lon_pole) = radius_to_degrees(90.0, 1110.0);
        assert!(lon_pole.is_finite());
    }
}
