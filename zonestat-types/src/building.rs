use geo::{BoundingRect, Centroid, Coord, LineString, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Height bucket of a building, derived from its level count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightClass {
    /// One level or fewer
    SingleFloor,
    /// 2 to 9 levels
    LowRise,
    /// 10 to 29 levels
    HighRise,
    /// 30 levels and up
    Skyscraper,
}

impl HeightClass {
    pub const ALL: [HeightClass; 4] = [
        HeightClass::SingleFloor,
        HeightClass::LowRise,
        HeightClass::HighRise,
        HeightClass::Skyscraper,
    ];

    /// Bucket a level count.
    ///
    /// # Examples
    ///
    /// ```
    /// use zonestat_types::building::HeightClass;
    ///
    /// assert_eq!(HeightClass::from_levels(1), HeightClass::SingleFloor);
    /// assert_eq!(HeightClass::from_levels(9), HeightClass::LowRise);
    /// assert_eq!(HeightClass::from_levels(10), HeightClass::HighRise);
    /// assert_eq!(HeightClass::from_levels(30), HeightClass::Skyscraper);
    /// ```
    pub fn from_levels(levels: u32) -> Self {
        match levels {
            0..=1 => HeightClass::SingleFloor,
            2..=9 => HeightClass::LowRise,
            10..=29 => HeightClass::HighRise,
            _ => HeightClass::Skyscraper,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeightClass::SingleFloor => "single_floor",
            HeightClass::LowRise => "low_rise",
            HeightClass::HighRise => "high_rise",
            HeightClass::Skyscraper => "skyscraper",
        }
    }
}

/// An immutable building footprint.
///
/// Buildings are produced once by the ingestion layer and stay read-only for
/// the whole subdivision run. The bounding box and centroid are derived from
/// the outline at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: u64,
    /// Normalized category name
    pub category: String,
    outline: Polygon<f64>,
    bounds: Rect<f64>,
    centroid: Point<f64>,
    levels: u32,
    /// Height in meters, when the source provides one
    pub height: Option<f64>,
}

impl Building {
    /// Build a footprint from raw outline points.
    ///
    /// Non-finite points, consecutive duplicates and an explicit closing point
    /// are discarded. Returns `None` when fewer than three distinct points
    /// remain. A missing or zero level count is treated as one level.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::coord;
    /// use zonestat_types::building::Building;
    ///
    /// let square = vec![
    ///     coord! { x: 13.0, y: 52.0 },
    ///     coord! { x: 13.001, y: 52.0 },
    ///     coord! { x: 13.001, y: 52.001 },
    ///     coord! { x: 13.0, y: 52.001 },
    /// ];
    /// let building = Building::from_outline(7, "residential", square, Some(3), None).unwrap();
    /// assert_eq!(building.levels(), 3);
    ///
    /// let line = vec![coord! { x: 13.0, y: 52.0 }, coord! { x: 13.001, y: 52.0 }];
    /// assert!(Building::from_outline(8, "residential", line, None, None).is_none());
    /// ```
    pub fn from_outline<I>(
        id: u64,
        category: impl Into<String>,
        points: I,
        levels: Option<u32>,
        height: Option<f64>,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let mut ring: Vec<Coord<f64>> = Vec::new();
        for point in points {
            if !point.x.is_finite() || !point.y.is_finite() {
                continue;
            }
            if ring.last() != Some(&point) {
                ring.push(point);
            }
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if distinct_points(&ring) < 3 {
            return None;
        }

        let outline = Polygon::new(LineString::from(ring), Vec::new());
        let bounds = outline.bounding_rect()?;
        let centroid = outline
            .centroid()
            .unwrap_or_else(|| Point::from(bounds.center()));

        Some(Self {
            id,
            category: category.into(),
            outline,
            bounds,
            centroid,
            levels: levels.unwrap_or(1).max(1),
            height: height.filter(|h| h.is_finite()),
        })
    }

    /// Closed outline ring.
    pub fn outline(&self) -> &Polygon<f64> {
        &self.outline
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    pub fn centroid(&self) -> Point<f64> {
        self.centroid
    }

    /// Level count, always at least one.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    pub fn height_class(&self) -> HeightClass {
        HeightClass::from_levels(self.levels)
    }
}

/// Number of distinct coordinates; all inputs are finite.
fn distinct_points(ring: &[Coord<f64>]) -> usize {
    let mut sorted = ring.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn square() -> Vec<Coord<f64>> {
        vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 0.0, y: 1.0 },
        ]
    }

    #[test]
    fn test_outline_is_closed() {
        let building = Building::from_outline(1, "other", square(), None, None).unwrap();
        let ring = building.outline().exterior();
        assert!(ring.is_closed());
        assert_eq!(ring.0.len(), 5);
    }

    #[test]
    fn test_explicit_closing_point_is_not_counted() {
        let mut points = square();
        points.truncate(2);
        points.push(coord! { x: 0.0, y: 0.0 });
        assert!(Building::from_outline(1, "other", points, None, None).is_none());
    }

    #[test]
    fn test_repeated_points_do_not_count_as_distinct() {
        let a = coord! { x: 0.0, y: 0.0 };
        let b = coord! { x: 1.0, y: 0.0 };
        assert!(Building::from_outline(1, "other", vec![a, b, a, b], Some(1), None).is_none());
        assert!(Building::from_outline(2, "other", vec![a, b, a, b, a], None, None).is_none());

        let c = coord! { x: 1.0, y: 1.0 };
        assert!(Building::from_outline(3, "other", vec![a, b, a, c], None, None).is_some());
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut points = square();
        points.insert(2, coord! { x: f64::NAN, y: 0.5 });
        let building = Building::from_outline(1, "other", points, None, None).unwrap();
        assert_eq!(building.outline().exterior().0.len(), 5);

        let broken = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: f64::INFINITY, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
        ];
        assert!(Building::from_outline(2, "other", broken, None, None).is_none());
    }

    #[test]
    fn test_derived_fields() {
        let building = Building::from_outline(1, "office", square(), Some(0), Some(12.0)).unwrap();
        assert_eq!(building.levels(), 1);
        assert_eq!(building.height_class(), HeightClass::SingleFloor);
        assert_eq!(building.height, Some(12.0));
        assert!((building.centroid().x() - 0.5).abs() < 1e-12);
        assert!((building.centroid().y() - 0.5).abs() < 1e-12);
        assert_eq!(building.bounds().max().x, 1.0);
    }

    #[test]
    fn test_height_class_boundaries() {
        assert_eq!(HeightClass::from_levels(0), HeightClass::SingleFloor);
        assert_eq!(HeightClass::from_levels(2), HeightClass::LowRise);
        assert_eq!(HeightClass::from_levels(29), HeightClass::HighRise);
        assert_eq!(HeightClass::from_levels(u32::MAX), HeightClass::Skyscraper);
    }
}
