use geo::{Rect, coord};
use serde::{Deserialize, Serialize};

/// Area of interest handed to a zone store, in degrees.
///
/// ```
/// use zonestat_types::GeoBounds;
///
/// let bounds = GeoBounds::new(13.4, 52.2, 13.0, 52.0);
/// assert_eq!(bounds.min_lon(), 13.0);
/// assert!((bounds.height() - 0.2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    rect: Rect,
}

impl GeoBounds {
    /// Corners may be given in any order.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            rect: Rect::new(
                coord! { x: min_lon, y: min_lat },
                coord! { x: max_lon, y: max_lat },
            ),
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_lon(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Touching edges count as intersecting.
    pub fn intersects_rect(&self, other: &Rect) -> bool {
        self.min_lon() <= other.max().x
            && other.min().x <= self.max_lon()
            && self.min_lat() <= other.max().y
            && other.min().y <= self.max_lat()
    }
}
