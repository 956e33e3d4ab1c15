use crate::stats::BuildingStats;
use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// The four corners of a zone quadrilateral.
///
/// Corners are lon/lat coordinates (`x` = longitude, `y` = latitude). "Top" is
/// the northern edge. The shape does not have to be a perfect rectangle in
/// projected space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCorners {
    pub top_left: Coord<f64>,
    pub top_right: Coord<f64>,
    pub bottom_left: Coord<f64>,
    pub bottom_right: Coord<f64>,
}

impl ZoneCorners {
    pub fn new(
        top_left: Coord<f64>,
        top_right: Coord<f64>,
        bottom_left: Coord<f64>,
        bottom_right: Coord<f64>,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Corners of an axis-aligned lon/lat rectangle.
    pub fn from_bounds(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            top_left: geo::coord! { x: min_lon, y: max_lat },
            top_right: geo::coord! { x: max_lon, y: max_lat },
            bottom_left: geo::coord! { x: min_lon, y: min_lat },
            bottom_right: geo::coord! { x: max_lon, y: min_lat },
        }
    }

    /// Corners in `[top_left, top_right, bottom_left, bottom_right]` order.
    pub fn to_array(&self) -> [Coord<f64>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array()
            .iter()
            .all(|c| c.x.is_finite() && c.y.is_finite())
    }

    /// Closed ring walking top-left, top-right, bottom-right, bottom-left.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                self.top_left,
                self.top_right,
                self.bottom_right,
                self.bottom_left,
                self.top_left,
            ]),
            Vec::new(),
        )
    }
}

/// Polygon and bounding box prepared from a zone's corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGeometry {
    pub polygon: Polygon<f64>,
    pub bounds: Rect<f64>,
}

impl ZoneGeometry {
    /// Prepare geometry, or `None` when the corners are non-finite or span
    /// no area along either axis.
    pub fn from_corners(corners: &ZoneCorners) -> Option<Self> {
        if !corners.is_finite() {
            return None;
        }
        let polygon = corners.to_polygon();
        let bounds = polygon.bounding_rect()?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        Some(Self { polygon, bounds })
    }
}

/// A partition cell carrying aggregated building statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub corners: ZoneCorners,
    #[serde(default)]
    pub stats: BuildingStats,
    /// Stats are stale and must be recomputed in the current iteration
    #[serde(default)]
    pub recalculate_needed: bool,
    #[serde(skip)]
    geometry: Option<ZoneGeometry>,
}

impl Zone {
    /// A fresh zone with empty stats, flagged for recalculation.
    pub fn new(id: impl Into<String>, corners: ZoneCorners) -> Self {
        Self {
            id: id.into(),
            corners,
            stats: BuildingStats::default(),
            recalculate_needed: true,
            geometry: None,
        }
    }

    /// Cached geometry, if it has been prepared.
    pub fn geometry(&self) -> Option<&ZoneGeometry> {
        self.geometry.as_ref()
    }

    /// Prepare and cache the polygon and bounding box.
    ///
    /// Corners are never mutated after construction, so the cache is filled
    /// once and reused.
    pub fn prepare(&mut self) -> Option<&ZoneGeometry> {
        if self.geometry.is_none() {
            self.geometry = ZoneGeometry::from_corners(&self.corners);
        }
        self.geometry.as_ref()
    }

    /// Bounding box, computed on the fly when not cached.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match &self.geometry {
            Some(geometry) => Some(geometry.bounds),
            None => ZoneGeometry::from_corners(&self.corners).map(|g| g.bounds),
        }
    }
}
