//! Quadrant subdivision of a zone.

use geo::Coord;
use zonestat_types::{Zone, ZoneCorners};

/// One of the four children produced by a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Suffix appended to the parent ID.
    pub fn tag(&self) -> &'static str {
        match self {
            Quadrant::TopLeft => "tl",
            Quadrant::TopRight => "tr",
            Quadrant::BottomLeft => "bl",
            Quadrant::BottomRight => "br",
        }
    }
}

/// ID of the child zone in `quadrant`.
pub fn child_id(parent_id: &str, quadrant: Quadrant) -> String {
    format!("{}_{}", parent_id, quadrant.tag())
}

/// Corners of one quadrant of `corners`.
///
/// `mid_lat` is halfway down the western edge and `mid_lon` halfway along the
/// northern edge. Each child combines parent corners with these midpoints.
pub fn quadrant_corners(corners: &ZoneCorners, quadrant: Quadrant) -> ZoneCorners {
    let ZoneCorners {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    } = *corners;
    let mid_lat = (top_left.y + bottom_left.y) / 2.0;
    let mid_lon = (top_left.x + top_right.x) / 2.0;
    let at = |x: f64, y: f64| Coord { x, y };

    match quadrant {
        Quadrant::TopLeft => ZoneCorners::new(
            top_left,
            at(mid_lon, top_left.y),
            at(top_left.x, mid_lat),
            at(mid_lon, mid_lat),
        ),
        Quadrant::TopRight => ZoneCorners::new(
            at(mid_lon, top_right.y),
            top_right,
            at(mid_lon, mid_lat),
            at(top_right.x, mid_lat),
        ),
        Quadrant::BottomLeft => ZoneCorners::new(
            at(bottom_left.x, mid_lat),
            at(mid_lon, mid_lat),
            bottom_left,
            at(mid_lon, bottom_left.y),
        ),
        Quadrant::BottomRight => ZoneCorners::new(
            at(mid_lon, mid_lat),
            at(bottom_right.x, mid_lat),
            at(mid_lon, bottom_right.y),
            bottom_right,
        ),
    }
}

/// Split a zone into its four quadrant children.
///
/// Children have empty stats and are flagged for recalculation. Buildings are
/// not reassigned here; the next distribution pass picks the children up.
///
/// # Examples
///
/// ```rust
/// use zonestat::subdivision::split_into_four;
/// use zonestat_types::{Zone, ZoneCorners};
///
/// let parent = Zone::new("z", ZoneCorners::from_bounds(0.0, 0.0, 2.0, 2.0));
/// let children = split_into_four(&parent);
///
/// assert_eq!(children[0].id, "z_tl");
/// assert_eq!(children[3].corners.top_left.x, 1.0);
/// assert!(children.iter().all(|c| c.recalculate_needed && c.stats.is_empty()));
/// ```
pub fn split_into_four(zone: &Zone) -> [Zone; 4] {
    Quadrant::ALL.map(|quadrant| {
        Zone::new(
            child_id(&zone.id, quadrant),
            quadrant_corners(&zone.corners, quadrant),
        )
    })
}
