//! # zonestat-types
//!
//! Core data types shared by the zonestat subdivision engine and its
//! persistence and export layers.
//!
//! - **Buildings**: `Building`, `HeightClass`
//! - **Aggregates**: `BuildingStats`, `Tally`
//! - **Zones**: `Zone`, `ZoneCorners`, `ZoneGeometry`
//! - **Bounds**: `GeoBounds`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Coordinates follow the `geo` convention: `x` is
//! longitude and `y` is latitude.
//!
//! ## Examples
//!
//! ```rust
//! use zonestat_types::zone::{Zone, ZoneCorners};
//!
//! let corners = ZoneCorners::from_bounds(13.30, 52.50, 13.40, 52.55);
//! let mut zone = Zone::new("berlin-mitte", corners);
//! assert!(zone.recalculate_needed);
//! assert!(zone.prepare().is_some());
//! ```

pub mod bounds;
pub mod building;
pub mod stats;
pub mod zone;

pub use bounds::GeoBounds;
pub use building::{Building, HeightClass};
pub use stats::{BuildingStats, Tally};
pub use zone::{Zone, ZoneCorners, ZoneGeometry};
