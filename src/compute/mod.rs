//! Compute layer for geometry and indexing.
//!
//! This module separates the numeric and spatial work from the subdivision
//! control flow. It provides:
//! - Footprint area and influence radius calculations
//! - The zone R-tree index
//! - Geometry validation

pub mod geometry;
pub mod spatial;
pub mod validation;

pub use geometry::{floor_area, influence_radius, radius_to_degrees};
pub use spatial::ZoneIndex;
