//! Spatial indexing over zone bounding boxes.

pub mod rtree;
pub use rtree::{IndexedZone, ZoneIndex};
