//! Adaptive zone subdivision with building-statistics aggregation.
//!
//! A geographic area is partitioned into quadrilateral zones. Each building
//! contributes its floor area to every zone within its influence radius, and
//! any zone whose weighted area exceeds a threshold is split into four until
//! the partition reaches a fixed point.
//!
//! ```rust
//! use zonestat::prelude::*;
//!
//! let config = Config::default();
//! let categories = CategoryConfig::default();
//!
//! let mut store = MemoryZoneStore::with_zones(initial_grid(
//!     &GeoBounds::new(13.0, 52.0, 13.2, 52.1),
//!     2,
//!     2,
//! ));
//! let zones = store.load_initial_zones(&GeoBounds::new(13.0, 52.0, 13.2, 52.1))?;
//!
//! let outcome = SubdivisionEngine::new(&config, &categories).run(zones, &[])?;
//! persist_outcome(&mut store, &outcome)?;
//! assert_eq!(store.stats()?.zone_count, 4);
//! # Ok::<(), zonestat::ZoneError>(())
//! ```

pub mod category;
pub mod compute;
pub mod config;
pub mod error;
pub mod ingest;
pub mod storage;
pub mod subdivision;

#[cfg(feature = "geojson")]
pub mod export;

pub use category::{CategoryConfig, CategoryEffects};
pub use compute::spatial::ZoneIndex;
pub use config::Config;
pub use error::{Result, ZoneError};
pub use storage::{
    MemoryZoneStore, StoreStats, ZoneStore, initial_grid, persist_outcome, persist_zones,
};
pub use subdivision::{
    DistributionEngine, IterationReport, SubdivisionEngine, SubdivisionOutcome, ZoneBackup,
    ZoneDependencies, split_into_four, zone_weight,
};

#[cfg(feature = "snapshot")]
pub use storage::SnapshotZoneStore;

pub use zonestat_types::{
    Building, BuildingStats, GeoBounds, HeightClass, Tally, Zone, ZoneCorners, ZoneGeometry,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, Result, ZoneError};

    pub use crate::{CategoryConfig, SubdivisionEngine, SubdivisionOutcome};

    pub use crate::{MemoryZoneStore, ZoneStore, initial_grid, persist_outcome, persist_zones};

    #[cfg(feature = "snapshot")]
    pub use crate::SnapshotZoneStore;

    pub use crate::{Building, GeoBounds, Zone, ZoneCorners};

    pub use std::ops::ControlFlow;
}
