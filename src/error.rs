//! Error types for zonestat.

use zonestat_types::Zone;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ZoneError>;

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Zone corners cannot be turned into a usable polygon. This points at
    /// corrupted partition state.
    #[error("zone '{zone_id}' has degenerate geometry: {reason}")]
    DegenerateZone { zone_id: String, reason: String },

    #[error("duplicate zone id '{0}'")]
    DuplicateZoneId(String),

    #[error("zone '{0}' not found")]
    ZoneNotFound(String),

    /// The overweight set never emptied. Carries the partial result so the
    /// caller can decide whether to persist or discard it.
    #[error(
        "subdivision did not converge after {iterations} iterations ({} zones pending deletion)",
        .pending_deletion.len()
    )]
    ConvergenceFailed {
        iterations: usize,
        pending_deletion: Vec<String>,
        zones: Vec<Zone>,
    },

    #[error("subdivision cancelled after iteration {iteration}")]
    Cancelled { iteration: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid snapshot format")]
    InvalidFormat,
}

impl From<serde_json::Error> for ZoneError {
    fn from(err: serde_json::Error) -> Self {
        ZoneError::Serialization(err.to_string())
    }
}

#[cfg(feature = "snapshot")]
impl From<bincode::Error> for ZoneError {
    fn from(err: bincode::Error) -> Self {
        ZoneError::Serialization(err.to_string())
    }
}
