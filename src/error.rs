//! Error taxonomy for the lift service.
//!
//! User-input problems (bad floor label, bad direction), lookup misses and
//! fleet-wide unavailability get their own variants so the boundary can map
//! them to distinct responses. Adapter-level failures (file IO, record
//! codecs) are wrapped via `From` so they travel through `?` unchanged.

use std::fmt;

/// All errors surfaced by the dispatch core, the movement engine and the
/// store adapters.
#[derive(Debug)]
pub enum LiftError {
    /// A floor label that does not exist in the building table. User input
    /// error, surfaced to the caller, never retried.
    InvalidFloorLabel(String),
    /// A hall-call direction other than UP or DOWN.
    InvalidDirection(String),
    /// A destination outside the building's floor range.
    FloorOutOfRange(String),
    /// A referenced car id that is not in the roster.
    CarNotFound(String),
    /// The roster is empty.
    NoCarsAvailable,
    /// The roster is populated but no candidate could be chosen.
    NoSuitableCar,
    /// Another process currently holds the engine lease.
    LeaseHeld(String),
    /// A persisted car record failed validation on read.
    BadRecord(String),
    /// Filesystem failure in the durable store or the lease file.
    Io(std::io::Error),
    /// JSON codec failure on a car record or the roster file.
    Encoding(serde_json::Error),
    /// Binary codec failure on a fleet snapshot frame.
    Frame(bincode::Error),
}

impl fmt::Display for LiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiftError::InvalidFloorLabel(label) => write!(f, "invalid floor: {}", label),
            LiftError::InvalidDirection(dir) => write!(f, "invalid direction: {}", dir),
            LiftError::FloorOutOfRange(label) => write!(f, "floor out of range: {}", label),
            LiftError::CarNotFound(id) => write!(f, "car not found: {}", id),
            LiftError::NoCarsAvailable => write!(f, "no cars available"),
            LiftError::NoSuitableCar => write!(f, "no suitable car found"),
            LiftError::LeaseHeld(holder) => write!(f, "engine lease held by {}", holder),
            LiftError::BadRecord(detail) => write!(f, "bad car record: {}", detail),
            LiftError::Io(e) => write!(f, "io error: {}", e),
            LiftError::Encoding(e) => write!(f, "record encoding error: {}", e),
            LiftError::Frame(e) => write!(f, "snapshot frame error: {}", e),
        }
    }
}

impl std::error::Error for LiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LiftError::Io(e) => Some(e),
            LiftError::Encoding(e) => Some(e),
            LiftError::Frame(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LiftError {
    fn from(e: std::io::Error) -> Self {
        LiftError::Io(e)
    }
}

impl From<serde_json::Error> for LiftError {
    fn from(e: serde_json::Error) -> Self {
        LiftError::Encoding(e)
    }
}

impl From<bincode::Error> for LiftError {
    fn from(e: bincode::Error) -> Self {
        LiftError::Frame(e)
    }
}
