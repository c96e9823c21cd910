//! Wire codecs for car records and fleet snapshots.
//!
//! Car records cross the durable-store boundary as JSON in the persisted
//! record shape; fleet snapshots cross the monitor feed as compact bincode
//! frames. Everything read back in is validated before it reaches the
//! scheduling core — a corrupt record surfaces [`LiftError::BadRecord`]
//! instead of leaking impossible state.

use crate::error::LiftError;
use crate::fleet::{CarState, Direction};
use crate::floor_map::FLOOR_MAP;

/// Serializes one car record to its JSON wire form.
pub fn serialize_car(car: &CarState) -> Result<String, LiftError> {
    Ok(serde_json::to_string(car)?)
}

/// Parses and validates one car record from its JSON wire form.
pub fn deserialize_car(raw: &str) -> Result<CarState, LiftError> {
    let car: CarState = serde_json::from_str(raw)?;
    validate_car(&car)?;
    Ok(car)
}

/// Structural validation applied to every record read from a wire form.
///
/// ## Steps
/// - the id must be non-empty,
/// - the current floor must lie inside the building range,
/// - every stop floor must lie inside the building range,
/// - no stop may carry an IDLE direction,
/// - no two stops may share a floor.
///
/// An IDLE car with a populated queue is NOT rejected here: the next
/// dispatch or movement pass normalizes it, the same way a live system
/// absorbs a half-written record.
pub fn validate_car(car: &CarState) -> Result<(), LiftError> {
    if car.id.is_empty() {
        return Err(LiftError::BadRecord("empty car id".to_string()));
    }
    if !FLOOR_MAP.in_range(car.current_floor) {
        return Err(LiftError::BadRecord(format!(
            "car {} at floor {} outside the building",
            car.id, car.current_floor
        )));
    }
    let mut seen: Vec<u8> = Vec::with_capacity(car.next_stops.len());
    for stop in &car.next_stops {
        if !FLOOR_MAP.in_range(stop.floor) {
            return Err(LiftError::BadRecord(format!(
                "car {} stop at floor {} outside the building",
                car.id, stop.floor
            )));
        }
        if stop.direction == Some(Direction::Idle) {
            return Err(LiftError::BadRecord(format!(
                "car {} stop at floor {} with IDLE direction",
                car.id, stop.floor
            )));
        }
        if seen.contains(&stop.floor) {
            return Err(LiftError::BadRecord(format!(
                "car {} has duplicate stop floor {}",
                car.id, stop.floor
            )));
        }
        seen.push(stop.floor);
    }
    Ok(())
}

/// Serializes a fleet snapshot to a bincode frame for the monitor feed.
pub fn serialize_fleet(fleet: &[CarState]) -> Result<Vec<u8>, LiftError> {
    Ok(bincode::serialize(fleet)?)
}

/// Parses and validates a fleet snapshot frame.
pub fn deserialize_fleet(frame: &[u8]) -> Result<Vec<CarState>, LiftError> {
    let fleet: Vec<CarState> = bincode::deserialize(frame)?;
    for car in &fleet {
        validate_car(car)?;
    }
    Ok(fleet)
}
