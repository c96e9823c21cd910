//! ## Fleet Module
//!
//! This module defines the central data structures for the building's car
//! fleet. It contains the [`CarState`] struct, the authoritative record for
//! one car that the dispatch path and the movement engine both read and
//! write, plus the enums describing direction and operational status.
//!
//! ### Key Responsibilities:
//! - **Defining Core Structs**: [`CarState`] and [`Stop`] store per-car
//!   state and the ordered stop schedule.
//! - **Handling Directions and Status**: The [`Direction`] and [`CarStatus`]
//!   enums define movement direction and operational state.
//! - **Snapshot Distribution**: [`get_fleet`] / [`update_fleet`] read the
//!   fleet snapshot the engine publishes on a watch channel.
//!
//! Validated wire codecs for car records and fleet snapshot frames live in
//! [`serial`].

pub mod serial;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::LiftError;

/// Direction a car is taking calls in.
///
/// `Idle` is both the initial state and the terminal state of every service
/// cycle: a car re-enters it whenever its stop queue empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Travelling toward higher ordinals.
    Up,
    /// Travelling toward lower ordinals.
    Down,
    /// No committed direction; the stop queue is empty.
    Idle,
}

impl Direction {
    /// Parses a hall-call direction. Only UP and DOWN are valid here; a
    /// hall call cannot ask for IDLE.
    pub fn parse_hall(input: &str) -> Result<Direction, LiftError> {
        match input.trim().to_uppercase().as_str() {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(LiftError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
            Direction::Idle => write!(f, "IDLE"),
        }
    }
}

/// Operational status of a car. Persisted and displayed; dispatch does not
/// consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarStatus {
    /// Serving traffic.
    InService,
    /// Parked for maintenance; still part of the roster.
    OutOfService,
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarStatus::InService => write!(f, "IN_SERVICE"),
            CarStatus::OutOfService => write!(f, "OUT_OF_SERVICE"),
        }
    }
}

/// One pending stop in a car's schedule.
///
/// Hall calls carry the requested travel direction; in-cabin destinations
/// carry none. The direction matters to dispatch (an already-served check
/// matches on floor AND direction) and to the cost of joining a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    /// Floor ordinal of the stop.
    pub floor: u8,
    /// Requested travel direction for hall calls; `None` for in-cabin
    /// destinations.
    pub direction: Option<Direction>,
}

impl Stop {
    /// Stop created by a hall call.
    pub fn hall(floor: u8, direction: Direction) -> Stop {
        Stop {
            floor,
            direction: Some(direction),
        }
    }

    /// Stop created from inside the cabin.
    pub fn cabin(floor: u8) -> Stop {
        Stop {
            floor,
            direction: None,
        }
    }
}

/// The authoritative record for one car.
///
/// Owned by the car store; the dispatch path and the movement engine never
/// hold a private copy across a mutation. The insertion order of
/// `next_stops` IS the visiting order — the schedule is maintained on write,
/// not sorted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    /// Stable car identifier, immutable.
    pub id: String,

    /// Current floor ordinal.
    /// Mutated only by the movement engine (on arrival) and by reset.
    pub current_floor: u8,

    /// Committed travel direction.
    /// Default: [Direction::Idle]
    pub direction: Direction,

    /// Operational status.
    /// Default: [CarStatus::InService]
    pub status: CarStatus,

    /// Ordered stop schedule. Never contains two entries with the same
    /// floor; empty implies `direction == Idle`.
    pub next_stops: Vec<Stop>,

    /// Milliseconds since epoch of the last write.
    pub updated_at: u64,
}

impl CarState {
    /// A fresh idle car at `floor` with an empty schedule.
    pub fn new(id: &str, floor: u8) -> CarState {
        CarState {
            id: id.to_string(),
            current_floor: floor,
            direction: Direction::Idle,
            status: CarStatus::InService,
            next_stops: Vec::new(),
            updated_at: now_millis(),
        }
    }

    /// `true` when any queued stop is at `floor`, irrespective of its
    /// recorded direction.
    pub fn has_stop_at(&self, floor: u8) -> bool {
        self.next_stops.iter().any(|s| s.floor == floor)
    }

    /// `true` when the schedule holds a hall stop at exactly
    /// `{floor, direction}` — the already-served predicate.
    pub fn has_hall_stop(&self, floor: u8, direction: Direction) -> bool {
        self.next_stops
            .iter()
            .any(|s| s.floor == floor && s.direction == Some(direction))
    }

    /// Floors of all queued stops, in schedule order.
    pub fn stop_floors(&self) -> impl Iterator<Item = u8> + '_ {
        self.next_stops.iter().map(|s| s.floor)
    }

    /// Refreshes `updated_at`. Called by every mutating helper.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Fetches a clone of the latest fleet snapshot from the engine's watch
/// channel.
pub fn get_fleet(fleet_watch_rx: watch::Receiver<Vec<CarState>>) -> Vec<CarState> {
    fleet_watch_rx.borrow().clone()
}

/// Refreshes `fleet` from the watch channel if the snapshot has changed.
///
/// ## Returns
/// - `true` if `fleet` was updated, `false` otherwise.
pub async fn update_fleet(
    fleet_watch_rx: watch::Receiver<Vec<CarState>>,
    fleet: &mut Vec<CarState>,
) -> bool {
    let new_fleet = fleet_watch_rx.borrow().clone();
    if new_fleet != *fleet {
        *fleet = new_fleet;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hall_direction_parsing_accepts_only_up_and_down() {
        assert_eq!(Direction::parse_hall(" up ").unwrap(), Direction::Up);
        assert_eq!(Direction::parse_hall("DOWN").unwrap(), Direction::Down);
        assert!(matches!(
            Direction::parse_hall("IDLE"),
            Err(LiftError::InvalidDirection(_))
        ));
        assert!(matches!(
            Direction::parse_hall("sideways"),
            Err(LiftError::InvalidDirection(_))
        ));
    }

    #[test]
    fn a_new_car_is_idle_and_empty() {
        let car = CarState::new("l1", 4);
        assert_eq!(car.current_floor, 4);
        assert_eq!(car.direction, Direction::Idle);
        assert_eq!(car.status, CarStatus::InService);
        assert!(car.next_stops.is_empty());
    }

    #[test]
    fn stop_lookups_distinguish_floor_and_direction() {
        let mut car = CarState::new("l1", 1);
        car.next_stops.push(Stop::hall(7, Direction::Up));
        car.next_stops.push(Stop::cabin(3));

        assert!(car.has_stop_at(7));
        assert!(car.has_stop_at(3));
        assert!(!car.has_stop_at(5));

        assert!(car.has_hall_stop(7, Direction::Up));
        assert!(!car.has_hall_stop(7, Direction::Down));
        // A cabin stop never satisfies the already-served predicate.
        assert!(!car.has_hall_stop(3, Direction::Up));
    }

    #[test]
    fn touch_moves_the_timestamp_forward() {
        let mut car = CarState::new("l1", 1);
        car.updated_at = 0;
        car.touch();
        assert!(car.updated_at > 0);
    }

    #[tokio::test]
    async fn update_fleet_reports_changes_once() {
        let (tx, rx) = watch::channel(vec![CarState::new("l1", 1)]);
        let mut local = get_fleet(rx.clone());

        assert!(!update_fleet(rx.clone(), &mut local).await);

        tx.send(vec![CarState::new("l1", 2)]).expect("send snapshot");
        assert!(update_fleet(rx.clone(), &mut local).await);
        assert_eq!(local[0].current_floor, 2);
        assert!(!update_fleet(rx, &mut local).await);
    }
}
