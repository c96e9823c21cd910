//! ## Dispatch Engine
//!
//! Picks the best car for an incoming hall call. Candidates are scored in
//! three tiers — idle cars, cars already sweeping in the requested
//! direction, cars sweeping the opposite way — and the global cost minimum
//! across ALL tiers wins. A later tier can still beat an earlier one; the
//! tier order only decides ties, because the scan keeps the first cheapest
//! candidate it met.
//!
//! Costs are floor distances plus small policy penalties
//! ([`crate::config::STOP_PENALTY`], [`crate::config::WRONG_DIRECTION_PENALTY`]).
//! The weights are tunable; the tests in this module assert the relative
//! ordering of candidates, not absolute numbers.

use crate::config;
use crate::error::LiftError;
use crate::fleet::{CarState, Direction, Stop};
use crate::floor_map::FLOOR_MAP;
use crate::scheduling::stops;

/// A hall call: origin floor plus desired travel direction. Transient —
/// processed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallCall {
    /// Origin floor ordinal.
    pub floor: u8,
    /// Desired travel direction; UP or DOWN, never IDLE.
    pub direction: Direction,
}

/// Returns the car already scheduled to serve exactly `{floor, direction}`,
/// if any. Such a call needs no new assignment: the existing owner is
/// returned to the caller unchanged.
pub fn find_serving_car<'a>(cars: &'a [CarState], call: &HallCall) -> Option<&'a CarState> {
    cars.iter()
        .find(|car| car.has_hall_stop(call.floor, call.direction))
}

/// Selects the cheapest car for `call` across all three tiers.
///
/// ## Returns
/// - `Ok(&CarState)` — the winner; ties keep the first car encountered in
///   idle → same-direction → opposite-direction scan order.
/// - `Err(LiftError::NoCarsAvailable)` — the roster is empty.
/// - `Err(LiftError::NoSuitableCar)` — nothing could be scored.
/// - `Err(LiftError::InvalidDirection)` — the call direction is IDLE.
pub fn select_car<'a>(cars: &'a [CarState], call: &HallCall) -> Result<&'a CarState, LiftError> {
    if call.direction == Direction::Idle {
        return Err(LiftError::InvalidDirection(Direction::Idle.to_string()));
    }
    if cars.is_empty() {
        return Err(LiftError::NoCarsAvailable);
    }

    let mut best: Option<(&CarState, u32)> = None;

    // Idle cars: plain distance.
    for car in cars.iter().filter(|c| c.direction == Direction::Idle) {
        let cost = distance(car.current_floor, call.floor);
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((car, cost));
        }
    }

    // Cars already sweeping the requested direction.
    for car in cars.iter().filter(|c| c.direction == call.direction) {
        let cost = same_direction_cost(car, call);
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((car, cost));
        }
    }

    // Cars sweeping the opposite direction: finish their sweep first.
    let opposite = match call.direction {
        Direction::Up => Direction::Down,
        _ => Direction::Up,
    };
    for car in cars.iter().filter(|c| c.direction == opposite) {
        let cost = reversal_cost(car.current_floor, call.floor, &car.next_stops, car.direction);
        if best.map_or(true, |(_, c)| cost < c) {
            best = Some((car, cost));
        }
    }

    best.map(|(car, _)| car).ok_or(LiftError::NoSuitableCar)
}

/// Applies a won assignment to the car record.
///
/// Appends the hall stop unless the car is already at that floor or the
/// floor is already queued, commits an idle car toward the requested floor,
/// and re-orders the schedule for SCAN service.
pub fn enqueue_call(car: &mut CarState, call: &HallCall) {
    if car.current_floor != call.floor && !car.has_stop_at(call.floor) {
        car.next_stops.push(Stop::hall(call.floor, call.direction));
    }
    if car.direction == Direction::Idle && !car.next_stops.is_empty() {
        car.direction = stops::direction_toward(car.current_floor, call.floor);
    }
    if !car.next_stops.is_empty() {
        car.next_stops = stops::order_stops(&car.next_stops, car.current_floor, car.direction);
    }
    car.touch();
}

/// Cost for a car travelling the same direction as the request.
///
/// A car that has not yet passed the requested floor pays the sweep cost;
/// one that has passed it must complete its sweep and come back.
fn same_direction_cost(car: &CarState, call: &HallCall) -> u32 {
    let passed = match call.direction {
        Direction::Up => car.current_floor > call.floor,
        _ => car.current_floor < call.floor,
    };
    if passed {
        round_trip_cost(car.current_floor, call.floor, &car.next_stops, car.direction)
    } else {
        sweep_cost(
            car.current_floor,
            call.floor,
            &car.next_stops,
            call.direction,
            car.direction,
        )
    }
}

/// Cost of serving `target` as part of the car's current sweep:
/// distance to the sweep's finish point, distance from there to the target,
/// one [`config::STOP_PENALTY`] per committed same-direction stop still
/// ahead, and [`config::WRONG_DIRECTION_PENALTY`] when the car's committed
/// direction does not match the request. The mismatch penalty cannot fire
/// from the same-direction tier; it is kept because the function also
/// prices candidates whose commitment diverges from the request.
///
/// The finish point is the farthest not-yet-passed stop recorded with the
/// car's direction; with no such stop, the farthest stop overall.
fn sweep_cost(
    current: u8,
    target: u8,
    stops: &[Stop],
    requested: Direction,
    car_direction: Direction,
) -> u32 {
    if stops.is_empty() {
        return distance(current, target);
    }

    let (finish, committed_ahead) = match car_direction {
        Direction::Up => {
            let ahead: Vec<u8> = stops
                .iter()
                .filter(|s| s.direction == Some(Direction::Up) && s.floor >= current)
                .map(|s| s.floor)
                .collect();
            let finish = ahead
                .iter()
                .copied()
                .max()
                .or_else(|| stops.iter().map(|s| s.floor).max())
                .unwrap_or(current);
            (finish, ahead.len() as u32)
        }
        Direction::Down => {
            let ahead: Vec<u8> = stops
                .iter()
                .filter(|s| s.direction == Some(Direction::Down) && s.floor <= current)
                .map(|s| s.floor)
                .collect();
            let finish = ahead
                .iter()
                .copied()
                .min()
                .or_else(|| stops.iter().map(|s| s.floor).min())
                .unwrap_or(current);
            (finish, ahead.len() as u32)
        }
        Direction::Idle => (current, 0),
    };

    let mismatch = if car_direction != Direction::Idle && car_direction != requested {
        config::WRONG_DIRECTION_PENALTY
    } else {
        0
    };

    distance(current, finish)
        + distance(finish, target)
        + committed_ahead * config::STOP_PENALTY
        + mismatch
}

/// Round-trip cost for a car that already passed the requested floor: out
/// to the farthest committed stop, then back to the target. Falls back to
/// the current floor when the queue is empty, which a direction-committed
/// car never has in practice.
fn round_trip_cost(current: u8, target: u8, stops: &[Stop], car_direction: Direction) -> u32 {
    let turnaround = match car_direction {
        Direction::Up => stops.iter().map(|s| s.floor).max(),
        _ => stops.iter().map(|s| s.floor).min(),
    }
    .unwrap_or(current);
    distance(current, turnaround) + distance(turnaround, target)
}

/// Cost for a car sweeping away from the request: finish the current sweep
/// (out to the farthest committed stop, or the building extreme with an
/// empty queue), travel to the target, plus the reversal penalty.
fn reversal_cost(current: u8, target: u8, stops: &[Stop], car_direction: Direction) -> u32 {
    let finish = match car_direction {
        Direction::Up => stops
            .iter()
            .map(|s| s.floor)
            .max()
            .unwrap_or(FLOOR_MAP.max_ordinal()),
        _ => stops
            .iter()
            .map(|s| s.floor)
            .min()
            .unwrap_or(FLOOR_MAP.min_ordinal()),
    };
    distance(current, finish) + distance(finish, target) + config::WRONG_DIRECTION_PENALTY
}

fn distance(a: u8, b: u8) -> u32 {
    u32::from(a.abs_diff(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_car(id: &str, floor: u8) -> CarState {
        CarState::new(id, floor)
    }

    fn moving_car(id: &str, floor: u8, direction: Direction, stops: Vec<Stop>) -> CarState {
        let mut car = CarState::new(id, floor);
        car.direction = direction;
        car.next_stops = stops;
        car
    }

    fn call(floor: u8, direction: Direction) -> HallCall {
        HallCall { floor, direction }
    }

    #[test]
    fn empty_roster_reports_no_cars() {
        assert!(matches!(
            select_car(&[], &call(5, Direction::Up)),
            Err(LiftError::NoCarsAvailable)
        ));
    }

    #[test]
    fn idle_call_direction_is_rejected() {
        let cars = vec![idle_car("l1", 3)];
        assert!(matches!(
            select_car(&cars, &call(5, Direction::Idle)),
            Err(LiftError::InvalidDirection(_))
        ));
    }

    #[test]
    fn nearest_idle_car_wins_among_idles() {
        let cars = vec![idle_car("l1", 12), idle_car("l2", 6), idle_car("l3", 2)];
        let chosen = select_car(&cars, &call(5, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
    }

    #[test]
    fn equidistant_idle_cars_keep_the_first_scanned() {
        let cars = vec![idle_car("l1", 3), idle_car("l2", 7)];
        let chosen = select_car(&cars, &call(5, Direction::Down)).unwrap();
        assert_eq!(chosen.id, "l1");
    }

    #[test]
    fn already_serving_car_is_found_before_any_scoring() {
        let cars = vec![
            idle_car("l1", 7), // would win on cost alone
            moving_car("l2", 1, Direction::Up, vec![Stop::hall(7, Direction::Up)]),
        ];
        let serving = find_serving_car(&cars, &call(7, Direction::Up)).unwrap();
        assert_eq!(serving.id, "l2");
        // Same floor, opposite direction: not served yet.
        assert!(find_serving_car(&cars, &call(7, Direction::Down)).is_none());
    }

    #[test]
    fn close_idle_car_beats_a_committed_sweep() {
        let cars = vec![
            moving_car("l1", 1, Direction::Up, vec![Stop::hall(5, Direction::Up)]),
            idle_car("l2", 3),
        ];
        // Idle cost |3-4| = 1; the UP car pays its sweep to 5 plus a stop.
        let chosen = select_car(&cars, &call(4, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
    }

    #[test]
    fn an_opposite_car_can_beat_a_distant_idle_car() {
        let cars = vec![
            idle_car("l1", 17),
            moving_car("l2", 3, Direction::Down, vec![Stop::hall(1, Direction::Down)]),
        ];
        // Idle: 15. Opposite: finish at 1 (2) + back up to 2 (1) + penalty 2 = 5.
        let chosen = select_car(&cars, &call(2, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
    }

    #[test]
    fn fewer_intervening_stops_wins_between_equal_sweeps() {
        let cars = vec![
            moving_car(
                "l1",
                2,
                Direction::Up,
                vec![Stop::hall(5, Direction::Up), Stop::hall(9, Direction::Up)],
            ),
            moving_car("l2", 2, Direction::Up, vec![Stop::hall(9, Direction::Up)]),
        ];
        let chosen = select_car(&cars, &call(9, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
    }

    #[test]
    fn a_car_that_passed_the_floor_pays_the_round_trip() {
        let passed = moving_car("l1", 10, Direction::Up, vec![Stop::hall(12, Direction::Up)]);
        // Round trip: (12-10) + (12-7) = 7. An idle car at distance 6 wins...
        let cars = vec![passed.clone(), idle_car("l2", 13)];
        let chosen = select_car(&cars, &call(7, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
        // ...but at distance 8 it loses to the round trip.
        let cars = vec![passed, idle_car("l2", 15)];
        let chosen = select_car(&cars, &call(7, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l1");
    }

    #[test]
    fn opposite_car_without_stops_turns_at_the_building_extreme() {
        let cars = vec![
            moving_car("l1", 3, Direction::Down, vec![]),
            idle_car("l2", 9),
        ];
        // Opposite: down to ordinal 1 (2) + up to 5 (4) + penalty 2 = 8.
        // Idle: 4. Idle wins.
        let chosen = select_car(&cars, &call(5, Direction::Up)).unwrap();
        assert_eq!(chosen.id, "l2");
    }

    #[test]
    fn enqueue_appends_orders_and_commits_an_idle_car() {
        let mut car = moving_car("l1", 4, Direction::Idle, vec![Stop::cabin(2)]);
        enqueue_call(&mut car, &call(9, Direction::Up));

        assert!(car.has_hall_stop(9, Direction::Up));
        // Committed toward the requested floor, then SCAN-ordered for UP.
        assert_eq!(car.direction, Direction::Up);
        let floors: Vec<u8> = car.stop_floors().collect();
        assert_eq!(floors, vec![9, 2]);
    }

    #[test]
    fn enqueue_never_duplicates_a_queued_floor() {
        let mut car = moving_car(
            "l1",
            1,
            Direction::Up,
            vec![Stop::hall(6, Direction::Down)],
        );
        enqueue_call(&mut car, &call(6, Direction::Up));
        assert_eq!(car.next_stops.len(), 1);
        // The original entry survives untouched.
        assert!(car.has_hall_stop(6, Direction::Down));
    }

    #[test]
    fn enqueue_at_the_cars_own_floor_changes_nothing() {
        let mut car = idle_car("l1", 5);
        enqueue_call(&mut car, &call(5, Direction::Up));
        assert!(car.next_stops.is_empty());
        assert_eq!(car.direction, Direction::Idle);
    }
}
