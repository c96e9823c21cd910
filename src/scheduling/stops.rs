//! ## Stop Ordering
//!
//! Canonicalizes a car's pending stops into the order the car will actually
//! visit them. The rule is classic SCAN/LOOK: serve everything in the
//! current direction of travel first, then everything on the far side of
//! the current floor, minimizing direction changes.
//!
//! The ordered sequence is the authoritative schedule — it is written back
//! to the car record, not re-derived on read.

use crate::fleet::{Direction, Stop};

/// Orders a car's stops for SCAN service.
///
/// ## Steps
/// 1. Deduplicate by floor, first occurrence wins.
/// 2. Partition into stops above and below `current_floor`; a stop at the
///    current floor has no travel left and is dropped.
/// 3. Sort the partitions ascending (above) and descending (below).
/// 4. Resolve an IDLE car's direction from the closer partition
///    (tie → UP).
/// 5. Emit above-then-below for UP, below-then-above for DOWN.
///
/// # Example
/// ```
/// use liftpro::fleet::{Direction, Stop};
/// use liftpro::scheduling::stops::order_stops;
///
/// let stops = vec![Stop::cabin(2), Stop::cabin(9), Stop::cabin(6)];
/// let ordered = order_stops(&stops, 5, Direction::Up);
/// let floors: Vec<u8> = ordered.iter().map(|s| s.floor).collect();
/// assert_eq!(floors, vec![6, 9, 2]);
/// ```
pub fn order_stops(stops: &[Stop], current_floor: u8, direction: Direction) -> Vec<Stop> {
    let mut deduped: Vec<Stop> = Vec::with_capacity(stops.len());
    for stop in stops {
        if !deduped.iter().any(|s| s.floor == stop.floor) {
            deduped.push(*stop);
        }
    }

    let mut above: Vec<Stop> = deduped
        .iter()
        .copied()
        .filter(|s| s.floor > current_floor)
        .collect();
    let mut below: Vec<Stop> = deduped
        .iter()
        .copied()
        .filter(|s| s.floor < current_floor)
        .collect();

    above.sort_by_key(|s| s.floor);
    below.sort_by_key(|s| std::cmp::Reverse(s.floor));

    let resolved = match direction {
        Direction::Idle => closest_partition_direction(&above, &below, current_floor),
        committed => committed,
    };

    match resolved {
        Direction::Up => above.into_iter().chain(below).collect(),
        _ => below.into_iter().chain(above).collect(),
    }
}

/// Direction an idle car should commit to, given its sorted partitions:
/// whichever side holds the closer stop, UP on a tie. An empty partition is
/// skipped in the comparison; two empty partitions leave the car idle.
fn closest_partition_direction(above: &[Stop], below: &[Stop], current_floor: u8) -> Direction {
    match (above.first(), below.first()) {
        (Some(up), Some(down)) => {
            let closest_up = up.floor - current_floor;
            let closest_down = current_floor - down.floor;
            if closest_up <= closest_down {
                Direction::Up
            } else {
                Direction::Down
            }
        }
        (Some(_), None) => Direction::Up,
        (None, Some(_)) => Direction::Down,
        (None, None) => Direction::Idle,
    }
}

/// Direction of travel from `current_floor` toward `target_floor`.
pub fn direction_toward(current_floor: u8, target_floor: u8) -> Direction {
    if target_floor > current_floor {
        Direction::Up
    } else {
        Direction::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floors(stops: &[Stop]) -> Vec<u8> {
        stops.iter().map(|s| s.floor).collect()
    }

    #[test]
    fn up_car_serves_above_ascending_then_below_descending() {
        let stops = vec![
            Stop::cabin(2),
            Stop::cabin(11),
            Stop::cabin(7),
            Stop::cabin(4),
        ];
        let ordered = order_stops(&stops, 6, Direction::Up);
        assert_eq!(floors(&ordered), vec![7, 11, 4, 2]);
    }

    #[test]
    fn down_car_serves_below_descending_then_above_ascending() {
        let stops = vec![
            Stop::cabin(2),
            Stop::cabin(11),
            Stop::cabin(7),
            Stop::cabin(4),
        ];
        let ordered = order_stops(&stops, 6, Direction::Down);
        assert_eq!(floors(&ordered), vec![4, 2, 7, 11]);
    }

    #[test]
    fn duplicate_floors_keep_the_first_occurrence() {
        let stops = vec![
            Stop::hall(5, Direction::Up),
            Stop::cabin(5),
            Stop::cabin(8),
        ];
        let ordered = order_stops(&stops, 1, Direction::Up);
        assert_eq!(floors(&ordered), vec![5, 8]);
        // The hall version arrived first, so its direction survives.
        assert_eq!(ordered[0].direction, Some(Direction::Up));
    }

    #[test]
    fn a_stop_at_the_current_floor_is_dropped() {
        let stops = vec![Stop::cabin(6), Stop::cabin(9)];
        let ordered = order_stops(&stops, 6, Direction::Up);
        assert_eq!(floors(&ordered), vec![9]);
    }

    #[test]
    fn idle_car_goes_toward_the_closer_stop() {
        let stops = vec![Stop::cabin(10), Stop::cabin(4)];
        // Floor 5: down stop is 1 away, up stop 5 away.
        let ordered = order_stops(&stops, 5, Direction::Idle);
        assert_eq!(floors(&ordered), vec![4, 10]);
    }

    #[test]
    fn idle_distance_tie_resolves_up() {
        let stops = vec![Stop::cabin(3), Stop::cabin(7)];
        let ordered = order_stops(&stops, 5, Direction::Idle);
        assert_eq!(floors(&ordered), vec![7, 3]);
    }

    #[test]
    fn idle_car_with_one_sided_stops_follows_that_side() {
        let ordered = order_stops(&[Stop::cabin(2), Stop::cabin(1)], 5, Direction::Idle);
        assert_eq!(floors(&ordered), vec![2, 1]);

        let ordered = order_stops(&[Stop::cabin(9)], 5, Direction::Idle);
        assert_eq!(floors(&ordered), vec![9]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let stops = vec![
            Stop::cabin(12),
            Stop::hall(3, Direction::Down),
            Stop::cabin(8),
            Stop::cabin(1),
        ];
        for direction in [Direction::Up, Direction::Down, Direction::Idle] {
            let once = order_stops(&stops, 6, direction);
            let twice = order_stops(&once, 6, direction);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(order_stops(&[], 5, Direction::Idle).is_empty());
        assert!(order_stops(&[], 5, Direction::Up).is_empty());
    }

    #[test]
    fn direction_toward_prefers_down_on_equal_floors() {
        assert_eq!(direction_toward(3, 9), Direction::Up);
        assert_eq!(direction_toward(9, 3), Direction::Down);
        assert_eq!(direction_toward(5, 5), Direction::Down);
    }
}
