//! ## Lift Service
//!
//! The operations boundary: everything an outer transport (HTTP handler,
//! console, test harness) may do to the fleet goes through here. Each
//! operation resolves and validates its input FIRST, then mutates through
//! the store's atomic read-modify-write, so an invalid request never leaves
//! a car half-changed.

use std::collections::HashSet;

use crate::config;
use crate::error::LiftError;
use crate::fleet::{CarState, CarStatus, Direction, Stop};
use crate::floor_map::FLOOR_MAP;
use crate::print;
use crate::scheduling::dispatch::{enqueue_call, find_serving_car, select_car, HallCall};
use crate::scheduling::stops::{direction_toward, order_stops};
use crate::store::durable::DurableStore;
use crate::store::{CarPatch, CarStore};

/// One car shaped for display: floor labels instead of ordinals.
#[derive(Debug, Clone, PartialEq)]
pub struct CarOverview {
    /// Car id.
    pub id: String,
    /// Current floor, as a building label.
    pub floor: &'static str,
    /// Committed direction.
    pub direction: Direction,
    /// Operational status.
    pub status: CarStatus,
    /// Scheduled stops in service order, as building labels.
    pub queue: Vec<&'static str>,
}

/// Handles a hall call: someone on `floor_label` pressed `direction`.
///
/// The already-served scan and the winner append run under the store's
/// assignment gate as one transaction, so two simultaneous calls for the
/// same floor cannot both append.
///
/// ## Returns
/// - `Ok(String)` — the id of the car that will serve the call.
pub async fn request_car(
    store: &CarStore,
    floor_label: &str,
    direction: &str,
) -> Result<String, LiftError> {
    let floor = FLOOR_MAP.ordinal_of(floor_label)?;
    let direction = Direction::parse_hall(direction)?;
    let call = HallCall { floor, direction };

    let _gate = store.lock_assignment().await;
    let cars = store.get_all_cars().await;

    if let Some(car) = find_serving_car(&cars, &call) {
        return Ok(car.id.clone());
    }

    let winner = select_car(&cars, &call)?.id.clone();
    store.with_car(&winner, |car| enqueue_call(car, &call)).await?;
    print::ok(format!(
        "{} assigned to hall call {} ({:?})",
        winner, floor_label, direction
    ));
    Ok(winner)
}

/// Adds in-cabin destinations to one car's schedule.
///
/// Labels are resolved up front; any bad label rejects the whole request
/// with the car untouched. Floors equal to the car's current position or
/// already queued are skipped. The schedule is re-ordered with the car's
/// committed direction, and an idle car commits toward its first ordered
/// stop.
///
/// ## Returns
/// - `Ok(CarState)` — the car after the update.
pub async fn add_destinations(
    store: &CarStore,
    car_id: &str,
    labels: &[String],
) -> Result<CarState, LiftError> {
    let floors = resolve_labels(labels)?;

    store
        .with_car(car_id, move |car| {
            for floor in floors {
                if floor == car.current_floor || car.has_stop_at(floor) {
                    continue;
                }
                car.next_stops.push(Stop::cabin(floor));
            }
            car.next_stops = order_stops(&car.next_stops, car.current_floor, car.direction);
            if car.direction == Direction::Idle {
                if let Some(first) = car.next_stops.first() {
                    car.direction = direction_toward(car.current_floor, first.floor);
                }
            }
            car.clone()
        })
        .await
}

/// Withdraws queued floors from one car's schedule.
///
/// Floors not actually queued are ignored. An emptied schedule idles the
/// car; otherwise the remainder is re-ordered and the direction re-derived
/// from the new front stop. An in-flight travel or dwell delay for the
/// withdrawn floor is not interrupted; the movement pass re-checks the
/// schedule when the delay ends.
///
/// ## Returns
/// - `Ok(CarState)` — the car after the update.
pub async fn cancel_stops(
    store: &CarStore,
    car_id: &str,
    labels: &[String],
) -> Result<CarState, LiftError> {
    let floors: HashSet<u8> = resolve_labels(labels)?.into_iter().collect();

    store
        .with_car(car_id, move |car| {
            car.next_stops.retain(|stop| !floors.contains(&stop.floor));
            if car.next_stops.is_empty() {
                car.direction = Direction::Idle;
            } else {
                car.next_stops = order_stops(&car.next_stops, car.current_floor, car.direction);
                if let Some(first) = car.next_stops.first() {
                    car.direction = direction_toward(car.current_floor, first.floor);
                }
            }
            car.clone()
        })
        .await
}

/// Every car shaped for display, in roster order.
pub async fn fleet_overview(store: &CarStore) -> Result<Vec<CarOverview>, LiftError> {
    let mut overview = Vec::new();
    for car in store.get_all_cars().await {
        let mut queue = Vec::with_capacity(car.next_stops.len());
        for stop in &car.next_stops {
            queue.push(FLOOR_MAP.label_of(stop.floor)?);
        }
        overview.push(CarOverview {
            id: car.id.clone(),
            floor: FLOOR_MAP.label_of(car.current_floor)?,
            direction: car.direction,
            status: car.status,
            queue,
        });
    }
    Ok(overview)
}

/// Parks the whole fleet: every car back to the baseline floor, idle, with
/// an empty schedule, and the roster file rewritten to match.
///
/// Runs under the assignment gate so no dispatch transaction interleaves
/// with the sweep. Status is left as-is; reset is a schedule scrub, not a
/// service event.
pub async fn reset_fleet(store: &CarStore, durable: &DurableStore) -> Result<(), LiftError> {
    let _gate = store.lock_assignment().await;

    let mut fleet = Vec::new();
    for id in store.list_car_keys().await {
        let car = store
            .set_car_fields(
                &id,
                CarPatch {
                    current_floor: Some(config::RESET_FLOOR),
                    direction: Some(Direction::Idle),
                    next_stops: Some(Vec::new()),
                    ..CarPatch::default()
                },
            )
            .await?;
        fleet.push(car);
    }
    durable.sync_all(&fleet)?;
    print::ok(format!("Fleet reset: {} cars parked", fleet.len()));
    Ok(())
}

fn resolve_labels(labels: &[String]) -> Result<Vec<u8>, LiftError> {
    let mut floors = Vec::with_capacity(labels.len());
    for label in labels {
        let floor = FLOOR_MAP.ordinal_of(label)?;
        if !FLOOR_MAP.in_range(floor) {
            return Err(LiftError::FloorOutOfRange(label.clone()));
        }
        floors.push(floor);
    }
    Ok(floors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::CarState;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    async fn store_with(cars: Vec<CarState>) -> CarStore {
        let store = CarStore::new();
        for car in cars {
            store.insert_car(car).await;
        }
        store
    }

    #[tokio::test]
    async fn a_hall_call_goes_to_the_cheapest_car() {
        // "G" is ordinal 4: l2 at UG (5) is one floor away, l1 at B2 (1) is three.
        let store = store_with(vec![CarState::new("l1", 1), CarState::new("l2", 5)]).await;

        let winner = request_car(&store, "G", "up").await.unwrap();
        assert_eq!(winner, "l2");

        let car = store.get_car("l2").await.unwrap();
        assert_eq!(car.next_stops, vec![Stop::hall(4, Direction::Up)]);
        assert_eq!(car.direction, Direction::Down); // committed toward the call
    }

    #[tokio::test]
    async fn a_served_floor_is_not_assigned_twice() {
        let store = store_with(vec![CarState::new("l1", 1), CarState::new("l2", 5)]).await;

        let first = request_car(&store, "7", "down").await.unwrap();
        let second = request_car(&store, "7", "down").await.unwrap();
        assert_eq!(first, second);

        let car = store.get_car(&first).await.unwrap();
        assert_eq!(car.next_stops.len(), 1);
    }

    #[tokio::test]
    async fn hall_call_input_is_validated_before_any_state_change() {
        let store = store_with(vec![CarState::new("l1", 1)]).await;

        assert!(matches!(
            request_car(&store, "13", "up").await,
            Err(LiftError::InvalidFloorLabel(_))
        ));
        assert!(matches!(
            request_car(&store, "G", "IDLE").await,
            Err(LiftError::InvalidDirection(_))
        ));
        assert!(store.get_car("l1").await.unwrap().next_stops.is_empty());
    }

    #[tokio::test]
    async fn an_empty_roster_cannot_serve_calls() {
        let store = CarStore::new();
        assert!(matches!(
            request_car(&store, "G", "up").await,
            Err(LiftError::NoCarsAvailable)
        ));
    }

    #[tokio::test]
    async fn destinations_are_ordered_and_commit_an_idle_car() {
        // Car parked at LG (3); both "G" (4) and "8" (13) lie above it.
        let store = store_with(vec![CarState::new("l1", 3)]).await;

        let car = add_destinations(&store, "l1", &labels(&["8", "G"]))
            .await
            .unwrap();
        assert_eq!(car.next_stops, vec![Stop::cabin(4), Stop::cabin(13)]);
        assert_eq!(car.direction, Direction::Up);
    }

    #[tokio::test]
    async fn current_floor_and_duplicates_are_skipped() {
        let store = store_with(vec![CarState::new("l1", 3)]).await;

        add_destinations(&store, "l1", &labels(&["8"])).await.unwrap();
        let car = add_destinations(&store, "l1", &labels(&["8", "LG"]))
            .await
            .unwrap();
        assert_eq!(car.next_stops, vec![Stop::cabin(13)]);
    }

    #[tokio::test]
    async fn one_bad_label_rejects_the_whole_batch() {
        let store = store_with(vec![CarState::new("l1", 3)]).await;

        assert!(matches!(
            add_destinations(&store, "l1", &labels(&["8", "penthouse"])).await,
            Err(LiftError::InvalidFloorLabel(_))
        ));
        assert!(store.get_car("l1").await.unwrap().next_stops.is_empty());
    }

    #[tokio::test]
    async fn unknown_cars_are_reported_as_not_found() {
        let store = store_with(vec![CarState::new("l1", 3)]).await;
        assert!(matches!(
            add_destinations(&store, "l7", &labels(&["8"])).await,
            Err(LiftError::CarNotFound(_))
        ));
    }

    #[tokio::test]
    async fn cancelling_stops_rederives_the_direction() {
        let store = store_with(vec![CarState::new("l1", 3)]).await;
        add_destinations(&store, "l1", &labels(&["8", "G"]))
            .await
            .unwrap();

        let car = cancel_stops(&store, "l1", &labels(&["G"])).await.unwrap();
        assert_eq!(car.next_stops, vec![Stop::cabin(13)]);
        assert_eq!(car.direction, Direction::Up);

        let car = cancel_stops(&store, "l1", &labels(&["8"])).await.unwrap();
        assert!(car.next_stops.is_empty());
        assert_eq!(car.direction, Direction::Idle);
    }

    #[tokio::test]
    async fn cancelling_an_unqueued_floor_is_harmless() {
        let store = store_with(vec![CarState::new("l1", 3)]).await;
        add_destinations(&store, "l1", &labels(&["8"])).await.unwrap();

        let car = cancel_stops(&store, "l1", &labels(&["12"])).await.unwrap();
        assert_eq!(car.next_stops, vec![Stop::cabin(13)]);
    }

    #[tokio::test]
    async fn the_overview_speaks_in_floor_labels() {
        let store = store_with(vec![CarState::new("l1", 1), CarState::new("l2", 5)]).await;
        add_destinations(&store, "l2", &labels(&["3", "B1"]))
            .await
            .unwrap();

        let overview = fleet_overview(&store).await.unwrap();
        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].id, "l1");
        assert_eq!(overview[0].floor, "B2");
        assert_eq!(overview[1].floor, "UG");
        assert_eq!(overview[1].queue, vec!["3", "B1"]);
    }

    #[tokio::test]
    async fn reset_parks_every_car_and_rewrites_the_roster() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("liftpro_reset_{}.json", nanos));
        let durable = DurableStore::new(&path);

        let mut dirty = CarState::new("l2", 9);
        dirty.direction = Direction::Down;
        dirty.next_stops = vec![Stop::cabin(2)];
        let store = store_with(vec![CarState::new("l1", 4), dirty]).await;

        reset_fleet(&store, &durable).await.unwrap();

        for car in store.get_all_cars().await {
            assert_eq!(car.current_floor, config::RESET_FLOOR);
            assert_eq!(car.direction, Direction::Idle);
            assert!(car.next_stops.is_empty());
        }
        let persisted = durable.load_roster().unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|c| c.current_floor == config::RESET_FLOOR));

        let _ = std::fs::remove_file(&path);
    }
}
