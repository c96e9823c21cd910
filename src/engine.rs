//! ## Movement Engine
//!
//! The perpetual tick loop that makes cars move. Every car gets its own
//! runner task so one car's travel or door-dwell delay never stalls the
//! rest of the fleet; a supervisor task keeps the runners alive, renews the
//! engine lease, and publishes fleet snapshots on a watch channel for the
//! status printer and the monitor feed.
//!
//! A runner never mutates blind: delays happen OUTSIDE the car's lock,
//! against a cloned snapshot, and the actual step re-validates under the
//! lock afterwards. A stop cancelled mid-travel simply makes the step a
//! no-op instead of moving the car toward a floor nobody wants anymore.
//!
//! A runner also never dies: a failed read or write is logged and retried
//! next tick, per car, while every other car keeps stepping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use crate::config;
use crate::error::LiftError;
use crate::fleet::{CarState, Direction};
use crate::floor_map::FLOOR_MAP;
use crate::print;
use crate::store::durable::DurableStore;
use crate::store::lease::EngineLease;
use crate::store::CarStore;

/// In-process start guard. The lease keeps a second PROCESS from starting
/// an engine; this keeps a second CALLER in the same process from doing it.
static ENGINE_STARTED: AtomicBool = AtomicBool::new(false);

/// What a runner should do with a car this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepPlan {
    /// Empty schedule: make sure the car reads IDLE and wait a tick.
    Rest,
    /// Front stop on another floor: travel delay, then move one floor.
    Travel,
    /// Front stop right here: dwell delay (doors open), then complete it.
    OpenDoors,
}

/// What actually happened when a dwell pass re-checked the schedule.
#[derive(Debug, PartialEq)]
enum StopOutcome {
    /// The front stop was served; more stops remain.
    Served,
    /// The front stop was served and the schedule emptied; the quiescent
    /// record should reach the durable roster.
    Quiescent(CarState),
    /// The schedule changed during the dwell; nothing was served.
    Skipped,
}

/// Starts the engine: one runner per rostered car, a supervisor, and the
/// durable-sync consumer. Call once at boot, after the lease is acquired.
///
/// ## Returns
/// - `Ok(watch::Receiver)` — a live feed of fleet snapshots, updated when
///   any car's state changes.
/// - `Err(LiftError::LeaseHeld)` — an engine is already running in this
///   process.
pub async fn start(
    store: Arc<CarStore>,
    durable: Arc<DurableStore>,
    lease: Arc<EngineLease>,
) -> Result<watch::Receiver<Vec<CarState>>, LiftError> {
    if ENGINE_STARTED.swap(true, Ordering::SeqCst) {
        return Err(LiftError::LeaseHeld("this process".to_string()));
    }

    let (fleet_watch_tx, fleet_watch_rx) = watch::channel(store.get_all_cars().await);
    let (sync_tx, mut sync_rx) = mpsc::channel::<CarState>(config::DURABLE_SYNC_BUFFER);

    // Quiescent-car records trickle to the roster file off the hot path.
    {
        let durable = durable.clone();
        tokio::spawn(async move {
            while let Some(car) = sync_rx.recv().await {
                if let Err(e) = durable.sync_car(&car) {
                    print::warn(format!("Durable sync for {} failed: {}", car.id, e));
                }
            }
        });
    }

    {
        let store = store.clone();
        tokio::spawn(async move {
            supervise(store, lease, fleet_watch_tx, sync_tx).await;
        });
    }

    Ok(fleet_watch_rx)
}

/// Keeps one runner per rostered car alive, renews the lease, and feeds the
/// snapshot watch. Runs until process shutdown.
async fn supervise(
    store: Arc<CarStore>,
    lease: Arc<EngineLease>,
    fleet_watch_tx: watch::Sender<Vec<CarState>>,
    sync_tx: mpsc::Sender<CarState>,
) {
    let mut runners: HashMap<String, JoinHandle<()>> = HashMap::new();
    let mut last_renew = Instant::now();

    loop {
        for id in store.list_car_keys().await {
            let alive = runners.get(&id).map(|h| !h.is_finished()).unwrap_or(false);
            if !alive {
                let store = store.clone();
                let sync_tx = sync_tx.clone();
                let car_id = id.clone();
                runners.insert(
                    id,
                    tokio::spawn(async move {
                        run_car(store, car_id, sync_tx).await;
                    }),
                );
            }
        }

        if last_renew.elapsed() >= config::LEASE_RENEW {
            match lease.renew() {
                Ok(_) => last_renew = Instant::now(),
                Err(e) => print::warn(format!("Engine lease renewal failed: {}", e)),
            }
        }

        let fleet = store.get_all_cars().await;
        if *fleet_watch_tx.borrow() != fleet {
            let _ = fleet_watch_tx.send(fleet);
        }

        sleep(config::ENGINE_TICK).await;
    }
}

/// One car's perpetual step loop.
async fn run_car(store: Arc<CarStore>, id: String, sync_tx: mpsc::Sender<CarState>) {
    loop {
        let car = match store.get_car(&id).await {
            Ok(car) => car,
            Err(e) => {
                print::err(format!("Movement pass for {} skipped: {}", id, e));
                sleep(config::ENGINE_TICK).await;
                continue;
            }
        };

        match plan_step(&car) {
            StepPlan::Rest => {
                if car.direction != Direction::Idle {
                    if let Err(e) = store
                        .with_car(&id, |car| car.direction = Direction::Idle)
                        .await
                    {
                        print::err(format!("Failed to idle {}: {}", id, e));
                    }
                }
                sleep(config::ENGINE_TICK).await;
            }
            StepPlan::Travel => {
                sleep(config::TRAVEL_TIME).await;
                match store.with_car(&id, apply_travel_step).await {
                    Ok(Some((floor, direction))) => {
                        print::color(
                            format!("{} → {} ({:?})", id, label(floor), direction),
                            ansi_term::Colour::Cyan,
                        );
                    }
                    Ok(None) => {} // target withdrawn mid-travel
                    Err(e) => print::err(format!("Travel step for {} failed: {}", id, e)),
                }
            }
            StepPlan::OpenDoors => {
                sleep(config::DWELL_TIME).await;
                match store.with_car(&id, apply_stop_completion).await {
                    Ok(StopOutcome::Quiescent(quiescent)) => {
                        print::color(
                            format!("{} finished its schedule at {}", id, label(car.current_floor)),
                            ansi_term::Colour::Green,
                        );
                        if let Err(e) = sync_tx.send(quiescent).await {
                            print::warn(format!("Durable sync queue closed: {}", e));
                        }
                    }
                    Ok(StopOutcome::Served) => {
                        print::color(
                            format!("{} served {}", id, label(car.current_floor)),
                            ansi_term::Colour::Green,
                        );
                    }
                    Ok(StopOutcome::Skipped) => {} // schedule changed during the dwell
                    Err(e) => print::err(format!("Stop completion for {} failed: {}", id, e)),
                }
            }
        }
    }
}

fn label(floor: u8) -> &'static str {
    FLOOR_MAP.label_of(floor).unwrap_or("?")
}

/// Classifies the next pass from a snapshot. The snapshot may be stale by
/// the time the pass runs; the apply helpers re-check under the lock.
fn plan_step(car: &CarState) -> StepPlan {
    match car.next_stops.first() {
        None => StepPlan::Rest,
        Some(stop) if stop.floor == car.current_floor => StepPlan::OpenDoors,
        Some(_) => StepPlan::Travel,
    }
}

/// Moves the car one floor toward its front stop and commits the matching
/// direction. Runs under the car's lock, after the travel delay.
///
/// ## Returns
/// - `Some((new_floor, direction))` — the car moved.
/// - `None` — the schedule changed during the delay and no move applies.
fn apply_travel_step(car: &mut CarState) -> Option<(u8, Direction)> {
    let target = car.next_stops.first()?.floor;
    if target > car.current_floor {
        car.current_floor += 1;
        car.direction = Direction::Up;
        Some((car.current_floor, Direction::Up))
    } else if target < car.current_floor {
        car.current_floor -= 1;
        car.direction = Direction::Down;
        Some((car.current_floor, Direction::Down))
    } else {
        None
    }
}

/// Pops the front stop once the car has dwelled on its floor. If the
/// schedule empties the car goes IDLE and the quiescent record is carried
/// out for a durable sync. Runs under the car's lock, after the dwell
/// delay; a front stop that no longer matches the current floor means the
/// schedule changed during the dwell and nothing is served.
fn apply_stop_completion(car: &mut CarState) -> StopOutcome {
    match car.next_stops.first() {
        Some(stop) if stop.floor == car.current_floor => {
            car.next_stops.remove(0);
            if car.next_stops.is_empty() {
                car.direction = Direction::Idle;
                StopOutcome::Quiescent(car.clone())
            } else {
                StopOutcome::Served
            }
        }
        _ => StopOutcome::Skipped,
    }
}
