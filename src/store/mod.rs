//! ## Car Store
//!
//! The authoritative in-memory home of per-car state. The dispatch path and
//! the movement engine both mutate the same records, so every mutation goes
//! through [`CarStore::with_car`]: an atomic read-modify-write under the
//! car's own mutex, with no other mutator interleaving for that car.
//!
//! The store also owns the assignment gate, a store-wide lock that turns the
//! already-served scan and the winner append of a hall call into one logical
//! transaction. Without it, two concurrent calls for the same floor could
//! both conclude "no car is serving this yet" and both append.
//!
//! Lock order: assignment gate → roster read lock → per-car mutex. No path
//! holds two car mutexes at once; scans lock cars one at a time in roster
//! order.
//!
//! The durable side of the store boundary lives in [`durable`]; the engine
//! start guard lives in [`lease`].

pub mod durable;
pub mod lease;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::error::LiftError;
use crate::fleet::{CarState, CarStatus, Direction, Stop};

/// A partial update for one car, applied atomically by
/// [`CarStore::set_car_fields`]. Fields left as `None` keep their stored
/// value.
#[derive(Debug, Default, Clone)]
pub struct CarPatch {
    /// New current floor ordinal.
    pub current_floor: Option<u8>,
    /// New committed direction.
    pub direction: Option<Direction>,
    /// New operational status.
    pub status: Option<CarStatus>,
    /// Replacement stop schedule.
    pub next_stops: Option<Vec<Stop>>,
}

/// In-memory roster of cars, one mutex per car.
pub struct CarStore {
    roster: RwLock<HashMap<String, Arc<Mutex<CarState>>>>,
    assignment_gate: Mutex<()>,
}

impl CarStore {
    /// An empty store. Cars arrive via [`CarStore::insert_car`], normally
    /// from the cold-start roster load.
    pub fn new() -> CarStore {
        CarStore {
            roster: RwLock::new(HashMap::new()),
            assignment_gate: Mutex::new(()),
        }
    }

    /// Adds `car` to the roster, replacing any record with the same id.
    pub async fn insert_car(&self, car: CarState) {
        let mut roster = self.roster.write().await;
        roster.insert(car.id.clone(), Arc::new(Mutex::new(car)));
    }

    /// The per-car cell, or [`LiftError::CarNotFound`].
    async fn car_cell(&self, id: &str) -> Result<Arc<Mutex<CarState>>, LiftError> {
        let roster = self.roster.read().await;
        roster
            .get(id)
            .cloned()
            .ok_or_else(|| LiftError::CarNotFound(id.to_string()))
    }

    /// A clone of one car's current state.
    pub async fn get_car(&self, id: &str) -> Result<CarState, LiftError> {
        let cell = self.car_cell(id).await?;
        let car = cell.lock().await;
        Ok(car.clone())
    }

    /// Clones of every car, in roster (id) order. Cars are locked one at a
    /// time, so the result is a per-car-consistent snapshot, not a global
    /// freeze of the fleet.
    pub async fn get_all_cars(&self) -> Vec<CarState> {
        let cells = self.cells_in_order().await;
        let mut cars = Vec::with_capacity(cells.len());
        for (_, cell) in cells {
            cars.push(cell.lock().await.clone());
        }
        cars
    }

    /// All car ids, sorted.
    pub async fn list_car_keys(&self) -> Vec<String> {
        let roster = self.roster.read().await;
        let mut keys: Vec<String> = roster.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The atomic read-modify-write primitive.
    ///
    /// Runs `mutate` under the car's own mutex; no other mutator can
    /// interleave for this car between the read and the write. The record's
    /// `updated_at` is refreshed after the closure runs.
    ///
    /// ## Returns
    /// - `Ok(R)` — whatever the closure produced.
    /// - `Err(LiftError::CarNotFound)` — the id is not in the roster.
    pub async fn with_car<R>(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut CarState) -> R,
    ) -> Result<R, LiftError> {
        let cell = self.car_cell(id).await?;
        let mut car = cell.lock().await;
        let out = mutate(&mut car);
        car.touch();
        Ok(out)
    }

    /// Applies `patch` to one car as a single atomic upsert.
    ///
    /// ## Returns
    /// - `Ok(CarState)` — the record after the patch.
    pub async fn set_car_fields(&self, id: &str, patch: CarPatch) -> Result<CarState, LiftError> {
        self.with_car(id, move |car| {
            if let Some(floor) = patch.current_floor {
                car.current_floor = floor;
            }
            if let Some(direction) = patch.direction {
                car.direction = direction;
            }
            if let Some(status) = patch.status {
                car.status = status;
            }
            if let Some(stops) = patch.next_stops {
                car.next_stops = stops;
            }
            car.clone()
        })
        .await
    }

    /// Takes the assignment gate.
    ///
    /// The holder may scan all cars and append to the winner knowing no
    /// other dispatch transaction interleaves. Movement steps are NOT
    /// excluded; they own `current_floor` and the queue front, never the
    /// appends this gate protects.
    pub async fn lock_assignment(&self) -> MutexGuard<'_, ()> {
        self.assignment_gate.lock().await
    }

    async fn cells_in_order(&self) -> Vec<(String, Arc<Mutex<CarState>>)> {
        let roster = self.roster.read().await;
        let mut cells: Vec<(String, Arc<Mutex<CarState>>)> = roster
            .iter()
            .map(|(id, cell)| (id.clone(), cell.clone()))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));
        cells
    }
}

impl Default for CarStore {
    fn default() -> Self {
        CarStore::new()
    }
}
