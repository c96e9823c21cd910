//! ## Durable Roster
//!
//! The long-lived side of the store boundary: a JSON roster file that seeds
//! the in-memory cache on cold start and absorbs per-car syncs whenever a
//! car goes quiescent. Writes go through a temp-file rename so a crash
//! mid-write never leaves a half-written roster behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config;
use crate::error::LiftError;
use crate::fleet::serial;
use crate::fleet::CarState;
use crate::print;

/// File-backed roster store. One instance per process; all reads and writes
/// of the file are serialized through an internal gate so a reset and a
/// quiescent-car sync cannot interleave their read-modify-write cycles.
pub struct DurableStore {
    path: PathBuf,
    write_gate: Mutex<()>,
}

impl DurableStore {
    /// A store over `path`. The file is created lazily on first load.
    pub fn new(path: impl Into<PathBuf>) -> DurableStore {
        DurableStore {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    /// The roster file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full roster, in id order.
    ///
    /// A missing file is a cold start on a fresh host: the default fleet is
    /// materialized, persisted, and returned. A present-but-unreadable file
    /// is an error; silently replacing a corrupt roster would discard real
    /// state.
    pub fn load_roster(&self) -> Result<Vec<CarState>, LiftError> {
        let _gate = self.write_gate.lock().unwrap();
        if !self.path.exists() {
            let fleet = default_fleet();
            self.write_locked(&fleet)?;
            print::info(format!(
                "No roster at {:?}, seeded {} default cars",
                self.path,
                fleet.len()
            ));
            return Ok(fleet);
        }
        let text = fs::read_to_string(&self.path)?;
        let mut fleet: Vec<CarState> = serde_json::from_str(&text)?;
        for car in &fleet {
            serial::validate_car(car)?;
        }
        fleet.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(fleet)
    }

    /// Upserts one car's record into the roster file.
    pub fn sync_car(&self, car: &CarState) -> Result<(), LiftError> {
        let _gate = self.write_gate.lock().unwrap();
        let mut fleet = self.read_locked()?;
        match fleet.iter_mut().find(|c| c.id == car.id) {
            Some(slot) => *slot = car.clone(),
            None => fleet.push(car.clone()),
        }
        fleet.sort_by(|a, b| a.id.cmp(&b.id));
        self.write_locked(&fleet)
    }

    /// Replaces the whole roster file with `fleet`.
    pub fn sync_all(&self, fleet: &[CarState]) -> Result<(), LiftError> {
        let _gate = self.write_gate.lock().unwrap();
        let mut fleet: Vec<CarState> = fleet.to_vec();
        fleet.sort_by(|a, b| a.id.cmp(&b.id));
        self.write_locked(&fleet)
    }

    fn read_locked(&self) -> Result<Vec<CarState>, LiftError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_locked(&self, fleet: &[CarState]) -> Result<(), LiftError> {
        let text = serde_json::to_string_pretty(fleet)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// The factory fleet: `l1`..`l4`, parked at the reset floor with empty
/// schedules.
fn default_fleet() -> Vec<CarState> {
    (1..=config::DEFAULT_CAR_COUNT)
        .map(|n| CarState::new(&format!("{}{}", config::CAR_ID_PREFIX, n), config::RESET_FLOOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{Direction, Stop};

    fn temp_roster(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("liftpro_roster_{}_{}.json", tag, nanos))
    }

    #[test]
    fn cold_start_seeds_the_default_fleet() {
        let path = temp_roster("seed");
        let store = DurableStore::new(&path);

        let fleet = store.load_roster().unwrap();
        assert_eq!(fleet.len(), config::DEFAULT_CAR_COUNT as usize);
        assert_eq!(fleet[0].id, "l1");
        assert!(fleet.iter().all(|c| c.current_floor == config::RESET_FLOOR));
        assert!(fleet.iter().all(|c| c.next_stops.is_empty()));

        // The seed must have hit disk: a second load reads it back.
        assert!(path.exists());
        let again = store.load_roster().unwrap();
        assert_eq!(again, fleet);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn sync_car_upserts_one_record() {
        let path = temp_roster("sync");
        let store = DurableStore::new(&path);
        let mut fleet = store.load_roster().unwrap();

        fleet[1].current_floor = 9;
        fleet[1].direction = Direction::Down;
        fleet[1].next_stops = vec![Stop::cabin(3)];
        store.sync_car(&fleet[1]).unwrap();

        let reloaded = store.load_roster().unwrap();
        assert_eq!(reloaded[1].current_floor, 9);
        assert_eq!(reloaded[1].direction, Direction::Down);
        assert_eq!(reloaded[1].next_stops, vec![Stop::cabin(3)]);
        assert_eq!(reloaded[0], fleet[0]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unreadable_roster_is_an_error_not_a_reseed() {
        let path = temp_roster("corrupt");
        fs::write(&path, "{ not json").unwrap();

        let store = DurableStore::new(&path);
        assert!(matches!(
            store.load_roster(),
            Err(LiftError::Encoding(_))
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalid_records_are_refused_on_load() {
        let path = temp_roster("invalid");
        let mut car = CarState::new("l1", 1);
        car.next_stops = vec![Stop::cabin(4), Stop::cabin(4)];
        fs::write(&path, serde_json::to_string_pretty(&vec![car]).unwrap()).unwrap();

        let store = DurableStore::new(&path);
        assert!(matches!(store.load_roster(), Err(LiftError::BadRecord(_))));

        let _ = fs::remove_file(&path);
    }
}
