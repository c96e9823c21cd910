//! ## Engine Lease
//!
//! A cooperative single-host guard around the movement engine. Exactly one
//! process may tick the fleet; a second `liftpro` started on the same host
//! must refuse to start its engine instead of double-stepping every car.
//!
//! The lease is a tiny JSON file holding the current owner and an expiry
//! timestamp. A live owner renews well inside the TTL; a crashed owner
//! simply stops renewing and the lease becomes reclaimable once the TTL
//! runs out. This is advisory locking between cooperating processes, not a
//! defense against arbitrary writers.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::LiftError;
use crate::fleet::now_millis;
use crate::print;

#[derive(Debug, Serialize, Deserialize)]
struct LeaseRecord {
    holder: String,
    expires_at: u64,
}

/// A held engine lease. Dropping it does NOT release the file; the owner
/// calls [`EngineLease::release`] on orderly shutdown, and everyone else
/// waits out the TTL after a crash.
pub struct EngineLease {
    path: PathBuf,
    holder: String,
}

impl EngineLease {
    /// Claims the lease at `path` for `holder`.
    ///
    /// ## Returns
    /// - `Ok(EngineLease)` — the file was absent, expired, unreadable, or
    ///   already ours; it now names `holder` with a fresh TTL.
    /// - `Err(LiftError::LeaseHeld)` — a different holder owns a live lease.
    pub fn acquire(path: impl Into<PathBuf>, holder: &str) -> Result<EngineLease, LiftError> {
        let path = path.into();
        if let Some(record) = read_record(&path) {
            if record.expires_at > now_millis() && record.holder != holder {
                return Err(LiftError::LeaseHeld(record.holder));
            }
        }
        let lease = EngineLease {
            path,
            holder: holder.to_string(),
        };
        lease.write_record()?;
        Ok(lease)
    }

    /// Pushes the expiry another TTL into the future. Called on a cadence
    /// well below the TTL so a healthy owner never lapses.
    pub fn renew(&self) -> Result<(), LiftError> {
        self.write_record()
    }

    /// Removes the lease file so the next process can start immediately.
    pub fn release(&self) -> Result<(), LiftError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn write_record(&self) -> Result<(), LiftError> {
        let record = LeaseRecord {
            holder: self.holder.clone(),
            expires_at: now_millis() + config::LEASE_TTL.as_millis() as u64,
        };
        fs::write(&self.path, serde_json::to_string(&record)?)?;
        Ok(())
    }
}

fn read_record(path: &PathBuf) -> Option<LeaseRecord> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(record) => Some(record),
            Err(e) => {
                print::warn(format!("Unreadable lease at {:?}, reclaiming: {}", path, e));
                None
            }
        },
        Err(e) => {
            print::warn(format!("Failed to read lease at {:?}, reclaiming: {}", path, e));
            None
        }
    }
}
