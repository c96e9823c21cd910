//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the system.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

//
// ──────────────────────────────────────────────────────────────
//   1. BUILDING & FLEET
// ──────────────────────────────────────────────────────────────
//

/// Number of cars seeded into a fresh roster
pub const DEFAULT_CAR_COUNT: u8 = 4;

/// Id prefix for seeded cars (`l1`, `l2`, ...)
pub static CAR_ID_PREFIX: &str = "l";

/// Floor every car returns to on an administrative reset; also the
/// starting floor of a freshly seeded roster
pub const RESET_FLOOR: u8 = 1;

//
// ──────────────────────────────────────────────────────────────
//   2. ENGINE TIMING
// ──────────────────────────────────────────────────────────────
//

/// Cadence of the movement-engine supervisor. A scheduling interval,
/// not a correctness requirement
pub const ENGINE_TICK: Duration = Duration::from_millis(200);

/// Time a car spends travelling one floor
pub const TRAVEL_TIME: Duration = Duration::from_millis(2000);

/// Time a car dwells with open doors at a completed stop
pub const DWELL_TIME: Duration = Duration::from_millis(3000);

//
// ──────────────────────────────────────────────────────────────
//   3. DISPATCH COST TUNING
// ──────────────────────────────────────────────────────────────
//
// The weights are policy, not physics. The dispatch tests assert the
// relative ordering of candidates, so the values can be tuned as long
// as both stay small and positive.

/// Cost added per already-committed stop a car will serve before the
/// requested floor
pub const STOP_PENALTY: u32 = 1;

/// Cost added when serving the call requires the car to change or
/// mismatch direction
pub const WRONG_DIRECTION_PENALTY: u32 = 2;

//
// ──────────────────────────────────────────────────────────────
//   4. LEASE & DURABILITY
// ──────────────────────────────────────────────────────────────
//

/// How long an engine lease stays valid without renewal
pub const LEASE_TTL: Duration = Duration::from_millis(10_000);

/// How often the running engine renews its lease. Must stay well
/// under [LEASE_TTL]
pub const LEASE_RENEW: Duration = Duration::from_millis(3_000);

/// Default path of the engine lease file
pub static LEASE_PATH: &str = "liftpro.lease";

/// Default path of the durable roster file
pub static ROSTER_PATH: &str = "lift_roster.json";

/// Capacity of the durable-sync channel between car runners and the
/// sync task
pub const DURABLE_SYNC_BUFFER: usize = 300;

//
// ──────────────────────────────────────────────────────────────
//   5. MONITOR & STATUS
// ──────────────────────────────────────────────────────────────
//

/// Bind address of the monitor feed listener
pub static MONITOR_BIND_ADDR: &str = "0.0.0.0";

/// Port the monitor feed streams fleet snapshot frames on
pub static MONITOR_PORT: u16 = 50010;

/// How often the periodic status printer re-checks the fleet snapshot
pub const STATUS_PRINT_PERIOD: Duration = Duration::from_millis(500);

//
// ──────────────────────────────────────────────────────────────
//   6. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable the periodic fleet status table
pub static PRINT_FLEET_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable miscellaneous debug prints
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));
