#![warn(missing_docs)]
//! # This projects library
//!
//! This library manages a building's lift fleet: floor-label resolution,
//! cost-based dispatch of hall calls, SCAN-ordered stop schedules, and a
//! perpetual movement engine that steps every car concurrently.
//!
//! ## Overview
//! - **Config**: Handles configuration settings.
//! - **Floor Map**: Translates building floor labels to ordinals and back.
//! - **Fleet**: Car state records and their wire formats.
//! - **Scheduling**: Stop ordering (SCAN) and cost-based dispatch.
//! - **Store**: The in-memory car store, the durable roster and the engine lease.
//! - **Engine**: The perpetual per-car movement loop.
//! - **Service**: The operations boundary (call, go, cancel, status, reset).
//! - **Monitor**: A TCP feed of fleet snapshots for external dashboards.
//! - **Console**: The interactive operator surface.

/// Global variables
pub mod config;

/// Error taxonomy
pub mod error;

/// Floor label resolution
pub mod floor_map;

/// Initialize functions
pub mod init;

/// Print functions with color coding
pub mod print;

/// Car records, validation and wire formats
pub mod fleet;

/// Stop ordering and dispatch costing.
pub mod scheduling {
    /// Cost-based assignment of hall calls to cars.
    pub mod dispatch;
    /// SCAN ordering of a car's stop schedule.
    pub mod stops;
}

/// Authoritative car state: in-memory store, durable roster, engine lease.
pub mod store;

/// The perpetual movement engine.
pub mod engine;

/// The operations boundary used by every outer surface.
pub mod service;

/// TCP snapshot feed for dashboards.
pub mod monitor;

/// Interactive command console.
pub mod console;
