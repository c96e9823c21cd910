//! ## Init Module
//!
//! Startup plumbing: command-line parsing and the cold-start load of the
//! roster into the in-memory store.

use std::env;

use crate::config;
use crate::error::LiftError;
use crate::print;
use crate::store::durable::DurableStore;
use crate::store::CarStore;

/// Launch options assembled from the command line.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Roster file location.
    pub roster_path: String,
    /// Engine lease file location.
    pub lease_path: String,
    /// Whether to serve the TCP monitor feed.
    pub monitor_on: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        LaunchOptions {
            roster_path: config::ROSTER_PATH.to_string(),
            lease_path: config::LEASE_PATH.to_string(),
            monitor_on: true,
        }
    }
}

/// ### Reads arguments from `cargo run`
///
/// Used to modify what is printed during runtime and where the state files
/// live. Available options:
///
/// `print_fleet::(true/false)` &rarr; Prints the fleet table twice per second
/// `print_err::(true/false)` &rarr; Prints error messages
/// `print_warn::(true/false)` &rarr; Prints warning messages
/// `print_ok::(true/false)` &rarr; Prints OK messages
/// `print_info::(true/false)` &rarr; Prints informational messages
/// `print_else::(true/false)` &rarr; Prints other messages, including movement logs
/// `roster::(path)` &rarr; Roster file location
/// `lease::(path)` &rarr; Engine lease file location
/// `monitor::(true/false)` &rarr; Serves the TCP monitor feed
/// `debug::` &rarr; Disables all prints except error messages
/// `help` &rarr; Displays all possible arguments without starting the program
///
/// If no arguments are provided, all prints are enabled by default and the
/// state files land in the working directory.
pub fn parse_args() -> LaunchOptions {
    let args: Vec<String> = env::args().collect();
    let mut options = LaunchOptions::default();

    if args.len() <= 1 {
        return options;
    }

    for arg in &args[1..] {
        let parts: Vec<&str> = arg.split("::").collect();
        if parts.len() == 2 {
            let key = parts[0].to_lowercase();
            // Path values keep their case; only flags are case-insensitive.
            let value = parts[1].to_string();
            let is_true = value.to_lowercase() == "true";

            match key.as_str() {
                "print_fleet" => *config::PRINT_FLEET_ON.lock().unwrap() = is_true,
                "print_err" => *config::PRINT_ERR_ON.lock().unwrap() = is_true,
                "print_warn" => *config::PRINT_WARN_ON.lock().unwrap() = is_true,
                "print_ok" => *config::PRINT_OK_ON.lock().unwrap() = is_true,
                "print_info" => *config::PRINT_INFO_ON.lock().unwrap() = is_true,
                "print_else" => *config::PRINT_ELSE_ON.lock().unwrap() = is_true,
                "roster" => options.roster_path = value,
                "lease" => options.lease_path = value,
                "monitor" => options.monitor_on = is_true,
                "debug" => {
                    *config::PRINT_FLEET_ON.lock().unwrap() = false;
                    *config::PRINT_WARN_ON.lock().unwrap() = false;
                    *config::PRINT_OK_ON.lock().unwrap() = false;
                    *config::PRINT_INFO_ON.lock().unwrap() = false;
                    *config::PRINT_ELSE_ON.lock().unwrap() = false;
                }
                _ => {}
            }
        } else if arg.to_lowercase() == "help" {
            println!("Available arguments:");
            println!("  print_fleet::true/false");
            println!("  print_err::true/false");
            println!("  print_warn::true/false");
            println!("  print_ok::true/false");
            println!("  print_info::true/false");
            println!("  print_else::true/false");
            println!("  roster::<path>");
            println!("  lease::<path>");
            println!("  monitor::true/false");
            println!("  debug (only error messages are shown)");
            std::process::exit(0);
        }
    }

    options
}

/// Cold start: loads the roster from the durable store and fills the
/// in-memory cache with it. A missing roster file seeds the default fleet.
///
/// ## Returns
/// - `Ok(usize)` — the number of cars now in the cache.
pub async fn seed_fleet(store: &CarStore, durable: &DurableStore) -> Result<usize, LiftError> {
    let fleet = durable.load_roster()?;
    let count = fleet.len();
    for car in fleet {
        store.insert_car(car).await;
    }
    print::ok(format!(
        "Cold start: {} cars loaded from {:?}",
        count,
        durable.path()
    ));
    Ok(count)
}
