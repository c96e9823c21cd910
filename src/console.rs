//! ## Console
//!
//! The interactive operator surface: a line-based command loop on stdin
//! that drives the service operations. Parsing is separated from execution
//! so the grammar is testable without a terminal.

use std::sync::Arc;

use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use crate::floor_map::FLOOR_MAP;
use crate::print;
use crate::service;
use crate::store::durable::DurableStore;
use crate::store::CarStore;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `call <floor> <up|down>` — hall call.
    Call {
        /// Floor label as typed.
        floor: String,
        /// Direction as typed.
        direction: String,
    },
    /// `go <car> <floor> [floor..]` — in-cabin destinations.
    Go {
        /// Target car id.
        car: String,
        /// Floor labels as typed.
        floors: Vec<String>,
    },
    /// `cancel <car> <floor> [floor..]` — withdraw queued floors.
    Cancel {
        /// Target car id.
        car: String,
        /// Floor labels as typed.
        floors: Vec<String>,
    },
    /// `status` — one line per car.
    Status,
    /// `reset` — park the whole fleet.
    Reset,
    /// `floors` — list the building's floor labels.
    Floors,
    /// `help` — the command reference.
    Help,
    /// `quit` / `exit`.
    Quit,
    /// Blank line, ignored.
    Empty,
    /// Anything else, echoed back in a warning.
    Unknown(String),
}

/// Parses one console line into a [`Command`]. Never fails; malformed
/// input becomes [`Command::Unknown`].
pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let head = match words.next() {
        Some(head) => head,
        None => return Command::Empty,
    };
    let rest: Vec<String> = words.map(|w| w.to_string()).collect();

    match head.to_lowercase().as_str() {
        "call" if rest.len() == 2 => Command::Call {
            floor: rest[0].clone(),
            direction: rest[1].clone(),
        },
        "go" if rest.len() >= 2 => Command::Go {
            car: rest[0].clone(),
            floors: rest[1..].to_vec(),
        },
        "cancel" if rest.len() >= 2 => Command::Cancel {
            car: rest[0].clone(),
            floors: rest[1..].to_vec(),
        },
        "status" => Command::Status,
        "reset" => Command::Reset,
        "floors" => Command::Floors,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    }
}

/// Runs the console until `quit` or stdin closes.
pub async fn run(store: Arc<CarStore>, durable: Arc<DurableStore>) {
    print_help();
    let mut lines = BufReader::new(stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(&line) {
            Command::Call { floor, direction } => {
                match service::request_car(&store, &floor, &direction).await {
                    Ok(id) => print::info(format!("{} is on its way to {}", id, floor)),
                    Err(e) => print::err(format!("Call failed: {}", e)),
                }
            }
            Command::Go { car, floors } => {
                match service::add_destinations(&store, &car, &floors).await {
                    Ok(car) => print::info(format!(
                        "{} schedule: {}",
                        car.id,
                        schedule_text(&car.next_stops)
                    )),
                    Err(e) => print::err(format!("Go failed: {}", e)),
                }
            }
            Command::Cancel { car, floors } => {
                match service::cancel_stops(&store, &car, &floors).await {
                    Ok(car) => print::info(format!(
                        "{} schedule: {}",
                        car.id,
                        schedule_text(&car.next_stops)
                    )),
                    Err(e) => print::err(format!("Cancel failed: {}", e)),
                }
            }
            Command::Status => match service::fleet_overview(&store).await {
                Ok(overview) => {
                    for car in overview {
                        println!(
                            "  {} @ {}  {:?}  {:?}  {:?}",
                            car.id, car.floor, car.direction, car.status, car.queue
                        );
                    }
                    println!();
                }
                Err(e) => print::err(format!("Status failed: {}", e)),
            },
            Command::Reset => {
                if let Err(e) = service::reset_fleet(&store, &durable).await {
                    print::err(format!("Reset failed: {}", e));
                }
            }
            Command::Floors => {
                print::info(format!("Floors: {}", FLOOR_MAP.all_labels().join(" ")));
            }
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(input) => {
                print::warn(format!("Unknown command: {} (try `help`)", input));
            }
        }
    }

    print::info("Console closed".to_string());
}

fn schedule_text(stops: &[crate::fleet::Stop]) -> String {
    if stops.is_empty() {
        return "empty".to_string();
    }
    stops
        .iter()
        .map(|stop| FLOOR_MAP.label_of(stop.floor).unwrap_or("?"))
        .collect::<Vec<&str>>()
        .join(" ")
}

fn print_help() {
    println!("Commands:");
    println!("  call <floor> <up|down>      request a car to a floor");
    println!("  go <car> <floor> [..]       add in-cabin destinations");
    println!("  cancel <car> <floor> [..]   withdraw queued floors");
    println!("  status                      show every car");
    println!("  floors                      list building floors");
    println!("  reset                       park the whole fleet");
    println!("  help                        show this text");
    println!("  quit                        leave the console");
    println!();
}
