//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It allows to print in appropriate colors depending on the situation.
//! It also provides a nice print-format for the fleet status table.
use crate::config;
use crate::fleet::{CarState, CarStatus, Direction};
use crate::floor_map::FLOOR_MAP;
use ansi_term::Colour::{self, Green, Purple, Red, White, Yellow};

use unicode_width::UnicodeWidthStr;

/// Prints a message in a specified color to the terminal.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The message to print.
/// - `color`: The color to use for the text output.
///
/// ## Example
/// ```
/// use ansi_term::Colour;
/// use liftpro::print;
///
/// print::color("Hello, World!".to_string(), Colour::Green);
/// ```
///
/// **Note:** This function does not return a value and prints directly to the terminal.
/// If color output is not supported, the text may not appear as expected.
pub fn color(msg: String, color: Colour) {
    let print_stat = config::PRINT_ELSE_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", color.paint("[CUSTOM]:  "), color.paint(msg));
    }
}

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The error message to print.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use liftpro::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
///
/// **Note:** This function does not return a value and prints directly to the terminal.
/// If color output is not supported, the error message may not appear in red.
pub fn err(msg: String) {
    let print_stat = config::PRINT_ERR_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The warning message to print.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
///
/// ## Example
/// ```
/// use liftpro::print;
///
/// print::warn("This is a warning.".to_string());
/// ```
///
/// **Note:** This function does not return a value and prints directly to the terminal.
/// If color output is not supported, the warning message may not appear in yellow.
pub fn warn(msg: String) {
    let print_stat = config::PRINT_WARN_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The success message to print.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
///
/// ## Example
/// ```
/// use liftpro::print;
///
/// print::ok("Operation successful.".to_string());
/// ```
///
/// **Note:** This function does not return a value and prints directly to the terminal.
/// If color output is not supported, the success message may not appear in green.
pub fn ok(msg: String) {
    let print_stat = config::PRINT_OK_ON.lock().unwrap().clone();

    if print_stat {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The informational message to print.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
///
/// ## Example
/// ```
/// use liftpro::print;
///
/// print::info("This is an informational message.".to_string());
/// ```
///
/// **Note:** This function does not return a value and prints directly to the terminal.
/// If color output is not supported, the informational message may not appear in light blue.
pub fn info(msg: String) {
    let print_stat = config::PRINT_INFO_ON.lock().unwrap().clone();

    let light_blue = Colour::RGB(102, 178, 255);
    if print_stat {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that may take more than one column width (e.g. Unicode symbols),
/// ensuring aligned text in terminal-based tables. Pad the raw text BEFORE painting it;
/// ANSI escape bytes would otherwise throw the width measurement off.
///
/// # Parameters
/// - `text`: The string to pad.
/// - `width`: The total width the text should occupy (including padding).
///
/// # Returns
/// A `String` with the original text left-aligned and padded with spaces to match the desired width.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Logs the current fleet to the terminal in a structured and colorized table format.
///
/// This function visually presents the status of the lift system, including:
/// - Each car's id and current floor (as a building label)
/// - Committed direction, with arrows and colors to indicate movement
/// - Operational status (green for in service, red for out of service)
/// - The scheduled stops in service order
///
/// # Parameters
/// - `cars`: The fleet snapshot to render, in roster order.
///
/// # Behavior
/// - If configured printing is disabled (`config::PRINT_FLEET_ON` is false), the function exits early.
/// - Column widths grow with the content so long schedules stay aligned.
///
/// # Notes
/// - This is intended for human-readable monitoring purposes.
/// - Printing frequency should be limited (e.g., once per 500 ms).
pub fn fleet(cars: &[CarState]) {
    let print_stat = config::PRINT_FLEET_ON.lock().unwrap().clone();
    if !print_stat {
        return;
    }

    println!("{}", Purple.bold().paint("┌────────────────────────────────┐"));
    println!("{}", Purple.bold().paint("│          FLEET STATUS          │"));
    println!("{}", Purple.bold().paint("└────────────────────────────────┘"));

    let mut rows: Vec<(String, String, Direction, CarStatus, String)> = Vec::new();
    for car in cars {
        let floor = FLOOR_MAP
            .label_of(car.current_floor)
            .unwrap_or("?")
            .to_string();
        let stops: Vec<&str> = car
            .next_stops
            .iter()
            .map(|stop| FLOOR_MAP.label_of(stop.floor).unwrap_or("?"))
            .collect();
        let stops = if stops.is_empty() {
            "-".to_string()
        } else {
            stops.join(" ")
        };
        rows.push((car.id.clone(), floor, car.direction, car.status, stops));
    }

    let id_w = column_width(rows.iter().map(|r| r.0.as_str()), "ID");
    let floor_w = column_width(rows.iter().map(|r| r.1.as_str()), "Floor");
    let dir_w = UnicodeWidthStr::width("Direction");
    let status_w = UnicodeWidthStr::width("Status");
    let stops_w = column_width(rows.iter().map(|r| r.4.as_str()), "Next stops");

    let bar = |w: usize| "─".repeat(w + 2);

    println!(
        "┌{}┬{}┬{}┬{}┬{}┐",
        bar(id_w),
        bar(floor_w),
        bar(dir_w),
        bar(status_w),
        bar(stops_w)
    );
    println!(
        "{}",
        White.bold().paint(format!(
            "│ {} │ {} │ {} │ {} │ {} │",
            pad_text("ID", id_w),
            pad_text("Floor", floor_w),
            pad_text("Direction", dir_w),
            pad_text("Status", status_w),
            pad_text("Next stops", stops_w)
        ))
    );
    println!(
        "├{}┼{}┼{}┼{}┼{}┤",
        bar(id_w),
        bar(floor_w),
        bar(dir_w),
        bar(status_w),
        bar(stops_w)
    );

    for (id, floor, direction, status, stops) in &rows {
        let direction_cell = match direction {
            Direction::Up => Yellow.paint(pad_text("↑ up", dir_w)).to_string(),
            Direction::Down => Yellow.paint(pad_text("↓ down", dir_w)).to_string(),
            Direction::Idle => Green.paint(pad_text("idle", dir_w)).to_string(),
        };
        let status_cell = match status {
            CarStatus::InService => Green.paint(pad_text("OK", status_w)).to_string(),
            CarStatus::OutOfService => Red.paint(pad_text("OUT", status_w)).to_string(),
        };

        println!(
            "│ {} │ {} │ {} │ {} │ {} │",
            pad_text(id, id_w),
            pad_text(floor, floor_w),
            direction_cell,
            status_cell,
            pad_text(stops, stops_w)
        );
    }

    println!(
        "└{}┴{}┴{}┴{}┴{}┘",
        bar(id_w),
        bar(floor_w),
        bar(dir_w),
        bar(status_w),
        bar(stops_w)
    );
}

fn column_width<'a>(cells: impl Iterator<Item = &'a str>, heading: &str) -> usize {
    cells
        .map(UnicodeWidthStr::width)
        .chain([UnicodeWidthStr::width(heading)])
        .max()
        .unwrap_or(0)
}
