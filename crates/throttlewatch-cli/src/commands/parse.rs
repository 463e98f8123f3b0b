//! `throttlewatch parse` — extract the speed limit from captured output.

use std::io::Read;

use throttlewatch_core::{SPEED_LIMIT_FIELD, parse_speed_limit};

pub fn run(path: Option<&str>) {
    let text = match read_input(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!(
                "Error reading {}: {e}",
                path.unwrap_or("stdin")
            );
            std::process::exit(1);
        }
    };

    match parse_speed_limit(&text) {
        Some(value) => println!("{SPEED_LIMIT_FIELD}: {value}"),
        None => {
            eprintln!("No integer {SPEED_LIMIT_FIELD} line found");
            std::process::exit(1);
        }
    }
}

fn read_input(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
