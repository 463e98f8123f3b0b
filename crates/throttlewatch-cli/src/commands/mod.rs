pub mod parse;
pub mod read;
pub mod sample;

use std::time::Duration;

/// Parse a duration string like "5m", "30s", "1h", "100ms". A bare number is
/// taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();

    let (numeric, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60_000)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 3_600_000)
    } else {
        (s, 1000)
    };

    let value: u64 = numeric.trim().parse().ok()?;
    value.checked_mul(multiplier).map(Duration::from_millis)
}

/// Like [`parse_duration`], but exits with an error message on bad input.
pub fn parse_duration_or_exit(s: &str, flag: &str) -> Duration {
    parse_duration(s).unwrap_or_else(|| {
        eprintln!("Invalid {flag} value: {s} (expected e.g. 500ms, 3s, 5m, 1h)");
        std::process::exit(2);
    })
}

/// Serialize `value` as pretty JSON to `path`, exiting on failure.
pub fn write_json<T: serde::Serialize + ?Sized>(value: &T, path: &str, label: &str) {
    if let Err(e) = try_write_json(value, path) {
        eprintln!("Error writing {label} to {path}: {e}");
        std::process::exit(1);
    }
    println!("\n{label} written to {path}");
}

fn try_write_json<T: serde::Serialize + ?Sized>(value: &T, path: &str) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
