//! `throttlewatch read` — take one reading and print it.

use std::time::Duration;

use throttlewatch_core::{CommandSource, SignalSource, platform_info};

pub fn run(timeout_ms: Option<u64>) {
    let info = platform_info();
    if !info.supported {
        eprintln!(
            "Warning: pmset is not available on {}/{}, expect no reading",
            info.os, info.arch
        );
    }

    let source = CommandSource::pmset().with_timeout(timeout_ms.map(Duration::from_millis));
    match source.read() {
        Some(value) => println!("{}: {value}", source.field()),
        None => println!("{}: unavailable", source.field()),
    }
}
