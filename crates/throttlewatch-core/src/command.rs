//! Subprocess helpers for sources that shell out to system utilities.
//!
//! Every failure mode (launch error, non-zero exit, timeout) collapses to
//! `None`. Callers treat that as "no data this time", never as an error.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Interval between `try_wait` polls while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Run `program` with `args` and return its stdout as text.
///
/// stdin is closed and stderr discarded. Returns `None` if the process cannot
/// be spawned or exits with a non-zero status. With `timeout` set, a process
/// still running after that long is killed and `None` is returned; without
/// it, the call waits for the process however long it takes.
pub fn run_command(program: &str, args: &[&str], timeout: Option<Duration>) -> Option<String> {
    match timeout {
        Some(limit) => run_with_timeout(program, args, limit),
        None => run_to_completion(program, args),
    }
}

fn run_to_completion(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            log::debug!("failed to launch {program}: {e}");
            return None;
        }
    };

    if !output.status.success() {
        log::debug!("{program} exited with {}", output.status);
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn run_with_timeout(program: &str, args: &[&str], limit: Duration) -> Option<String> {
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            log::debug!("failed to launch {program}: {e}");
            return None;
        }
    };

    // Drain stdout while waiting; a full pipe would otherwise stall the child.
    let reader = child.stdout.take().map(|mut stdout| {
        std::thread::spawn(move || {
            let mut out = Vec::new();
            let _ = stdout.read_to_end(&mut out);
            out
        })
    });

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    log::debug!("{program} exited with {status}");
                    return None;
                }
                let out = match reader {
                    Some(handle) => handle.join().unwrap_or_default(),
                    None => Vec::new(),
                };
                return Some(String::from_utf8_lossy(&out).into_owned());
            }
            Ok(None) => {
                if start.elapsed() >= limit {
                    log::warn!("{program} still running after {limit:?}, killing it");
                    let _ = child.kill();
                    let _ = child.wait();
                    // The reader is left detached: a grandchild may still hold the pipe open.
                    return None;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                log::debug!("waiting on {program} failed: {e}");
                return None;
            }
        }
    }
}
