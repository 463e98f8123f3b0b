//! Platform capability check.

use serde::Serialize;

/// Whether `pmset -g therm` exists on this platform (macOS only).
pub fn is_supported() -> bool {
    cfg!(target_os = "macos")
}

/// Host description printed alongside results.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformInfo {
    pub os: String,
    pub arch: String,
    pub cpu_count: usize,
    pub supported: bool,
}

pub fn platform_info() -> PlatformInfo {
    PlatformInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_count: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        supported: is_supported(),
    }
}
