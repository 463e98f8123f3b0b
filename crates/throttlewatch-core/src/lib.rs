//! # throttlewatch-core
//!
//! Samples CPU thermal throttling while something long-running (a build, a
//! benchmark) is in progress, and summarizes what it saw.
//!
//! ## Quick Start
//!
//! ```no_run
//! use throttlewatch_core::{Sampler, SamplerConfig};
//!
//! // Starts ticking immediately on macOS; inert elsewhere.
//! let sampler = Sampler::start(&SamplerConfig::default());
//!
//! // ... run the build ...
//!
//! if let Some(summary) = sampler.summarize() {
//!     println!("min {} median {} p95 {:?}", summary.min, summary.median, summary.percentile(95));
//! }
//! sampler.stop();
//! ```
//!
//! ## Architecture
//!
//! Signal source → timer tick → sample queue → summary on demand
//!
//! Every reading comes from a [`SignalSource`]. The production source,
//! [`CommandSource::pmset`], runs `pmset -g therm` and reads the
//! `CPU_Speed_Limit` line: 100 means unthrottled, lower means the CPU clock is
//! being held back. Failed or unparsable readings are dropped silently, so
//! sampling never gets in the way of the work being observed.

pub mod command;
pub mod platform;
pub mod queue;
pub mod sampler;
pub mod source;
pub mod stats;

pub use platform::{PlatformInfo, is_supported, platform_info};
pub use queue::SampleQueue;
pub use sampler::{DEFAULT_PERIOD, Sampler, SamplerConfig};
pub use source::{
    CommandSource, PMSET_ARGS, PMSET_PROGRAM, SPEED_LIMIT_FIELD, SignalSource, parse_field,
    parse_speed_limit,
};
pub use stats::{PERCENTILE_RANKS, Percentile, SENTINEL, Summary, summarize};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
