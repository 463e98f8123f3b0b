//! Periodic sampler: drives a [`SignalSource`] on a timer and summarizes.
//!
//! A [`Sampler`] is either *active* (a background thread ticks every
//! `period`) or *inert* (the platform can't be sampled; nothing ever runs and
//! [`Sampler::summarize`] always returns `None`). The choice is made once, at
//! construction.
//!
//! Ticks run on a single thread at a fixed rate. A tick whose command takes
//! longer than `period` delays the following ticks; the command must stay
//! well under the period to keep the cadence. Without a command timeout a
//! hung command blocks its tick forever, though [`Sampler::stop`] still
//! returns immediately.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::platform;
use crate::queue::SampleQueue;
use crate::source::{CommandSource, SignalSource};
use crate::stats::{self, Summary};

/// Default tick period.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(3);

/// Timing configuration for a sampler.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Wait before the first tick.
    pub initial_delay: Duration,
    /// Interval between tick start times.
    pub period: Duration,
    /// Kill the external command after this long. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            period: DEFAULT_PERIOD,
            command_timeout: None,
        }
    }
}

/// Periodic sampler owning the collected readings.
pub struct Sampler {
    samples: Arc<SampleQueue>,
    mode: Mode,
}

enum Mode {
    Active(Arc<TimerState>),
    Inert,
}

impl Sampler {
    /// Start sampling `pmset -g therm` if this platform supports it,
    /// otherwise return an inert sampler.
    pub fn start(config: &SamplerConfig) -> Self {
        if !platform::is_supported() {
            log::info!(
                "thermal sampling unsupported on {}, sampler is inert",
                std::env::consts::OS
            );
            return Self::inert();
        }
        let source = CommandSource::pmset().with_timeout(config.command_timeout);
        Self::with_source(source, config)
    }

    /// Start sampling `source` regardless of platform.
    pub fn with_source<S>(source: S, config: &SamplerConfig) -> Self
    where
        S: SignalSource + 'static,
    {
        let samples = Arc::new(SampleQueue::new());
        let timer = Arc::new(TimerState::default());

        let spawned = {
            let samples = Arc::clone(&samples);
            let timer = Arc::clone(&timer);
            let initial_delay = config.initial_delay;
            let period = config.period.max(Duration::from_millis(1));
            std::thread::Builder::new()
                .name("throttlewatch-sampler".to_string())
                .spawn(move || run_timer(&source, &samples, &timer, initial_delay, period))
        };

        // The handle is dropped: stopping never waits on an in-flight command.
        match spawned {
            Ok(_) => {
                log::info!("sampler started, period {:?}", config.period);
                Self {
                    samples,
                    mode: Mode::Active(timer),
                }
            }
            Err(e) => {
                log::warn!("could not spawn sampler thread: {e}");
                Self {
                    samples,
                    mode: Mode::Inert,
                }
            }
        }
    }

    /// A sampler that never ticks.
    pub fn inert() -> Self {
        Self {
            samples: Arc::new(SampleQueue::new()),
            mode: Mode::Inert,
        }
    }

    /// Whether the timer is running (constructed active and not yet stopped).
    pub fn is_active(&self) -> bool {
        match &self.mode {
            Mode::Active(timer) => !timer.is_stopped(),
            Mode::Inert => false,
        }
    }

    /// Statistics over everything collected so far; `None` if nothing was.
    pub fn summarize(&self) -> Option<Summary> {
        stats::summarize(&self.samples.snapshot())
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Copy of the readings collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<i32> {
        self.samples.snapshot()
    }

    /// Stop ticking. Returns immediately; an in-flight command is abandoned
    /// and its reading discarded. Safe to call more than once.
    pub fn stop(&self) {
        if let Mode::Active(timer) = &self.mode
            && timer.stop()
        {
            log::info!(
                "sampler stopped after {} readings",
                self.samples.len()
            );
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("active", &self.is_active())
            .field("samples", &self.samples.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TimerState {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl TimerState {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_stopped(&self) -> bool {
        *self.lock()
    }

    /// Returns `true` if this call did the stopping.
    fn stop(&self) -> bool {
        let mut stopped = self.lock();
        if *stopped {
            return false;
        }
        *stopped = true;
        self.wake.notify_all();
        true
    }

    /// Append `value` unless stopped. The stop flag stays locked across the
    /// push, so nothing lands in `samples` once [`TimerState::stop`] returns.
    fn push_unless_stopped(&self, samples: &SampleQueue, value: i32) -> bool {
        let stopped = self.lock();
        if *stopped {
            return false;
        }
        samples.push(value);
        true
    }

    /// Sleep until `deadline`. `false` if stopped first.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.lock();
        loop {
            if *stopped {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            stopped = self
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .0;
        }
    }
}

fn run_timer(
    source: &dyn SignalSource,
    samples: &SampleQueue,
    timer: &TimerState,
    initial_delay: Duration,
    period: Duration,
) {
    let mut next = Instant::now() + initial_delay;
    while timer.wait_until(next) {
        on_tick(source, samples, timer);
        next += period;
        // Skip missed ticks instead of firing them back to back.
        let now = Instant::now();
        if next < now {
            next = now;
        }
    }
}

fn on_tick(source: &dyn SignalSource, samples: &SampleQueue, timer: &TimerState) {
    let Some(value) = source.read() else {
        log::debug!("tick produced no reading");
        return;
    };
    if !timer.push_unless_stopped(samples, value) {
        log::debug!("discarding reading {value} taken after stop");
    }
}
