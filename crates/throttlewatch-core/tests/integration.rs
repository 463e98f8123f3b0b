//! Integration tests for throttlewatch-core.
//!
//! These tests drive the full pipeline:
//! signal source → sampler timer → sample queue → summary.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use throttlewatch_core::{
    CommandSource, SENTINEL, Sampler, SamplerConfig, SignalSource, is_supported,
    parse_speed_limit, summarize,
};

fn fast_config() -> SamplerConfig {
    SamplerConfig {
        period: Duration::from_millis(5),
        ..SamplerConfig::default()
    }
}

fn wait_for(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn summary_of_three_readings() {
    let s = summarize(&[70, 90, 80]).unwrap();
    assert_eq!(s.min, 70);
    assert_eq!(s.median, 80);
    assert_eq!(s.average, 80);
    assert_eq!(s.percentile(50), Some(80));
    assert_eq!(s.percentile(99), Some(90));
}

#[test]
fn summary_of_one_reading() {
    let s = summarize(&[80]).unwrap();
    assert_eq!((s.average, s.min, s.median), (80, 80, 80));
    assert!(s.percentiles.iter().all(|p| p.value == SENTINEL));
}

#[test]
fn parse_ignores_unrelated_lines() {
    let output = "Note: No thermal warning level has been recorded\n\
                  Note: No performance warning level has been recorded\n\
                  \n   CPU_Speed_Limit      =    73   \nCPU_Available_CPUs = 8\n";
    assert_eq!(parse_speed_limit(output), Some(73));
    assert_eq!(parse_speed_limit("CPU_Available_CPUs = 8\n"), None);
}

#[cfg(unix)]
#[test]
fn sampler_over_command_source() {
    let source = CommandSource::new(
        "sh",
        ["-c", "echo 'CPU_Speed_Limit = 64'"],
        "CPU_Speed_Limit",
    );
    let sampler = Sampler::with_source(source, &fast_config());
    assert!(wait_for(Duration::from_secs(10), || sampler.sample_count() >= 3));
    sampler.stop();

    let summary = sampler.summarize().unwrap();
    assert_eq!(summary.min, 64);
    assert_eq!(summary.median, 64);
    assert_eq!(summary.percentile(95), Some(64));
}

#[cfg(unix)]
#[test]
fn failing_command_never_produces_data() {
    let source = CommandSource::new(
        "sh",
        ["-c", "echo 'CPU_Speed_Limit = 64'; exit 2"],
        "CPU_Speed_Limit",
    );
    assert_eq!(source.read(), None);

    let sampler = Sampler::with_source(source, &fast_config());
    std::thread::sleep(Duration::from_millis(100));
    sampler.stop();
    assert!(sampler.summarize().is_none());
}

#[test]
fn n_successful_ticks_give_n_readings() {
    const N: usize = 25;
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let source = move || {
        let n = c.fetch_add(1, Ordering::SeqCst);
        (n < N).then_some(100 - n as i32)
    };

    let sampler = Sampler::with_source(source, &fast_config());
    assert!(wait_for(Duration::from_secs(10), || calls
        .load(Ordering::SeqCst)
        > N + 2));
    sampler.stop();
    sampler.stop();

    assert_eq!(sampler.sample_count(), N);
    let summary = sampler.summarize().unwrap();
    assert_eq!(summary.samples, N);
    assert_eq!(summary.min, 100 - (N as i32 - 1));
}

#[test]
fn concurrent_summaries_during_sampling() {
    let sampler = Arc::new(Sampler::with_source(|| Some(90), &fast_config()));
    std::thread::scope(|s| {
        for _ in 0..4 {
            let sampler = Arc::clone(&sampler);
            s.spawn(move || {
                for _ in 0..50 {
                    if let Some(summary) = sampler.summarize() {
                        assert_eq!(summary.median, 90);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            });
        }
    });
    sampler.stop();
}

#[test]
fn unsupported_platform_is_inert() {
    if is_supported() {
        return;
    }
    let sampler = Sampler::start(&SamplerConfig::default());
    assert!(!sampler.is_active());
    std::thread::sleep(Duration::from_millis(20));
    assert!(sampler.summarize().is_none());
}

#[test]
#[ignore] // Needs macOS with pmset. Run with: cargo test -- --ignored
fn pmset_produces_a_reading() {
    let value = CommandSource::pmset()
        .with_timeout(Some(Duration::from_secs(5)))
        .read();
    let value = value.expect("pmset -g therm should report CPU_Speed_Limit");
    assert!((0..=100).contains(&value), "unexpected value {value}");
}
