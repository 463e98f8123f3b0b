//! `throttlewatch sample` — sample throttling for a session, then summarize.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use throttlewatch_core::{
    CommandSource, PlatformInfo, Sampler, SamplerConfig, Summary, platform_info,
};

/// Prefix for `--report` lines.
const REPORT_PREFIX: &str = "cpu_speed_limit";

pub struct SampleCommandConfig<'a> {
    pub interval: &'a str,
    pub duration: Option<&'a str>,
    pub timeout_ms: Option<u64>,
    pub output_path: Option<&'a str>,
    pub report: bool,
    pub force: bool,
}

/// What `--output` writes.
#[derive(Serialize)]
struct SessionReport {
    platform: PlatformInfo,
    interval_ms: u64,
    elapsed_ms: u64,
    summary: Option<Summary>,
    throttlewatch_version: &'static str,
}

pub fn run(cfg: SampleCommandConfig<'_>) {
    let interval = super::parse_duration_or_exit(cfg.interval, "--interval");
    if interval.is_zero() {
        eprintln!("Invalid --interval value: {} (must be > 0)", cfg.interval);
        std::process::exit(2);
    }
    let max_duration = cfg
        .duration
        .map(|d| super::parse_duration_or_exit(d, "--duration"));

    let config = SamplerConfig {
        period: interval,
        command_timeout: cfg.timeout_ms.map(Duration::from_millis),
        ..SamplerConfig::default()
    };

    let info = platform_info();
    let sampler = if cfg.force && !info.supported {
        log::warn!("forcing pmset sampling on unsupported platform {}", info.os);
        Sampler::with_source(
            CommandSource::pmset().with_timeout(config.command_timeout),
            &config,
        )
    } else {
        Sampler::start(&config)
    };

    if !sampler.is_active() {
        eprintln!(
            "Warning: thermal sampling is not supported on {}/{}; no data will be collected",
            info.os, info.arch
        );
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Warning: could not install Ctrl+C handler: {e}");
    }

    println!("Sampling CPU thermal throttling");
    println!("  Interval:  {}ms", interval.as_millis());
    match max_duration {
        Some(d) => println!("  Duration:  {}s", d.as_secs()),
        None => println!("  Duration:  until Ctrl+C"),
    }
    match config.command_timeout {
        Some(t) => println!("  Timeout:   {}ms", t.as_millis()),
        None => println!("  Timeout:   none"),
    }
    println!();

    let start = Instant::now();
    while running.load(Ordering::SeqCst) {
        if let Some(max) = max_duration
            && start.elapsed() >= max
        {
            break;
        }
        print!(
            "\r  Samples: {:<8} Elapsed: {:.1}s",
            sampler.sample_count(),
            start.elapsed().as_secs_f64()
        );
        let _ = std::io::Write::flush(&mut std::io::stdout());
        std::thread::sleep(Duration::from_millis(100));
    }
    let elapsed = start.elapsed();

    sampler.stop();
    println!();

    let summary = sampler.summarize();
    print_summary(summary.as_ref(), elapsed);
    if cfg.report
        && let Some(ref s) = summary
    {
        println!();
        for (name, value) in s.report_values(REPORT_PREFIX) {
            println!("{name}={value}");
        }
    }

    if let Some(path) = cfg.output_path {
        let report = SessionReport {
            platform: info,
            interval_ms: interval.as_millis() as u64,
            elapsed_ms: elapsed.as_millis() as u64,
            summary,
            throttlewatch_version: throttlewatch_core::VERSION,
        };
        super::write_json(&report, path, "Session summary");
    }
}

fn print_summary(summary: Option<&Summary>, elapsed: Duration) {
    println!("\n{:=<68}", "");
    println!("CPU_Speed_Limit ({:.1}s)", elapsed.as_secs_f64());
    println!("{:=<68}", "");
    for line in summary_lines(summary) {
        println!("  {line}");
    }
}

fn summary_lines(summary: Option<&Summary>) -> Vec<String> {
    let Some(s) = summary else {
        return vec!["no readings collected".to_string()];
    };
    let ladder = s
        .percentiles
        .iter()
        .map(|p| format!("p{}={}", p.rank, p.value))
        .collect::<Vec<_>>()
        .join("  ");
    vec![
        format!("samples: {}", s.samples),
        format!("average: {}   min: {}   median: {}", s.average, s.min, s.median),
        format!("percentiles: {ladder}"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_line() {
        assert_eq!(summary_lines(None), vec!["no readings collected"]);
    }

    #[test]
    fn summary_lines_show_ladder() {
        let s = throttlewatch_core::summarize(&[70, 90, 80]).unwrap();
        let lines = summary_lines(Some(&s));
        assert_eq!(lines[0], "samples: 3");
        assert_eq!(lines[1], "average: 80   min: 70   median: 80");
        assert_eq!(lines[2], "percentiles: p50=80  p75=90  p95=90  p99=90");
    }

    #[test]
    fn single_reading_shows_sentinels() {
        let s = throttlewatch_core::summarize(&[80]).unwrap();
        let lines = summary_lines(Some(&s));
        assert_eq!(lines[2], "percentiles: p50=-1  p75=-1  p95=-1  p99=-1");
    }

    #[test]
    fn session_report_serializes() {
        let report = SessionReport {
            platform: platform_info(),
            interval_ms: 3000,
            elapsed_ms: 9100,
            summary: throttlewatch_core::summarize(&[100, 100, 60]),
            throttlewatch_version: throttlewatch_core::VERSION,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["interval_ms"], 3000);
        assert_eq!(json["summary"]["min"], 60);
        assert_eq!(json["summary"]["samples"], 3);
    }
}
