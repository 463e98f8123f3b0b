//! Summary statistics over collected readings.
//!
//! The index conventions here are deliberate and must stay stable, since
//! reported numbers are compared across runs:
//! - readings are sorted ascending, so the most throttled sample comes first;
//! - the median is the element at `n / 2` (upper median for even counts);
//! - a percentile is the element at `ceil(rank / 100 * n) - 1`, and is only
//!   defined for more than one reading ([`SENTINEL`] otherwise).

use serde::{Deserialize, Serialize};

/// Ranks always reported together, in this order.
pub const PERCENTILE_RANKS: [u8; 4] = [50, 75, 95, 99];

/// Value reported where a statistic is undefined for the data at hand.
pub const SENTINEL: i32 = -1;

/// One entry of the percentile ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentile {
    pub rank: u8,
    pub value: i32,
}

/// Statistics over a snapshot of readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of readings the summary was computed from.
    pub samples: usize,
    /// Arithmetic mean, truncated toward zero.
    pub average: i32,
    pub min: i32,
    /// Upper median.
    pub median: i32,
    /// One entry per rank in [`PERCENTILE_RANKS`].
    pub percentiles: Vec<Percentile>,
}

impl Summary {
    /// Value for `rank`, if it is part of the ladder.
    pub fn percentile(&self, rank: u8) -> Option<i32> {
        self.percentiles
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.value)
    }

    /// Flatten into `(name, value)` pairs for a key/value reporting sink.
    ///
    /// Names are `{prefix}.average`, `{prefix}.min`, `{prefix}.median` and
    /// `{prefix}.p{rank}`.
    pub fn report_values(&self, prefix: &str) -> Vec<(String, String)> {
        let mut out = vec![
            (format!("{prefix}.average"), self.average.to_string()),
            (format!("{prefix}.min"), self.min.to_string()),
            (format!("{prefix}.median"), self.median.to_string()),
        ];
        out.extend(
            self.percentiles
                .iter()
                .map(|p| (format!("{prefix}.p{}", p.rank), p.value.to_string())),
        );
        out
    }
}

/// Summarize `readings` in any order. `None` when there are no readings.
pub fn summarize(readings: &[i32]) -> Option<Summary> {
    if readings.is_empty() {
        return None;
    }

    let mut sorted = readings.to_vec();
    sorted.sort_unstable();

    let sum: i64 = sorted.iter().map(|&v| i64::from(v)).sum();
    let average = (sum / sorted.len() as i64) as i32;

    let percentiles = PERCENTILE_RANKS
        .iter()
        .map(|&rank| Percentile {
            rank,
            value: percentile(&sorted, rank),
        })
        .collect();

    Some(Summary {
        samples: sorted.len(),
        average,
        min: sorted.first().copied().unwrap_or(SENTINEL),
        median: sorted[sorted.len() / 2],
        percentiles,
    })
}

/// Nearest-rank percentile of an ascending `sorted` slice.
///
/// Returns [`SENTINEL`] when the slice has one element or none.
pub fn percentile(sorted: &[i32], rank: u8) -> i32 {
    if sorted.len() <= 1 {
        return SENTINEL;
    }
    let index = (f64::from(rank) / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted
        .get(index.saturating_sub(1))
        .copied()
        .unwrap_or(SENTINEL)
}
