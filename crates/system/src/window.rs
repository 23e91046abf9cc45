//! Trailing-window selection and axis range computation for the graph.
//!
//! Values are percentages, so every y range is clamped to `[0, 100]`.  A
//! plain min/max auto-range misbehaves on flat series (zero-height axis) and
//! near the ceiling (axis implying values above 100%), hence the two padding
//! rules in [`tight_range`].

use crate::history::{HistoryBuffer, HistoryPoint};
use sysmon_core::MetricSelector;

/// Space left after the newest point so it isn't drawn on the axis edge.
pub const LOOKAHEAD_SECONDS: f64 = 0.5;

const DOMAIN_MIN: f64 = 0.0;
const DOMAIN_MAX: f64 = 100.0;
const SPREAD_PAD: f64 = 2.0;
const FLAT_PAD: f64 = 2.5;
const FLAT_PAD_NEAR_CEILING: f64 = 1.0;
const CEILING_THRESHOLD: f64 = 95.0;

/// A single plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Ram,
}

impl Metric {
    fn value(self, point: &HistoryPoint) -> f64 {
        match self {
            Self::Cpu => point.cpu_percent,
            Self::Ram => point.ram_percent,
        }
    }
}

/// Visible slice of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Metric,
    pub times:  Vec<f64>,
    pub values: Vec<f64>,
}

/// What the graph should draw on this render tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// `(start, end)` of the x axis, lookahead included.
    pub x_range: (f64, f64),
    /// `(min, max)` of the y axis.
    pub y_range: (f64, f64),
    pub series:  Vec<Series>,
}

/// Number of samples taken every `interval_ms` that fit in `window_seconds`.
pub fn window_points(window_seconds: f64, interval_ms: u64) -> usize {
    let points = (window_seconds * 1000.0 / interval_ms.max(1) as f64).floor();
    if points.is_finite() && points >= 1.0 {
        points as usize
    } else {
        1
    }
}

/// Padded `(min, max)` of `values`, clamped to `[0, 100]`.
///
/// - empty: the whole domain
/// - flat: ±2.5, or ±1.0 at or above 95
/// - otherwise: ±2.0
pub fn tight_range(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (DOMAIN_MIN, DOMAIN_MAX);
    }

    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let pad = if low == high {
        if low < CEILING_THRESHOLD { FLAT_PAD } else { FLAT_PAD_NEAR_CEILING }
    } else {
        SPREAD_PAD
    };

    ((low - pad).max(DOMAIN_MIN), (high + pad).min(DOMAIN_MAX))
}

/// Select the trailing `window_seconds` of `history` for `selector` and
/// compute the axis ranges.  Returns `None` when there is nothing to draw.
pub fn compute_window(
    history: &HistoryBuffer,
    window_seconds: f64,
    interval_ms: u64,
    selector: MetricSelector,
) -> Option<Window> {
    let x_end = history.latest()?.elapsed_seconds;
    let x_start = (x_end - window_seconds).max(0.0);

    let size = window_points(window_seconds, interval_ms);
    let metrics: &[Metric] = match selector {
        MetricSelector::Cpu  => &[Metric::Cpu],
        MetricSelector::Ram  => &[Metric::Ram],
        MetricSelector::Both => &[Metric::Cpu, Metric::Ram],
    };

    let series: Vec<Series> = metrics
        .iter()
        .map(|&metric| {
            let (times, values) = history
                .last_k(size)
                .map(|p| (p.elapsed_seconds, metric.value(p)))
                .unzip();
            Series { metric, times, values }
        })
        .collect();

    // A shared axis must bound every series drawn on it.
    let combined: Vec<f64> = series.iter().flat_map(|s| s.values.iter().copied()).collect();

    Some(Window {
        x_range: (x_start, x_end + LOOKAHEAD_SECONDS),
        y_range: tight_range(&combined),
        series,
    })
}
