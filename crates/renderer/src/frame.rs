use crate::format::{format_count, format_duration, format_rate};
use std::fmt::Write;
use sysmon_core::{MetricSelector, Snapshot};
use sysmon_system::{Metric, Window};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Build one dashboard frame.
///
/// `window` is `None` while the history is still empty; the graph section is
/// then left out.
pub fn render_frame(snapshot: &Snapshot, window: Option<&Window>, selector: MetricSelector) -> String {
    let mut out = String::new();

    // ── Gauges ───────────────────────────────────────────────────────────────
    let _ = writeln!(
        out,
        "CPU {:5.1}%  RAM {:5.1}%",
        snapshot.cpu_percent, snapshot.ram_percent
    );

    // ── Quick stats ──────────────────────────────────────────────────────────
    let _ = writeln!(
        out,
        "Disk {:.1}% | Processes {} | Net {} down",
        snapshot.disk_percent,
        format_count(snapshot.process_count),
        format_rate(snapshot.net_recv_bps),
    );
    let _ = writeln!(
        out,
        "Uptime {} | Capture {}",
        format_duration(snapshot.uptime_seconds),
        snapshot.captured_at.format("%H:%M:%S"),
    );
    let _ = writeln!(
        out,
        "Upload {} | Download {}",
        format_rate(snapshot.net_sent_bps),
        format_rate(snapshot.net_recv_bps),
    );

    // ── Graph ────────────────────────────────────────────────────────────────
    if let Some(window) = window {
        let (y_min, y_max) = window.y_range;
        let (x_start, x_end) = window.x_range;
        let _ = writeln!(
            out,
            "{} [{y_min:.1} – {y_max:.1}] over {x_start:.1}s – {x_end:.1}s",
            selector.title()
        );
        for series in &window.series {
            let label = match series.metric {
                Metric::Cpu => "CPU",
                Metric::Ram => "RAM",
            };
            let _ = writeln!(out, "{label} {}", sparkline(&series.values, window.y_range));
        }
    }

    out
}

/// One bar glyph per value, scaled into `range`.  Values outside the range
/// are pinned to the lowest / highest glyph.
pub fn sparkline(values: &[f64], range: (f64, f64)) -> String {
    let (low, high) = range;
    let span = high - low;
    let top = (BARS.len() - 1) as f64;

    values
        .iter()
        .map(|&v| {
            let level = if span > 0.0 { ((v - low) / span * top).round() } else { 0.0 };
            BARS[level.clamp(0.0, top) as usize]
        })
        .collect()
}
