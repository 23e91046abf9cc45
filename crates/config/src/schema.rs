use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use sysmon_core::MetricSelector;

/// Smallest sampling interval accepted, so the sampler cannot starve the host.
pub const MIN_INTERVAL_MS: u64 = 250;
/// Smallest history window accepted.
pub const MIN_HISTORY_SECONDS: u64 = 10;

/// Root configuration structure parsed from `sysmon.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub sampling: SamplingConfig,
    pub history: HistoryConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

impl MonitorConfig {
    /// Sampling interval with the [`MIN_INTERVAL_MS`] floor applied.
    pub fn interval_ms(&self) -> u64 {
        floor("sampling.interval_ms", self.sampling.interval_ms, MIN_INTERVAL_MS)
    }

    /// Visible history window with the [`MIN_HISTORY_SECONDS`] floor applied.
    pub fn history_seconds(&self) -> u64 {
        floor("history.history_seconds", self.history.history_seconds, MIN_HISTORY_SECONDS)
    }

    /// Render tick interval; defaults to the sampling interval.
    pub fn render_interval_ms(&self) -> u64 {
        match self.display.render_interval_ms {
            Some(ms) => floor("display.render_interval_ms", ms, MIN_INTERVAL_MS),
            None     => self.interval_ms(),
        }
    }
}

fn floor(key: &str, value: u64, min: u64) -> u64 {
    if value < min {
        tracing::warn!("{key} = {value} is below the minimum; using {min}");
        min
    } else {
        value
    }
}

/// `[sampling]`: how often and where the host is sampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Milliseconds between two samples.
    pub interval_ms: u64,
    /// Mount point whose usage is reported as `disk_percent`.
    pub disk_path: PathBuf,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            disk_path:   PathBuf::from("/"),
        }
    }
}

/// `[history]`: how much of the past the graph shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Trailing window shown by the graph, in seconds.
    pub history_seconds: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { history_seconds: 30 }
    }
}

/// `[display]`: the text dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Series drawn by the graph.
    pub graph: MetricSelector,
    /// Print a dashboard frame on every render tick.
    pub render: bool,
    /// Render tick interval; `None` = same as the sampling interval.
    pub render_interval_ms: Option<u64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            graph:              MetricSelector::Cpu,
            render:             true,
            render_interval_ms: None,
        }
    }
}

/// `[export]`: optional flat-file recording of every snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// CSV destination.  `None` disables export.
    pub csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.interval_ms(), 1_000);
        assert_eq!(cfg.history_seconds(), 30);
        assert_eq!(cfg.render_interval_ms(), 1_000);
        assert_eq!(cfg.display.graph, MetricSelector::Cpu);
        assert!(cfg.export.csv.is_none());
    }

    #[test]
    fn floors_are_enforced() {
        let mut cfg = MonitorConfig::default();
        cfg.sampling.interval_ms = 10;
        cfg.history.history_seconds = 2;
        cfg.display.render_interval_ms = Some(1);
        assert_eq!(cfg.interval_ms(), MIN_INTERVAL_MS);
        assert_eq!(cfg.history_seconds(), MIN_HISTORY_SECONDS);
        assert_eq!(cfg.render_interval_ms(), MIN_INTERVAL_MS);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [sampling]
            interval_ms = 500

            [display]
            graph = "both"

            [export]
            csv = "/tmp/sysmon.csv"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.interval_ms(), 500);
        assert_eq!(cfg.sampling.disk_path, PathBuf::from("/"));
        assert_eq!(cfg.history_seconds(), 30);
        assert_eq!(cfg.display.graph, MetricSelector::Both);
        assert!(cfg.display.render);
        assert_eq!(cfg.export.csv, Some(PathBuf::from("/tmp/sysmon.csv")));
    }
}
