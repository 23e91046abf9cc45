use chrono::{DateTime, Local, SecondsFormat};

/// Column names of an exported snapshot record, in order.
pub const RECORD_HEADER: [&str; 9] = [
    "captured_at",
    "elapsed_seconds",
    "uptime_seconds",
    "cpu_percent",
    "ram_percent",
    "disk_percent",
    "process_count",
    "net_sent_bps",
    "net_recv_bps",
];

/// A point-in-time snapshot of host resource usage.
///
/// Produced by the stats sampler once per sampling tick and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Wall-clock time of capture.
    pub captured_at: DateTime<Local>,
    /// Monotonic seconds since the sampler started.  Never decreases.
    pub elapsed_seconds: f64,
    /// Host uptime in seconds, clamped to `0` under clock skew.
    pub uptime_seconds: f64,
    /// Global CPU usage (0.0 – 100.0).
    pub cpu_percent: f64,
    /// Virtual memory usage (0.0 – 100.0).
    pub ram_percent: f64,
    /// Usage of the configured root filesystem (0.0 – 100.0).
    pub disk_percent: f64,
    /// Number of processes on the host.
    pub process_count: usize,
    /// Upload rate in bytes/second, derived from cumulative counters.
    pub net_sent_bps: f64,
    /// Download rate in bytes/second, derived from cumulative counters.
    pub net_recv_bps: f64,
}

impl Snapshot {
    /// Render the snapshot as one export record, columns ordered as in
    /// [`RECORD_HEADER`].
    #[must_use]
    pub fn record(&self) -> [String; 9] {
        [
            self.captured_at.to_rfc3339_opts(SecondsFormat::Micros, false),
            self.elapsed_seconds.to_string(),
            self.uptime_seconds.to_string(),
            self.cpu_percent.to_string(),
            self.ram_percent.to_string(),
            self.disk_percent.to_string(),
            self.process_count.to_string(),
            self.net_sent_bps.to_string(),
            self.net_recv_bps.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Snapshot {
        Snapshot {
            captured_at:     Local.timestamp_opt(1_700_000_000, 0).unwrap(),
            elapsed_seconds: 2.5,
            uptime_seconds:  80.0,
            cpu_percent:     40.0,
            ram_percent:     55.5,
            disk_percent:    70.0,
            process_count:   3,
            net_sent_bps:    300.0,
            net_recv_bps:    400.25,
        }
    }

    #[test]
    fn record_matches_header_order() {
        let record = sample().record();
        assert_eq!(record.len(), RECORD_HEADER.len());
        assert_eq!(&record[1..], ["2.5", "80", "40", "55.5", "70", "3", "300", "400.25"]);
    }

    #[test]
    fn timestamp_is_iso8601() {
        let snapshot = sample();
        let stamp = &snapshot.record()[0];
        let parsed = DateTime::parse_from_rfc3339(stamp).unwrap();
        assert_eq!(parsed.timestamp(), snapshot.captured_at.timestamp());
    }
}
