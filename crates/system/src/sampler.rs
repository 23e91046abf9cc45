use crate::source::{HostSource, NetCounters, SysinfoSource};
use std::path::PathBuf;
use sysmon_core::{Result, Snapshot};

/// Floor for the time between two network-counter reads, in seconds.
const MIN_RATE_WINDOW_SECS: f64 = 1e-6;

/// Produces one [`Snapshot`] per call to [`sample`](Self::sample).
///
/// Network throughput is not observable directly: the sampler keeps the
/// cumulative counters from the previous call and divides the difference by
/// the monotonic time between the two reads.
#[derive(Debug)]
pub struct StatsSampler<S: HostSource = SysinfoSource> {
    source:        S,
    started:       f64,
    boot_time:     f64,
    last_net_time: f64,
    last_net:      NetCounters,
    last_elapsed:  f64,
}

impl StatsSampler<SysinfoSource> {
    /// Open the live host source.  Fails if host metrics are unavailable.
    pub fn open(disk_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(SysinfoSource::new(disk_path)?))
    }
}

impl<S: HostSource> StatsSampler<S> {
    /// Wrap an already-opened source.  The boot time and the baseline network
    /// counters are read once, here.
    pub fn new(mut source: S) -> Self {
        let started   = source.monotonic();
        let boot_time = source.boot_time();
        let last_net  = source.net_counters();

        Self {
            source,
            started,
            boot_time,
            last_net_time: started,
            last_net,
            last_elapsed: 0.0,
        }
    }

    /// Read the host and build a snapshot.
    pub fn sample(&mut self) -> Snapshot {
        let now = self.source.monotonic();
        let elapsed_seconds = (now - self.started).max(self.last_elapsed);
        self.last_elapsed = elapsed_seconds;

        let captured_at = self.source.wall_clock();
        let wall_secs = captured_at.timestamp_micros() as f64 / 1e6;
        let uptime_seconds = (wall_secs - self.boot_time).max(0.0);

        let cpu_percent   = self.source.cpu_percent().clamp(0.0, 100.0);
        let ram_percent   = self.source.memory_percent().clamp(0.0, 100.0);
        let disk_percent  = self.source.disk_percent().clamp(0.0, 100.0);
        let process_count = self.source.process_count();

        let net = self.source.net_counters();
        let window = (now - self.last_net_time).max(MIN_RATE_WINDOW_SECS);
        let net_sent_bps = rate(self.last_net.bytes_sent, net.bytes_sent, window);
        let net_recv_bps = rate(self.last_net.bytes_recv, net.bytes_recv, window);
        self.last_net_time = now;
        self.last_net = net;

        Snapshot {
            captured_at,
            elapsed_seconds,
            uptime_seconds,
            cpu_percent,
            ram_percent,
            disk_percent,
            process_count,
            net_sent_bps,
            net_recv_bps,
        }
    }
}

/// Bytes per second between two cumulative readings.  A counter that went
/// backwards (interface reset) yields `0`.
fn rate(previous: u64, current: u64, window_secs: f64) -> f64 {
    current.saturating_sub(previous) as f64 / window_secs
}
