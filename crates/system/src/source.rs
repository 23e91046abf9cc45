use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Instant;
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use sysmon_core::{MonitorError, Result};

/// Cumulative network byte counters summed over all interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// Raw host readings consumed by [`StatsSampler`](crate::StatsSampler).
///
/// Every method reads the live value at the time of the call.  Methods take
/// `&mut self` because real sources refresh internal caches on read.
pub trait HostSource {
    /// Monotonic clock in seconds.  Only differences are meaningful.
    fn monotonic(&mut self) -> f64;
    /// Current wall-clock time.
    fn wall_clock(&mut self) -> DateTime<Local>;
    /// Host boot time as seconds since the Unix epoch.
    fn boot_time(&mut self) -> f64;
    /// Global CPU utilisation since the previous call (0.0 – 100.0).
    fn cpu_percent(&mut self) -> f64;
    /// Virtual memory usage (0.0 – 100.0).
    fn memory_percent(&mut self) -> f64;
    /// Usage of the configured root filesystem (0.0 – 100.0).
    fn disk_percent(&mut self) -> f64;
    /// Number of processes currently known to the kernel.
    fn process_count(&mut self) -> usize;
    /// Cumulative bytes sent / received since boot.
    fn net_counters(&mut self) -> NetCounters;
}

/// [`HostSource`] backed by the `sysinfo` crate.
pub struct SysinfoSource {
    sys:       System,
    disks:     Disks,
    networks:  Networks,
    disk_path: PathBuf,
    mount:     MountWatch,
    epoch:     Instant,
}

impl SysinfoSource {
    /// Open the host metrics source, reporting disk usage for `disk_path`.
    ///
    /// `disk_path` may be any existing path; usage is reported for the
    /// filesystem it lives on.  Fails when the platform is unsupported, the
    /// path does not exist or no mounted filesystem covers it.  There is no
    /// degraded mode: either every metric can be read or the source is
    /// unavailable.
    pub fn new(disk_path: impl Into<PathBuf>) -> Result<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MonitorError::Source(format!(
                "host metrics are not supported on {}",
                std::env::consts::OS
            )));
        }

        let requested = disk_path.into();
        let disk_path = std::fs::canonicalize(&requested).map_err(|e| {
            MonitorError::Source(format!("cannot resolve '{}': {e}", requested.display()))
        })?;
        let disks = Disks::new_with_refreshed_list();
        if find_mount(&disks, &disk_path).is_none() {
            return Err(MonitorError::Source(format!(
                "no mounted filesystem covers '{}'",
                disk_path.display()
            )));
        }

        let mut sys = System::new();
        // The first CPU reading is always 0; prime it so the first sample is
        // measured against construction time.
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        tracing::debug!(
            cpus = sys.cpus().len(),
            disk = %disk_path.display(),
            "host metrics source opened"
        );

        Ok(Self {
            sys,
            disks,
            networks: Networks::new_with_refreshed_list(),
            disk_path,
            mount: MountWatch::default(),
            epoch: Instant::now(),
        })
    }
}

impl std::fmt::Debug for SysinfoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoSource")
            .field("disk_path", &self.disk_path)
            .finish_non_exhaustive()
    }
}

impl HostSource for SysinfoSource {
    fn monotonic(&mut self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn wall_clock(&mut self) -> DateTime<Local> {
        Local::now()
    }

    fn boot_time(&mut self) -> f64 {
        System::boot_time() as f64
    }

    fn cpu_percent(&mut self) -> f64 {
        self.sys.refresh_cpu_usage();
        f64::from(self.sys.global_cpu_usage())
    }

    fn memory_percent(&mut self) -> f64 {
        self.sys.refresh_memory();
        percent(self.sys.used_memory(), self.sys.total_memory())
    }

    fn disk_percent(&mut self) -> f64 {
        self.disks.refresh(false);
        let usage = find_mount(&self.disks, &self.disk_path);
        if self.mount.observe(usage.is_some()) {
            tracing::warn!(
                "No mounted filesystem covers '{}' any more; reporting 0% disk usage",
                self.disk_path.display()
            );
        }
        usage.map_or(0.0, |(used, total)| percent(used, total))
    }

    fn process_count(&mut self) -> usize {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        self.sys.processes().len()
    }

    fn net_counters(&mut self) -> NetCounters {
        self.networks.refresh(false); // false = keep existing interfaces list
        self.networks
            .iter()
            .fold(NetCounters::default(), |acc, (_, data)| NetCounters {
                bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
                bytes_recv: acc.bytes_recv.saturating_add(data.total_received()),
            })
    }
}

/// Tracks whether the disk path is still covered by a mount, so a lost mount
/// is reported once rather than on every tick.
#[derive(Debug, Default)]
struct MountWatch {
    lost: bool,
}

impl MountWatch {
    /// Record the latest lookup.  Returns `true` only when the mount has just
    /// gone missing.
    fn observe(&mut self, present: bool) -> bool {
        let newly_lost = !present && !self.lost;
        if present && self.lost {
            tracing::info!("Disk path is mounted again");
        }
        self.lost = !present;
        newly_lost
    }
}

/// `(used, total)` bytes of the filesystem `path` lives on.
fn find_mount(disks: &Disks, path: &Path) -> Option<(u64, u64)> {
    covering_mount(
        disks.iter().map(|d| {
            let total = d.total_space();
            (d.mount_point(), total.saturating_sub(d.available_space()), total)
        }),
        path,
    )
}

/// Pick the deepest mount point that is a prefix of `path`.
fn covering_mount<'a>(
    mounts: impl IntoIterator<Item = (&'a Path, u64, u64)>,
    path: &Path,
) -> Option<(u64, u64)> {
    mounts
        .into_iter()
        .filter(|(mount, _, _)| path.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.components().count())
        .map(|(_, used, total)| (used, total))
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}
