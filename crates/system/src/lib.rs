//! Sampling, history and windowing engine.
//!
//! - [`source`] : where raw host counters come from (`sysinfo` in production)
//! - [`sampler`]: turns counters into [`Snapshot`](sysmon_core::Snapshot)s, deriving network rates
//! - [`history`]: fixed-capacity, index-aligned time series
//! - [`window`] : trailing-window selection and axis range computation

pub mod history;
pub mod sampler;
pub mod source;
pub mod window;

pub use history::{HistoryBuffer, HistoryPoint};
pub use sampler::StatsSampler;
pub use source::{HostSource, NetCounters, SysinfoSource};
pub use window::{compute_window, tight_range, Metric, Series, Window};
