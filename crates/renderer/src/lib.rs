//! Text rendering of the dashboard.
//!
//! Turns the latest [`Snapshot`](sysmon_core::Snapshot) and a computed
//! [`Window`](sysmon_system::Window) into a plain-text frame: gauges, quick
//! stats, a status line and one sparkline per visible series.

pub mod format;
pub mod frame;

pub use format::{format_count, format_duration, format_rate};
pub use frame::{render_frame, sparkline};
