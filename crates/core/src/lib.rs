pub mod error;
pub mod export;
pub mod metric;
pub mod snapshot;

pub use error::{MonitorError, Result};
pub use export::ExportSink;
pub use metric::MetricSelector;
pub use snapshot::Snapshot;
