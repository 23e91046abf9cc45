use crate::{error::Result, snapshot::Snapshot};

/// Destination for durable snapshot records (e.g. a CSV file).
///
/// The session calls [`write`](ExportSink::write) once per sampling tick and
/// [`close`](ExportSink::close) exactly once on shutdown.  Implementations
/// must make `close` idempotent: a second call is a no-op returning `Ok`.
pub trait ExportSink: Send + std::fmt::Debug {
    /// Record one snapshot.  The record must be durable when this returns.
    fn write(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Flush and release the underlying resource.
    fn close(&mut self) -> Result<()>;
}
