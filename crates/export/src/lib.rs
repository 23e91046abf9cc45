//! Flat-file recording of snapshots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use sysmon_core::{snapshot::RECORD_HEADER, ExportSink, MonitorError, Result, Snapshot};

/// Writes one CSV row per snapshot, flushing after every row so that an
/// abrupt exit loses at most the row being written.
///
/// The header is written when the file is opened.  Dropping an exporter
/// closes it.
#[derive(Debug)]
pub struct CsvExporter {
    path:   PathBuf,
    writer: Option<BufWriter<File>>,
    rows:   u64,
}

impl CsvExporter {
    /// Create (or truncate) `path`, creating parent directories as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MonitorError::Export(format!("cannot create '{}': {e}", parent.display()))
            })?;
        }

        let file = File::create(&path)
            .map_err(|e| MonitorError::Export(format!("cannot open '{}': {e}", path.display())))?;
        let mut writer = BufWriter::new(file);
        write_row(&mut writer, RECORD_HEADER)?;
        writer.flush()?;

        tracing::info!("Exporting snapshots to {}", path.display());

        Ok(Self {
            path,
            writer: Some(writer),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far (header excluded).
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl ExportSink for CsvExporter {
    fn write(&mut self, snapshot: &Snapshot) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            MonitorError::Export(format!("'{}' is already closed", self.path.display()))
        })?;

        write_row(writer, snapshot.record())?;
        writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        writer.flush()?;
        writer.get_ref().sync_all()?;
        tracing::info!("Closed export '{}' after {} rows", self.path.display(), self.rows);
        Ok(())
    }
}

impl Drop for CsvExporter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::error!("Failed to close export '{}': {e}", self.path.display());
        }
    }
}

/// Fields are numbers and RFC 3339 timestamps, so no quoting is needed.
fn write_row<W, I, S>(writer: &mut W, fields: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            writer.write_all(b",")?;
        }
        writer.write_all(field.as_ref().as_bytes())?;
        first = false;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn snapshot(elapsed: f64) -> Snapshot {
        Snapshot {
            captured_at:     Local.timestamp_opt(1_700_000_000, 0).unwrap(),
            elapsed_seconds: elapsed,
            uptime_seconds:  80.0,
            cpu_percent:     40.0,
            ram_percent:     55.0,
            disk_percent:    70.0,
            process_count:   3,
            net_sent_bps:    300.0,
            net_recv_bps:    400.0,
        }
    }

    #[test]
    fn header_is_written_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let _exporter = CsvExporter::create(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "captured_at,elapsed_seconds,uptime_seconds,cpu_percent,ram_percent,\
             disk_percent,process_count,net_sent_bps,net_recv_bps\n"
        );
    }

    #[test]
    fn rows_are_durable_before_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let mut exporter = CsvExporter::create(&path).unwrap();

        exporter.write(&snapshot(1.0)).unwrap();
        exporter.write(&snapshot(2.0)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",1,80,40,55,70,3,300,400"), "row: {}", lines[1]);
        assert!(lines[2].ends_with(",2,80,40,55,70,3,300,400"), "row: {}", lines[2]);
        assert_eq!(exporter.rows(), 2);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("metrics.csv");
        let exporter = CsvExporter::create(&path).unwrap();
        assert!(exporter.path().exists());
    }

    #[test]
    fn close_is_idempotent_and_rejects_later_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = CsvExporter::create(dir.path().join("metrics.csv")).unwrap();

        exporter.close().unwrap();
        exporter.close().unwrap();

        let err = exporter.write(&snapshot(1.0)).unwrap_err();
        assert!(matches!(err, MonitorError::Export(_)), "got {err:?}");
    }
}
