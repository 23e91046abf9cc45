use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),

    /// The host metrics source could not be opened.  Always fatal at startup.
    #[error("metrics source unavailable: {0}")]
    Source(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
