pub mod schema;

pub use schema::{
    DisplayConfig, ExportConfig, HistoryConfig, MonitorConfig, SamplingConfig,
    MIN_HISTORY_SECONDS, MIN_INTERVAL_MS,
};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use sysmon_core::{MonitorError, Result};

/// Read the sysmon config at `path`.
///
/// A missing file is not an error: the monitor falls back to the built-in
/// defaults.  An unreadable or malformed file is.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "No sysmon config at '{}'; running with built-in defaults",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        MonitorError::Config(format!("cannot read sysmon config '{}': {e}", path.display()))
    })?;

    toml::from_str(&raw).map_err(|e| {
        MonitorError::Config(format!("invalid sysmon config '{}': {e}", path.display()))
    })
}

/// `sysmon/sysmon.toml` under the user's config directory.
pub fn default_path() -> PathBuf {
    config_home(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
        .join("sysmon")
        .join("sysmon.toml")
}

/// `$XDG_CONFIG_HOME` if set to an absolute path, else `$HOME/.config`.
fn config_home(xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    xdg.map(PathBuf::from)
        .filter(|dir| dir.is_absolute())
        .unwrap_or_else(|| {
            home.map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.interval_ms(), 1_000);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sysmon.toml");
        std::fs::write(&path, "[sampling\ninterval_ms = ").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)), "got {err:?}");
        assert!(err.to_string().contains(&path.display().to_string()), "{err}");
    }

    #[test]
    fn config_home_prefers_absolute_xdg_dir() {
        let home = Some(OsString::from("/home/ada"));
        assert_eq!(
            config_home(Some("/etc/xdg-ada".into()), home.clone()),
            PathBuf::from("/etc/xdg-ada")
        );
        assert_eq!(
            config_home(Some("relative".into()), home.clone()),
            PathBuf::from("/home/ada/.config")
        );
        assert_eq!(config_home(None, home), PathBuf::from("/home/ada/.config"));
        assert_eq!(config_home(None, None), PathBuf::from("./.config"));
    }

    #[test]
    fn reads_values_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sysmon.toml");
        std::fs::write(&path, "[history]\nhistory_seconds = 120\n").unwrap();

        assert_eq!(load(&path).unwrap().history_seconds(), 120);
    }
}
