use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use scanner_core::CoreOptions;
use scanner_engine::{ApiSettings, DEFAULT_BASE_URL};
use scanner_logging::{scanner_info, scanner_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "scanner.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Session settings as stored in the RON config file. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub notification_timeout_ms: u64,
    pub fence_stale_search: bool,
    pub single_upload_in_flight: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let api = ApiSettings::default();
        let core = CoreOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.map(|timeout| timeout.as_secs()),
            notification_timeout_ms: core.notification_timeout.as_millis() as u64,
            fence_stale_search: core.fence_stale_search,
            single_upload_in_flight: core.single_upload_in_flight,
        }
    }
}

impl Settings {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn core_options(&self) -> CoreOptions {
        CoreOptions {
            notification_timeout: Duration::from_millis(self.notification_timeout_ms),
            fence_stale_search: self.fence_stale_search,
            single_upload_in_flight: self.single_upload_in_flight,
        }
    }
}

/// Reads settings from `path`. A missing file yields `Ok(None)`.
pub(crate) fn read_settings(path: &Path) -> Result<Option<Settings>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads settings, falling back to defaults when the file is missing or bad.
pub(crate) fn load_settings(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(Some(settings)) => {
            scanner_info!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => Settings::default(),
        Err(err) => {
            scanner_warn!("{}; using defaults", err);
            Settings::default()
        }
    }
}

/// Atomically writes `settings` to `path` as pretty RON.
pub(crate) fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.ron");

        assert!(read_settings(&path).expect("read").is_none());
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scanner.ron");
        fs::write(&path, r#"(base_url: "http://scanner.example/api/v1", fence_stale_search: false)"#)
            .expect("write");

        let settings = read_settings(&path).expect("read").expect("present");

        assert_eq!(settings.base_url, "http://scanner.example/api/v1");
        assert!(!settings.fence_stale_search);
        assert_eq!(settings.notification_timeout_ms, 6_000);
        assert!(settings.single_upload_in_flight);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scanner.ron");
        fs::write(&path, "(base_url: ").expect("write");

        assert!(matches!(read_settings(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn saved_settings_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scanner.ron");
        let settings = Settings {
            request_timeout_secs: Some(45),
            notification_timeout_ms: 2_500,
            ..Settings::default()
        };

        save_settings(&path, &settings).expect("save");

        assert_eq!(read_settings(&path).expect("read"), Some(settings.clone()));
        let core = settings.core_options();
        assert_eq!(core.notification_timeout, Duration::from_millis(2_500));
        assert_eq!(
            settings.api_settings().request_timeout,
            Some(Duration::from_secs(45))
        );
    }
}
