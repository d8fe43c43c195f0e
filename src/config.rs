//! Run configuration
//!
//! Loaded once from a JSON document at startup and shared read-only by every
//! pipeline afterwards.

use crate::error::{CleanerError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Configuration for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// File name prefixes to select (each must be followed by `_YYYY-MM-DD`)
    #[serde(rename = "Files")]
    pub files: Vec<String>,
    /// Line prefixes to remove
    #[serde(rename = "Remove")]
    pub remove: Vec<String>,
    /// Directory holding the input dumps
    #[serde(rename = "FilesDir")]
    pub files_dir: PathBuf,
}

impl Configuration {
    /// Parse a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CleanerError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| CleanerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Input directory resolved against the working directory.
    ///
    /// An empty `FilesDir` means the working directory itself.
    pub fn resolved_files_dir(&self) -> PathBuf {
        if self.files_dir.as_os_str().is_empty() {
            return PathBuf::from(".");
        }
        if self.files_dir.is_absolute() {
            return self.files_dir.clone();
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(&self.files_dir),
            Err(_) => self.files_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "Files": ["dump", "audit"], "Remove": ["-- ", "LOCK TABLES"], "FilesDir": "/var/backups" }"#,
        )
        .unwrap();

        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.files, vec!["dump", "audit"]);
        assert_eq!(config.remove, vec!["-- ", "LOCK TABLES"]);
        assert_eq!(config.files_dir, PathBuf::from("/var/backups"));
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "Files": ["dump"], "Extra": 1 }"#).unwrap();

        let config = Configuration::load(&path).unwrap();
        assert_eq!(config.files, vec!["dump"]);
        assert!(config.remove.is_empty());
        assert!(config.files_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Configuration::load(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CleanerError::ConfigIo { .. }));
    }

    #[test]
    fn test_malformed_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Configuration::load(&path),
            Err(CleanerError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_resolved_files_dir() {
        let config = Configuration::default();
        assert_eq!(config.resolved_files_dir(), PathBuf::from("."));

        let config = Configuration {
            files_dir: PathBuf::from("/data/dumps"),
            ..Default::default()
        };
        assert_eq!(config.resolved_files_dir(), PathBuf::from("/data/dumps"));
    }
}
