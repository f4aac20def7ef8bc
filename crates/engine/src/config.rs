//! Configuration via `nfctool.toml`
//!
//! On first start a default `nfctool.toml` is written next to the
//! application data. To change settings, edit the file and restart.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use nfctool_core::is_valid_language_code;
use nfctool_durability::{BackupError, BackupStore, FileBackupStore, MemoryBackupStore};

use crate::logging::LogProfile;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "nfctool.toml";

/// Default logical key of the backup slot
pub const DEFAULT_BACKUP_KEY: &str = "myTag";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("Failed to access config file '{}': {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// The config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting is out of range
    #[error("Invalid setting '{field}': {reason}")]
    Invalid {
        /// Offending setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The configured backup store could not be opened
    #[error("Failed to open backup store: {0}")]
    Backup(#[from] BackupError),
}

/// Configuration loaded from `nfctool.toml`.
///
/// # Example
///
/// ```toml
/// backup_key = "myTag"
/// language_code = "en"
/// session_timeout_ms = 5000
/// # backup_file = "backup.json"
/// log_profile = "release"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfcConfig {
    /// Logical key of the backup slot
    #[serde(default = "default_backup_key")]
    pub backup_key: String,
    /// Language code written into new text records
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Deadline for one tag session, in milliseconds (default: 5000)
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,
    /// Backup document path; the backup lives in memory when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_file: Option<PathBuf>,
    /// `"debug"` logs every protocol step, `"release"` only errors
    #[serde(default)]
    pub log_profile: LogProfile,
}

fn default_backup_key() -> String {
    DEFAULT_BACKUP_KEY.to_string()
}

fn default_language_code() -> String {
    nfctool_codec::DEFAULT_LANGUAGE_CODE.to_string()
}

fn default_session_timeout_ms() -> u64 {
    5000
}

impl Default for NfcConfig {
    fn default() -> Self {
        Self {
            backup_key: default_backup_key(),
            language_code: default_language_code(),
            session_timeout_ms: default_session_timeout_ms(),
            backup_file: None,
            log_profile: LogProfile::default(),
        }
    }
}

impl NfcConfig {
    /// Session deadline as a `Duration`
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backup_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "backup_key",
                reason: "must not be empty".into(),
            });
        }
        if !is_valid_language_code(&self.language_code) {
            return Err(ConfigError::Invalid {
                field: "language_code",
                reason: format!(
                    "'{}' must be ASCII and at most 63 bytes",
                    self.language_code
                ),
            });
        }
        if self.session_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "session_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# nfctool configuration
#
# Logical key of the single backup slot
backup_key = "myTag"

# Language code written into new text records
language_code = "en"

# Deadline for one tag session in milliseconds (default: 5000)
session_timeout_ms = 5000

# Persist the backup slot to this JSON file.
# When unset the backup lives in memory and is lost on exit.
# backup_file = "backup.json"

# Logging: "release" (errors only, default) or "debug" (every protocol step)
log_profile = "release"
"#
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: NfcConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Open the configured backup store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup document exists but cannot be read.
    pub fn open_backup_store(&self) -> Result<Arc<dyn BackupStore>, ConfigError> {
        match &self.backup_file {
            Some(path) => Ok(Arc::new(FileBackupStore::open(path)?)),
            None => Ok(Arc::new(MemoryBackupStore::new())),
        }
    }
}
