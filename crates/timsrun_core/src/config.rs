//! Runtime configuration for the core.
//!
//! # Responsibility
//! - Resolve where the blob database and log files live.
//! - Carry the log level chosen by the host app.
//!
//! # Invariants
//! - `data_dir` is absolute and non-empty.
//! - Derived paths are always inside `data_dir`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "TIMSRUN_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "TIMSRUN_LOG_LEVEL";

const DB_FILE_NAME: &str = "timsrun.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDataDir,
    RelativeDataDir(PathBuf),
    MissingEnv(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDataDir => write!(f, "data_dir cannot be empty"),
            Self::RelativeDataDir(path) => {
                write!(f, "data_dir must be an absolute path, got `{}`", path.display())
            }
            Self::MissingEnv(name) => write!(f, "environment variable `{name}` is not set"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    data_dir: PathBuf,
    log_level: String,
}

impl CoreConfig {
    /// Builds a config rooted at `data_dir` with the build-mode log level.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = data_dir.as_ref();
        if raw.as_os_str().is_empty() || raw.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if !raw.is_absolute() {
            return Err(ConfigError::RelativeDataDir(raw.to_path_buf()));
        }
        Ok(Self {
            data_dir: raw.to_path_buf(),
            log_level: default_log_level().to_string(),
        })
    }

    /// Reads `TIMSRUN_DATA_DIR` and, if set, `TIMSRUN_LOG_LEVEL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(DATA_DIR_ENV))?;
        let config = Self::new(data_dir.trim())?;
        match std::env::var(LOG_LEVEL_ENV) {
            Ok(level) if !level.trim().is_empty() => Ok(config.with_log_level(level.trim())),
            _ => Ok(config),
        }
    }

    /// Overrides the log level; validation happens in `init_logging`.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}
