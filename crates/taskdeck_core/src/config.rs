//! Runtime configuration.
//!
//! All settings are fixed defaults anchored at the working directory; the
//! program reads no environment variables and takes no arguments.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

/// Backing file name, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";
/// Log directory name, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// Working directory could not be determined.
    WorkingDir(io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkingDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDir(err) => Some(err),
        }
    }
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Task collection file.
    pub tasks_file: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    /// Log level passed to `init_logging`.
    pub log_level: &'static str,
}

impl AppConfig {
    /// Builds the configuration for the current working directory.
    pub fn resolve() -> Result<Self, ConfigError> {
        let dir = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
        Ok(Self::from_working_dir(dir))
    }

    /// Builds the configuration anchored at `dir`.
    pub fn from_working_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            tasks_file: dir.join(DEFAULT_TASKS_FILE),
            log_dir: dir.join(DEFAULT_LOG_DIR),
            log_level: default_log_level(),
        }
    }
}
