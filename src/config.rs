//! Runtime configuration from the environment.

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Overrides the database file location.
pub const DB_PATH_VAR: &str = "DRAM_DB_PATH";

/// Log filter directives, in `tracing_subscriber::EnvFilter` syntax.
pub const LOG_VAR: &str = "DRAM_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; set DRAM_DB_PATH")]
    NoDataDirectory,

    #[error("invalid DRAM_LOG filter {filter:?}: {source}")]
    InvalidLogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// Callers load `.env` first (`dotenvy::dotenv()`), so values there
    /// apply unless the real environment already sets them.
    ///
    /// # Environment Variables
    ///
    /// - `DRAM_DB_PATH`: database file (default `{data_dir}/dram/notes.db`)
    /// - `DRAM_LOG`: log filter (default `warn`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = match non_empty_var(DB_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let log_filter =
            non_empty_var(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        EnvFilter::try_new(&log_filter).map_err(|source| ConfigError::InvalidLogFilter {
            filter: log_filter.clone(),
            source,
        })?;

        Ok(Self {
            db_path,
            log_filter,
        })
    }

    /// Replaces the database path when `path` is given (the `--db` flag).
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// Directory holding the images notes own, next to the database file.
    pub fn images_dir(&self) -> PathBuf {
        self.db_path.with_file_name("images")
    }

    /// Builds the tracing filter for this configuration.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

/// `{data_dir}/dram/notes.db`, where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDirectory)?;
    Ok(data_dir.join("dram").join("notes.db"))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
