//! Plugin configuration.
//!
//! The container runtime executes the plugin with no configuration of its
//! own, so everything has a default. Environment variables override the
//! defaults and command-line flags override both.

use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

use crate::error::{NriError, Result};

/// Environment variable overriding the log file path.
pub const ENV_LOG_FILE: &str = "BLOCKIO_NRI_LOG_FILE";

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "BLOCKIO_NRI_LOG_LEVEL";

/// Default log file location.
pub const DEFAULT_LOG_FILE: &str = "/tmp/blockio-nri.log";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Runtime configuration for the plugin process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Append-only log file written by every invocation.
    pub log_file: PathBuf,
    /// Maximum level written to the log file.
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::DEBUG,
        }
    }
}

impl Config {
    /// Builds the configuration from defaults and process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(
            std::env::var(ENV_LOG_FILE).ok(),
            std::env::var(ENV_LOG_LEVEL).ok(),
        )?;
        Ok(config)
    }

    /// Applies optional overrides on top of the current values.
    ///
    /// Empty strings are treated as unset.
    pub fn apply_overrides(
        &mut self,
        log_file: Option<String>,
        log_level: Option<String>,
    ) -> Result<()> {
        if let Some(path) = log_file.filter(|p| !p.trim().is_empty()) {
            self.log_file = PathBuf::from(path);
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level.trim().parse().map_err(|e| {
                NriError::Config(format!("invalid log level {:?}: {}", level, e))
            })?;
        }
        Ok(())
    }
}
