//! Plugin log file and the log handle handed to the adapter.
//!
//! The plugin's stdout belongs to the runtime protocol, so every record goes
//! to an append-only file instead. The subscriber is wrapped in a
//! [`PluginLog`] handle that is injected into whoever needs to log, rather
//! than being read from a process-wide global.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;

use crate::config::Config;
use crate::error::{NriError, Result};

/// Permission bits for a newly created log file (rw-rw-rw-, before umask).
pub const LOG_FILE_MODE: u32 = 0o666;

/// Opens `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }
    options.open(path).map_err(|source| NriError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Cloneable handle to the plugin's log subscriber.
#[derive(Clone)]
pub struct PluginLog {
    dispatch: Dispatch,
}

impl PluginLog {
    /// Opens the configured log file and builds a subscriber on top of it.
    pub fn open(config: &Config) -> Result<Self> {
        let file = open_log_file(&config.log_file)?;
        Ok(Self::from_file(file, config.log_level))
    }

    /// Builds a subscriber writing plain-text records to `file`.
    ///
    /// The file sits behind a mutex so records from concurrent invocations
    /// are never interleaved.
    pub fn from_file(file: File, level: LevelFilter) -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(level)
            .finish();
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A handle that drops every record.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Runs `f` with this handle as the current subscriber.
    ///
    /// `f` must not await; the default is scoped to the calling thread.
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Installs this handle as the process-wide default subscriber.
    pub fn install_global(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| NriError::Config(format!("failed to install log subscriber: {}", e)))
    }
}

impl std::fmt::Debug for PluginLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLog").finish_non_exhaustive()
    }
}
