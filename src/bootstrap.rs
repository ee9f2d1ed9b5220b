//! Process bootstrap: open the plugin log, hand the adapter to a runner and
//! turn the runner's outcome into an exit status.

use std::io::Write;
use std::sync::Arc;

use tracing::debug;

use crate::blockio::{BlockioNri, PLUGIN_TYPE};
use crate::config::Config;
use crate::logging::PluginLog;
use crate::nri::{Context, Plugin, Runner};

/// Exit status after the runner returned cleanly.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status for a fatal bootstrap failure or a runner error.
pub const EXIT_FAILURE: u8 = 1;

/// Opens the configured log file, reporting failure on `stderr`.
pub fn open_log<W: Write>(config: &Config, stderr: &mut W) -> Option<PluginLog> {
    match PluginLog::open(config) {
        Ok(log) => Some(log),
        Err(e) => {
            let _ = writeln!(stderr, "{}", e);
            let _ = stderr.flush();
            None
        }
    }
}

/// Serves the plugin through `runner` and returns the process exit status.
pub async fn run<R, W>(log: PluginLog, runner: &R, stderr: &mut W) -> u8
where
    R: Runner + ?Sized,
    W: Write,
{
    log.scoped(|| debug!("launching {}", PLUGIN_TYPE));

    let plugin: Arc<dyn Plugin> = Arc::new(BlockioNri::new(log.clone()));
    let ctx = Context::background();

    match runner.run(&ctx, plugin).await {
        Ok(()) => {
            log.scoped(|| debug!("exit success"));
            EXIT_SUCCESS
        }
        Err(e) => {
            let msg = e.to_string();
            let _ = write!(stderr, "{}", msg);
            let _ = stderr.flush();
            log.scoped(|| debug!("exit with error {:?}", msg));
            EXIT_FAILURE
        }
    }
}

/// Opens the log and serves the plugin. The runner is never called when the
/// log file cannot be opened.
pub async fn launch<R, W>(config: &Config, runner: &R, stderr: &mut W) -> u8
where
    R: Runner + ?Sized,
    W: Write,
{
    match open_log(config, stderr) {
        Some(log) => run(log, runner, stderr).await,
        None => EXIT_FAILURE,
    }
}
