use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;

use blockio_nri::bootstrap;
use blockio_nri::nri::StdioRunner;
use blockio_nri::Config;

#[derive(Parser)]
#[command(name = "blockio-nri")]
#[command(about = "Block I/O plugin for NRI-enabled container runtimes", long_about = None)]
#[command(version)]
struct Cli {
    /// Command issued by the runtime (`invoke` or `version`)
    command: Option<String>,

    /// Log file path [env: BLOCKIO_NRI_LOG_FILE, default: /tmp/blockio-nri.log]
    #[arg(long)]
    log_file: Option<String>,

    /// Log level: off, error, warn, info, debug, trace [env: BLOCKIO_NRI_LOG_LEVEL]
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("invalid environment configuration")?;
    config
        .apply_overrides(cli.log_file, cli.log_level)
        .context("invalid command-line configuration")?;

    let mut stderr = std::io::stderr();
    let Some(log) = bootstrap::open_log(&config, &mut stderr) else {
        return Ok(ExitCode::from(bootstrap::EXIT_FAILURE));
    };
    log.install_global()?;

    let runner = StdioRunner::new(cli.command);
    let code = bootstrap::run(log, &runner, &mut stderr).await;
    Ok(ExitCode::from(code))
}
