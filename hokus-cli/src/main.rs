use std::process;

use clap::Parser;
use hokus_cli::commands;
use hokus_cli::exit_codes::EXIT_ERROR;
use hokus_cli::logging::configure_logging;
use hokus_cli::{Cli, HokusConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match HokusConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            process::exit(EXIT_ERROR);
        }
    };

    configure_logging(cli.verbose, cli.debug, cli.quiet, config.log_level.as_deref());
    tracing::debug!(command = ?cli.command, "starting");

    let exit_code = match commands::run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}
