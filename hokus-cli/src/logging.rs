use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Pick the log level. Flags win over the configured level, which wins over INFO.
pub fn log_level(verbose: bool, debug: bool, quiet: bool, configured: Option<&str>) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        configured
            .and_then(|level| Level::from_str(level).ok())
            .unwrap_or(Level::INFO)
    }
}

/// Send logs to stderr so stdout only carries command output.
pub fn configure_logging(verbose: bool, debug: bool, quiet: bool, configured: Option<&str>) {
    let log_level = log_level(verbose, debug, quiet, configured);
    registry()
        .with(EnvFilter::new(format!("figment=warn,{log_level}")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
