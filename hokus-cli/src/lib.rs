//! Library side of the `hokus` binary, split out so commands can be tested in process.

pub mod cli;
pub mod commands;
pub mod config;
pub mod exit_codes;
pub mod logging;

pub use cli::{Cli, Commands, FormArgs, OutputFormat};
pub use config::HokusConfig;
