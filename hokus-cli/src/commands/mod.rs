//! Command implementations. Each returns the process exit code.

pub mod form;
pub mod sites;

use std::io::Write;

use serde::Serialize;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::HokusConfig;
use crate::exit_codes::EXIT_SUCCESS;

pub async fn run(cli: Cli, config: &HokusConfig) -> anyhow::Result<i32> {
    let format = cli.format;
    match cli.command {
        Commands::Resolve { form: args } => form::resolve(&args, format),
        Commands::Defaults { form: args } => form::defaults(&args, format),
        Commands::Validate { form: args } => form::validate(&args, cli.quiet),
        Commands::Config => {
            print_document(config, format)?;
            Ok(EXIT_SUCCESS)
        }
        Commands::Sites => sites::list_sites(config, format).await,
        Commands::Workspaces { site } => sites::list_workspaces(config, &site, format).await,
        Commands::Publish {
            site,
            publish_key,
            build_dir,
        } => sites::publish(config, &site, &publish_key, build_dir).await,
        Commands::InitSite {
            key,
            path,
            name,
            publish_path,
        } => sites::init_site(config, &key, &path, name.as_deref(), publish_path.as_deref()).await,
        Commands::InitWorkspace { path } => sites::init_workspace(&path, cli.quiet),
    }
}

/// Write `value` to stdout in the chosen format.
pub fn print_document<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
