use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "hokus")]
#[command(version)]
#[command(about = "Resolve Hokus form schemas and manage Hugo sites")]
#[command(long_about = "
hokus resolves form schemas (fields, includes and extends) against a data
document and manages the Hugo sites registered in the sites directory.

Global arguments can be used with any command:
  --verbose     Trace everything the resolver does
  --debug       Enable debug logging
  --quiet       Suppress all output except errors
  --format      Output format (json, yaml) for commands that print documents

Example usage:
  hokus resolve schema.yaml --data post.json     # Print the resolved field tree
  hokus resolve                                  # Resolve the built-in form builder
  hokus defaults schema.yaml --data post.json    # Print the data with defaults filled in
  hokus sites                                    # List configured sites
  hokus publish blog                             # Publish the last build of a site
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for printed documents
    #[arg(long, value_enum, global = true, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// The schema and data a form command works on.
#[derive(clap::Args, Debug, Clone)]
pub struct FormArgs {
    /// Schema file (.json, .yaml, .yml or .toml). The built-in form builder when omitted
    pub schema: Option<PathBuf>,

    /// Data document the form edits. An empty object when omitted
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved field tree of a schema
    Resolve {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the data with every missing default filled in
    Defaults {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Check the data against the resolved schema
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print the effective configuration
    Config,
    /// List the configured sites
    Sites,
    /// List the workspaces of a site
    Workspaces {
        /// Site key
        site: String,
    },
    /// Publish the last build of a site
    Publish {
        /// Site key
        site: String,
        /// Publish entry key. The default entry when omitted
        #[arg(default_value = "")]
        publish_key: String,
        /// Build output to publish, overriding the configured build_dir
        #[arg(long, value_name = "DIR")]
        build_dir: Option<PathBuf>,
    },
    /// Register a local Hugo folder as a site
    InitSite {
        /// Site key
        #[arg(long)]
        key: String,
        /// Hugo site folder
        #[arg(long)]
        path: PathBuf,
        /// Display name. The key when omitted
        #[arg(long)]
        name: Option<String>,
        /// Folder the default publisher copies builds into
        #[arg(long, value_name = "DIR")]
        publish_path: Option<PathBuf>,
    },
    /// Write an initial hokus config into a Hugo workspace
    InitWorkspace {
        /// Hugo workspace folder
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}
