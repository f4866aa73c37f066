//! Error types for site and workspace operations

use std::path::PathBuf;

use hokus_common::{CommonError, ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for site operations
pub type Result<T> = std::result::Result<T, SitesError>;

/// Errors that can occur while managing sites, workspaces and publishing
#[derive(Debug, Error)]
pub enum SitesError {
    /// No site configuration has been written yet
    #[error("the configuration is empty")]
    EmptyConfiguration,

    /// No site with the given key is configured
    #[error("could not find a config for site '{key}'")]
    SiteNotFound { key: String },

    /// No publish entry matched and no default was available
    #[error("{}", publisher_not_found(.key))]
    PublisherNotFound { key: String },

    /// The matched publish entry has no `config`
    #[error("the publish config '{key}' does not have a config")]
    PublisherConfigMissing { key: String },

    /// Nothing has been built yet, so there is nothing to publish
    #[error("could not resolve the last build directory")]
    BuildDirUnresolved,

    /// No format provider could be chosen for a file
    #[error("could not resolve a format for {path}")]
    FormatUnresolved { path: PathBuf },

    /// A site source config names a type no factory knows
    #[error("unknown site source type '{type_name}'")]
    UnknownSourceType { type_name: String },

    /// The service was built without a site initializer factory
    #[error("no site initializers are configured, cannot create a '{type_name}' site")]
    InitializersMissing { type_name: String },

    /// A publisher config names a type no factory knows
    #[error("unknown publisher type '{type_name}'")]
    UnknownPublisherType { type_name: String },

    /// A config is missing a required setting
    #[error("{kind} config is missing '{setting}'")]
    MissingSetting { kind: String, setting: String },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing a data file failed
    #[error(transparent)]
    Format(#[from] CommonError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn publisher_not_found(key: &str) -> String {
    if key.is_empty() {
        "could not find a default publish config".to_string()
    } else {
        format!("could not find a publish config for key '{key}' and no default is available")
    }
}

impl Severity for SitesError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SitesError::Io(_) => ErrorSeverity::Critical,
            SitesError::Format(err) => err.severity(),
            SitesError::EmptyConfiguration => ErrorSeverity::Warning,
            SitesError::SiteNotFound { .. }
            | SitesError::PublisherNotFound { .. }
            | SitesError::PublisherConfigMissing { .. }
            | SitesError::BuildDirUnresolved
            | SitesError::FormatUnresolved { .. }
            | SitesError::UnknownSourceType { .. }
            | SitesError::InitializersMissing { .. }
            | SitesError::UnknownPublisherType { .. }
            | SitesError::MissingSetting { .. }
            | SitesError::Json(_) => ErrorSeverity::Error,
        }
    }
}
