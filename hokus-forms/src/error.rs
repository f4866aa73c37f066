//! Error types for form schema resolution

use hokus_common::{CommonError, ErrorSeverity, Severity};
use thiserror::Error;

use crate::path::DataPath;
use crate::registry::Capability;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormsError>;

/// Errors that can occur while resolving or editing a form
#[derive(Debug, Error)]
pub enum FormsError {
    /// An include names a fragment the table does not have
    #[error("unknown fragment '{name}' included from {origin} at {path}")]
    UnknownFragment {
        name: String,
        origin: String,
        path: DataPath,
    },

    /// Two sibling data fields share a key
    #[error("duplicate field key '{key}' at {path}")]
    DuplicateKey { key: String, path: DataPath },

    /// An include chain re-enters a fragment without descending a level
    #[error("include cycle at {path}: {chain}")]
    IncludeCycle { chain: String, path: DataPath },

    /// Schema is structurally unusable
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { message: String, path: DataPath },

    /// No resolved field lives at the path
    #[error("field not found: {path}")]
    FieldNotFound { path: DataPath },

    /// A value cannot be written at the path
    #[error("cannot write {path}: {reason}")]
    PathConflict { path: DataPath, reason: String },

    /// Text could not be parsed as a data path
    #[error("invalid data path: '{input}'")]
    InvalidPath { input: String },

    /// The field's type does not carry the requested plugin capability
    #[error("field at {path} does not support {capability}")]
    MissingCapability {
        path: DataPath,
        capability: Capability,
    },

    /// A host plugin failed
    #[error("plugin error: {message}")]
    Plugin { message: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema file could not be read or parsed
    #[error(transparent)]
    Format(#[from] CommonError),
}

impl Severity for FormsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FormsError::UnknownFragment { .. }
            | FormsError::DuplicateKey { .. }
            | FormsError::IncludeCycle { .. }
            | FormsError::InvalidSchema { .. }
            | FormsError::FieldNotFound { .. }
            | FormsError::PathConflict { .. }
            | FormsError::InvalidPath { .. }
            | FormsError::MissingCapability { .. }
            | FormsError::Json(_) => ErrorSeverity::Error,
            FormsError::Format(err) => err.severity(),
            FormsError::Plugin { .. } => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormsError::DuplicateKey {
            key: "title".into(),
            path: "fields[0]".parse().unwrap(),
        };
        assert_eq!(err.to_string(), "duplicate field key 'title' at fields[0]");
    }

    #[test]
    fn test_unknown_fragment_names_fragment_and_origin() {
        let err = FormsError::UnknownFragment {
            name: "nestInclude".into(),
            origin: "anyFieldInclude".into(),
            path: DataPath::root(),
        };
        let message = err.to_string();
        assert!(message.contains("nestInclude"));
        assert!(message.contains("anyFieldInclude"));
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_plugin_error_is_warning() {
        let err = FormsError::Plugin {
            message: "dialog closed".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }
}
