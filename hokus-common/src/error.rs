//! Error types for Hokus Common
//!
//! Besides the errors raised by the format providers, this module defines the
//! severity classification every Hokus error enum reports through.

use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// - **Warning**: potential issue, the operation still completes.
/// - **Error**: the operation failed, the rest of the system is unaffected.
/// - **Critical**: the system cannot continue without intervention.
///
/// ```rust
/// use hokus_common::ErrorSeverity;
///
/// let unknown_field_type = ErrorSeverity::Warning;
/// let missing_fragment = ErrorSeverity::Error;
/// assert_ne!(unknown_field_type, missing_fragment);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but system can continue
    Error,
    /// System cannot continue, requires immediate attention
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use hokus_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum SchemaError {
///     UnknownFragment,
///     UnknownFieldType,
/// }
///
/// impl Severity for SchemaError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             SchemaError::UnknownFragment => ErrorSeverity::Error,
///             SchemaError::UnknownFieldType => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(SchemaError::UnknownFragment.severity(), ErrorSeverity::Error);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised while reading or writing data formats
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum CommonError {
    /// No format provider handles the given file
    #[error("unsupported data format for {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Value cannot be represented in the target format
    #[error("{format} documents must have a table at the top level")]
    NotATable { format: &'static str },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Severity for CommonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommonError::Io(_) => ErrorSeverity::Critical,
            CommonError::UnsupportedFormat { .. }
            | CommonError::NotATable { .. }
            | CommonError::Json(_)
            | CommonError::Yaml(_)
            | CommonError::TomlParse(_)
            | CommonError::TomlWrite(_) => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_unsupported_format_mentions_path() {
        let err = CommonError::UnsupportedFormat {
            path: PathBuf::from("config.ini"),
        };
        assert!(err.to_string().contains("config.ini"));
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = CommonError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
