//! Data formats understood by Hokus
//!
//! Hugo accepts its configuration as TOML, YAML or JSON, and site configs use
//! the same set. Every format parses into and dumps from a
//! [`serde_json::Value`] so callers never deal with format-specific trees.

use std::path::Path;

use serde_json::Value;

use crate::error::{CommonError, Result};

/// A data format with a parser and a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFormat {
    /// TOML format (.toml extension)
    #[default]
    Toml,
    /// YAML format (.yaml or .yml extensions)
    Yaml,
    /// JSON format (.json extension)
    Json,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_ext())
    }
}

impl DataFormat {
    /// All formats, in lookup priority order.
    pub const ALL: [DataFormat; 3] = [DataFormat::Toml, DataFormat::Yaml, DataFormat::Json];

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Like [`DataFormat::from_path`] but fails with `UnsupportedFormat`.
    pub fn for_path(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| CommonError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }

    /// Extensions recognised for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DataFormat::Toml => &["toml"],
            DataFormat::Yaml => &["yaml", "yml"],
            DataFormat::Json => &["json"],
        }
    }

    /// Extension used when writing a new file.
    pub fn default_ext(self) -> &'static str {
        self.extensions()[0]
    }

    /// Every recognised extension across all formats.
    pub fn all_extensions() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .flat_map(|format| format.extensions().iter().copied())
            .collect()
    }

    /// Parse a document into a JSON value.
    pub fn parse(self, content: &str) -> Result<Value> {
        let value = match self {
            DataFormat::Toml => toml::from_str::<Value>(content)?,
            DataFormat::Yaml => {
                if content.trim().is_empty() {
                    Value::Object(Default::default())
                } else {
                    serde_yaml_ng::from_str::<Value>(content)?
                }
            }
            DataFormat::Json => serde_json::from_str::<Value>(content)?,
        };
        Ok(value)
    }

    /// Write a JSON value as a document in this format.
    pub fn dump(self, value: &Value) -> Result<String> {
        match self {
            DataFormat::Toml => {
                if !value.is_object() {
                    return Err(CommonError::NotATable { format: "TOML" });
                }
                Ok(toml::to_string(value)?)
            }
            DataFormat::Yaml => Ok(serde_yaml_ng::to_string(value)?),
            DataFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    /// Read and parse a file, choosing the format from its extension.
    pub fn read_file(path: &Path) -> Result<(Self, Value)> {
        let format = Self::for_path(path)?;
        let content = std::fs::read_to_string(path)?;
        tracing::trace!(path = %path.display(), %format, "parsing data file");
        Ok((format, format.parse(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_from_extension() {
        assert_eq!(DataFormat::from_extension("TOML"), Some(DataFormat::Toml));
        assert_eq!(DataFormat::from_extension("yml"), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_extension("json"), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_for_path_rejects_unknown_extension() {
        let err = DataFormat::for_path(&PathBuf::from("config.ini")).unwrap_err();
        assert!(matches!(err, CommonError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_all_extensions_order() {
        assert_eq!(
            DataFormat::all_extensions(),
            vec!["toml", "yaml", "yml", "json"]
        );
    }

    #[test]
    fn test_toml_dump_and_parse() {
        let value = json!({"title": "New Site Title", "baseURL": "http://newsite.com"});
        let dumped = DataFormat::Toml.dump(&value).unwrap();
        assert!(dumped.contains("title = \"New Site Title\""));
        assert_eq!(DataFormat::Toml.parse(&dumped).unwrap(), value);
    }

    #[test]
    fn test_toml_dump_requires_table() {
        let err = DataFormat::Toml.dump(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, CommonError::NotATable { .. }));
    }

    #[test]
    fn test_yaml_parse_empty_document() {
        assert_eq!(DataFormat::Yaml.parse("  \n").unwrap(), json!({}));
    }

    #[test]
    fn test_read_file_detects_format() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "theme: ananke\n").unwrap();
        let (format, value) = DataFormat::read_file(&path).unwrap();
        assert_eq!(format, DataFormat::Yaml);
        assert_eq!(value["theme"], "ananke");
    }
}
