//! First-run workspace configuration.
//!
//! A Hugo site opened for the first time has no `hokus.<ext>` file yet. The
//! builder derives one from the site's Hugo config, creating a minimal Hugo
//! config when the workspace has none.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use hokus_common::DataFormat;
use hokus_forms::{FieldSpec, SchemaNode};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::error::{Result, SitesError};
use crate::types::{CollectionConfig, HugoTarget, SingleConfig, WorkspaceConfig};

/// Hugo version written into new workspace configs.
pub const DEFAULT_HUGO_VERSION: &str = "0.69.0";

/// A built workspace config and the format it should be written in.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialWorkspaceConfig {
    pub format: DataFormat,
    pub config: WorkspaceConfig,
}

impl InitialWorkspaceConfig {
    /// File name the config is stored under in the workspace.
    pub fn file_name(&self) -> String {
        format!("hokus.{}", self.format.default_ext())
    }

    /// Serialize in the workspace's format.
    pub fn dump(&self) -> Result<String> {
        let value = serde_json::to_value(&self.config)?;
        Ok(self.format.dump(&value)?)
    }
}

pub struct InitialWorkspaceConfigBuilder {
    workspace: PathBuf,
}

impl InitialWorkspaceConfigBuilder {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    /// Locate (or create) the Hugo config and derive a workspace config from it.
    pub fn build(&self) -> Result<InitialWorkspaceConfig> {
        let (config_path, format) = match self.find_hugo_config()? {
            Some(path) => {
                let format = DataFormat::from_path(&path)
                    .ok_or_else(|| SitesError::FormatUnresolved { path: path.clone() })?;
                (path, format)
            }
            None => self.write_minimal_config()?,
        };

        let content = std::fs::read_to_string(&config_path)?;
        let hugo_config = format.parse(&content)?;
        let relative = config_path
            .strip_prefix(&self.workspace)
            .unwrap_or(&config_path)
            .to_string_lossy()
            .into_owned();

        debug!(config = %relative, %format, "building initial workspace config");
        Ok(InitialWorkspaceConfig {
            format,
            config: workspace_config(&relative, format, DEFAULT_HUGO_VERSION, &hugo_config),
        })
    }

    fn escaped_workspace(&self) -> String {
        Pattern::escape(&self.workspace.to_string_lossy())
    }

    fn find_hugo_config(&self) -> Result<Option<PathBuf>> {
        let pattern = format!("{}/config.*", self.escaped_workspace());
        let mut candidates = glob_paths(&pattern)?;
        candidates.retain(|path| path.is_file() && DataFormat::from_path(path).is_some());
        Ok(candidates.into_iter().next())
    }

    fn first_theme(&self) -> Result<Option<String>> {
        let pattern = format!("{}/themes/*", self.escaped_workspace());
        let theme = glob_paths(&pattern)?
            .into_iter()
            .find(|path| path.is_dir())
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()));
        Ok(theme)
    }

    fn write_minimal_config(&self) -> Result<(PathBuf, DataFormat)> {
        let format = DataFormat::default();
        let path = self
            .workspace
            .join(format!("config.{}", format.default_ext()));
        let theme = self
            .first_theme()?
            .unwrap_or_else(|| "some-theme".to_string());
        let minimal = json!({
            "title": "New Site Title",
            "baseURL": "http://newsite.com",
            "theme": theme,
        });
        std::fs::write(&path, format.dump(&minimal)?)?;
        info!(path = %path.display(), %theme, "wrote minimal Hugo config");
        Ok((path, format))
    }
}

fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).map_err(|err| {
        SitesError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, err))
    })?;
    let mut found: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
    found.sort();
    Ok(found)
}

/// Maps lower-cased Hugo config keys to their spelling in the existing config.
struct KeyCase(HashMap<String, String>);

impl KeyCase {
    fn new(hugo_config: &Value) -> Self {
        let keys = hugo_config
            .as_object()
            .map(Map::keys)
            .into_iter()
            .flatten()
            .map(|key| (key.to_lowercase(), key.clone()))
            .collect();
        Self(keys)
    }

    /// The config's own spelling of `key`, or `key` itself.
    fn best(&self, key: &str) -> String {
        self.0
            .get(&key.to_lowercase())
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn workspace_config(
    config_file: &str,
    format: DataFormat,
    hugo_version: &str,
    hugo_config: &Value,
) -> WorkspaceConfig {
    let ext = format.default_ext();
    let keys = KeyCase::new(hugo_config);
    let target = || {
        vec![HugoTarget {
            key: "default".to_string(),
            config: config_file.to_string(),
        }]
    };

    WorkspaceConfig {
        hugover: hugo_version.to_string(),
        serve: target(),
        build: target(),
        collections: vec![CollectionConfig {
            key: "posts".to_string(),
            title: "Posts".to_string(),
            folder: "content/posts/".to_string(),
            match_: "**/index".to_string(),
            extension: "md".to_string(),
            dataformat: ext.to_string(),
            itemtitle: "Post".to_string(),
            fields: post_fields(),
        }],
        singles: vec![SingleConfig {
            key: "mainConfig".to_string(),
            title: "Main Config".to_string(),
            file: format!("config.{ext}"),
            dataformat: ext.to_string(),
            fields: main_config_fields(&keys),
        }],
    }
}

fn post_fields() -> Vec<SchemaNode> {
    vec![
        FieldSpec::new("info", "info")
            .with_attr("size", "small")
            .with_attr("content", "# Info\nYou can write custom instructions here.")
            .with_attr("theme", "gray")
            .into(),
        FieldSpec::new("title", "string").with_title("Title").into(),
        FieldSpec::new("mainContent", "markdown")
            .with_title("Content")
            .into(),
        FieldSpec::new("pubdate", "date")
            .with_title("Pub Date")
            .with_default("now")
            .into(),
        FieldSpec::new("draft", "boolean").with_title("Draft").into(),
        FieldSpec::new("bundle-manager", "bundle-manager")
            .with_title("Images")
            .with_attr("path", "imgs")
            .with_attr("extensions", json!(["png", "jpg", "gif"]))
            .with_fields(vec![
                FieldSpec::new("title", "string").with_title("Title").into(),
                FieldSpec::new("description", "string")
                    .with_title("Description")
                    .with_attr("multiLine", true)
                    .into(),
                FieldSpec::new("bundle-image-thumbnail", "bundle-image-thumbnail").into(),
            ])
            .into(),
    ]
}

fn main_config_fields(keys: &KeyCase) -> Vec<SchemaNode> {
    vec![
        FieldSpec::new(keys.best("title"), "string")
            .with_title("Site Title")
            .with_tip("Your page title.")
            .into(),
        FieldSpec::new(keys.best("baseURL"), "string")
            .with_title("Base URL")
            .with_tip("Your site URL.")
            .into(),
        FieldSpec::new(keys.best("theme"), "readonly")
            .with_title("Theme")
            .with_tip("The current theme.")
            .into(),
        FieldSpec::new(keys.best("languageCode"), "readonly")
            .with_title("Language Code")
            .into(),
        FieldSpec::new(keys.best("googleAnalytics"), "string")
            .with_title("Google Analytics")
            .with_tip("Provide a Google Analytics Tracking Code to enable analytics.")
            .into(),
        FieldSpec::new(keys.best("enableRobotsTXT"), "boolean")
            .with_title("Enable Robots")
            .with_default(true)
            .with_tip("If you want your page to be indexed, keep this enabled.")
            .into(),
    ]
}

/// Write the workspace's `hokus.<ext>` unless one exists. Returns the file
/// written, if any.
pub fn ensure_workspace_config(workspace: &Path) -> Result<Option<PathBuf>> {
    let existing = DataFormat::ALL.iter().flat_map(|format| format.extensions()).find(|ext| {
        workspace.join(format!("hokus.{ext}")).is_file()
    });
    if existing.is_some() {
        return Ok(None);
    }
    let initial = InitialWorkspaceConfigBuilder::new(workspace).build()?;
    let path = workspace.join(initial.file_name());
    std::fs::write(&path, initial.dump()?)?;
    info!(path = %path.display(), "wrote initial workspace config");
    Ok(Some(path))
}
