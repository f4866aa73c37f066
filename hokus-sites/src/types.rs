//! Site, workspace and publish configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use hokus_forms::SchemaNode;

/// A `{type: ..., ...settings}` block selecting an implementation by tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypedConfig {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl TypedConfig {
    pub fn new(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            settings: Map::new(),
        }
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    pub fn setting_str(&self, name: &str) -> Option<&str> {
        self.settings.get(name).and_then(Value::as_str)
    }
}

/// One entry of a site's `publish` list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublishConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TypedConfig>,
}

/// Configuration of one managed site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub source: TypedConfig,
    #[serde(default)]
    pub publish: Vec<PublishConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the configuration provider knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Configurations {
    /// No site has been configured yet.
    Empty,
    Loaded { sites: Vec<SiteConfig> },
}

impl Configurations {
    pub fn site(&self, key: &str) -> Option<&SiteConfig> {
        match self {
            Configurations::Empty => None,
            Configurations::Loaded { sites } => sites.iter().find(|site| site.key == key),
        }
    }
}

/// A checked-out copy of a site's source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceHeader {
    pub key: String,
    pub path: PathBuf,
    pub state: String,
}

/// Site and workspace that were just used, for "recent" lists.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteTouched {
    pub site_key: String,
    pub workspace_key: String,
}

/// A named Hugo config file for `hugo serve` / `hugo build`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HugoTarget {
    pub key: String,
    pub config: String,
}

/// A content folder edited item by item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    pub key: String,
    pub title: String,
    pub folder: String,
    #[serde(rename = "match")]
    pub match_: String,
    pub extension: String,
    pub dataformat: String,
    pub itemtitle: String,
    pub fields: Vec<SchemaNode>,
}

/// A single file edited as one form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SingleConfig {
    pub key: String,
    pub title: String,
    pub file: String,
    pub dataformat: String,
    pub fields: Vec<SchemaNode>,
}

/// Contents of a workspace's `hokus.<ext>` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    pub hugover: String,
    pub serve: Vec<HugoTarget>,
    pub build: Vec<HugoTarget>,
    pub collections: Vec<CollectionConfig>,
    pub singles: Vec<SingleConfig>,
}

impl WorkspaceConfig {
    pub fn single(&self, key: &str) -> Option<&SingleConfig> {
        self.singles.iter().find(|single| single.key == key)
    }

    pub fn collection(&self, key: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|collection| collection.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn site_config_parses_folder_source() {
        let site: SiteConfig = serde_json::from_value(json!({
            "key": "blog",
            "name": "My Blog",
            "source": {"type": "folder", "path": "/sites/blog"},
            "publish": [{"key": "default", "config": {"type": "folder", "path": "/out"}}],
            "serve": [{"key": "default", "config": "config.toml"}]
        }))
        .unwrap();
        assert_eq!(site.source.type_, "folder");
        assert_eq!(site.source.setting_str("path"), Some("/sites/blog"));
        assert_eq!(site.publish[0].key.as_deref(), Some("default"));
        assert!(site.extra.contains_key("serve"));
    }

    #[test]
    fn publish_entry_without_config_parses() {
        let entry: PublishConfig = serde_json::from_value(json!({"key": "manual"})).unwrap();
        assert!(entry.config.is_none());
    }

    #[test]
    fn configurations_lookup() {
        let configs = Configurations::Loaded {
            sites: vec![SiteConfig {
                key: "blog".into(),
                name: String::new(),
                source: TypedConfig::new("folder"),
                publish: vec![],
                extra: Map::new(),
            }],
        };
        assert!(configs.site("blog").is_some());
        assert!(configs.site("docs").is_none());
        assert!(Configurations::Empty.site("blog").is_none());
    }
}
