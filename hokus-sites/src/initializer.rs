//! Registering new sites.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use hokus_common::DataFormat;
use serde_json::Map;
use tokio::fs;
use tracing::info;

use crate::error::{Result, SitesError};
use crate::types::{PublishConfig, SiteConfig, TypedConfig};
use crate::workspace_config::ensure_workspace_config;

#[async_trait]
pub trait SiteInitializer: Send + Sync {
    /// Register the site described by `config`. Returns the stored site config.
    async fn initialize(&self, config: &TypedConfig) -> Result<SiteConfig>;
}

/// Picks the initializer for a `type` tag.
pub trait SiteInitializerFactory: Send + Sync {
    fn get(&self, type_name: &str) -> Result<Arc<dyn SiteInitializer>>;
}

/// Registers an existing local folder as a site.
///
/// Settings: `key` and `path` are required, `name` defaults to the key and
/// `publishPath` adds a default folder publisher. The workspace gets an
/// initial `hokus.<ext>` when it has none.
#[derive(Debug, Clone)]
pub struct FolderSiteInitializer {
    sites_dir: PathBuf,
}

impl FolderSiteInitializer {
    pub fn new(sites_dir: impl Into<PathBuf>) -> Self {
        Self {
            sites_dir: sites_dir.into(),
        }
    }

    pub fn sites_dir(&self) -> &Path {
        &self.sites_dir
    }
}

fn required<'c>(config: &'c TypedConfig, setting: &str) -> Result<&'c str> {
    config
        .setting_str(setting)
        .ok_or_else(|| SitesError::MissingSetting {
            kind: format!("{} site", config.type_),
            setting: setting.to_string(),
        })
}

#[async_trait]
impl SiteInitializer for FolderSiteInitializer {
    async fn initialize(&self, config: &TypedConfig) -> Result<SiteConfig> {
        let key = required(config, "key")?;
        let path = required(config, "path")?;
        let name = config.setting_str("name").unwrap_or(key);

        ensure_workspace_config(Path::new(path))?;

        let publish = config
            .setting_str("publishPath")
            .map(|target| PublishConfig {
                key: Some("default".to_string()),
                config: Some(TypedConfig::new("folder").with_setting("path", target)),
            })
            .into_iter()
            .collect();
        let site = SiteConfig {
            key: key.to_string(),
            name: name.to_string(),
            source: TypedConfig::new("folder").with_setting("path", path),
            publish,
            extra: Map::new(),
        };

        fs::create_dir_all(&self.sites_dir).await?;
        let file = self
            .sites_dir
            .join(format!("config.{key}.{}", DataFormat::Json.default_ext()));
        let value = serde_json::to_value(&site)?;
        fs::write(&file, DataFormat::Json.dump(&value)?).await?;
        info!(site = key, file = %file.display(), "registered folder site");
        Ok(site)
    }
}

/// Knows the `folder` initializer.
#[derive(Debug, Clone)]
pub struct DefaultSiteInitializerFactory {
    sites_dir: PathBuf,
}

impl DefaultSiteInitializerFactory {
    pub fn new(sites_dir: impl Into<PathBuf>) -> Self {
        Self {
            sites_dir: sites_dir.into(),
        }
    }
}

impl SiteInitializerFactory for DefaultSiteInitializerFactory {
    fn get(&self, type_name: &str) -> Result<Arc<dyn SiteInitializer>> {
        match type_name {
            "folder" => Ok(Arc::new(FolderSiteInitializer::new(&self.sites_dir))),
            other => Err(SitesError::UnknownSourceType {
                type_name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn folder_initializer_writes_site_and_workspace_config() {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("blog");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(workspace.join("config.toml"), "title = \"Blog\"\n").unwrap();
        let sites_dir = temp.path().join("sites");

        let config = TypedConfig::new("folder")
            .with_setting("key", "blog")
            .with_setting("path", workspace.to_string_lossy().into_owned())
            .with_setting("publishPath", "/tmp/out");
        let site = FolderSiteInitializer::new(&sites_dir)
            .initialize(&config)
            .await
            .unwrap();

        assert_eq!(site.name, "blog");
        assert_eq!(site.publish.len(), 1);
        assert!(sites_dir.join("config.blog.json").is_file());
        assert!(workspace.join("hokus.toml").is_file());
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let temp = TempDir::new().unwrap();
        let err = FolderSiteInitializer::new(temp.path())
            .initialize(&TypedConfig::new("folder").with_setting("path", "/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SitesError::MissingSetting { ref setting, .. } if setting == "key"));
    }

    #[test]
    fn factory_rejects_unknown_types() {
        let factory = DefaultSiteInitializerFactory::new("/sites");
        assert!(factory.get("folder").is_ok());
        assert!(factory.get("git").is_err());
    }
}
