//! Where site configurations are read from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hokus_common::DataFormat;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Result, SitesError};
use crate::types::{Configurations, SiteConfig};

#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    async fn get(&self) -> Result<Configurations>;
}

/// Reads one `config.<site>.{json,yaml,yml,toml}` file per site from a directory.
///
/// Files that fail to parse are skipped with a warning so one broken site
/// does not hide the others.
#[derive(Debug, Clone)]
pub struct DirectoryConfigurationProvider {
    dir: PathBuf,
}

impl DirectoryConfigurationProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a site's config file is written to.
    pub fn site_config_path(&self, site_key: &str, format: DataFormat) -> PathBuf {
        self.dir
            .join(format!("config.{site_key}.{}", format.default_ext()))
    }

    async fn config_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.dir.exists() {
            return Ok(files);
        }
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_site_config = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("config."));
            if is_site_config && DataFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ConfigurationProvider for DirectoryConfigurationProvider {
    async fn get(&self) -> Result<Configurations> {
        let mut sites = Vec::new();
        for path in self.config_files().await? {
            let parsed = DataFormat::read_file(&path)
                .map_err(SitesError::from)
                .and_then(|(_, value)| Ok(serde_json::from_value::<SiteConfig>(value)?));
            match parsed {
                Ok(site) => sites.push(site),
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable site config"),
            }
        }
        debug!(dir = %self.dir.display(), sites = sites.len(), "loaded site configurations");
        if sites.is_empty() {
            return Ok(Configurations::Empty);
        }
        Ok(Configurations::Loaded { sites })
    }
}

/// Configurations held in memory.
#[derive(Debug, Clone)]
pub struct StaticConfigurationProvider(pub Configurations);

#[async_trait]
impl ConfigurationProvider for StaticConfigurationProvider {
    async fn get(&self) -> Result<Configurations> {
        Ok(self.0.clone())
    }
}
