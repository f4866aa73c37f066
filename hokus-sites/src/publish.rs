//! Publishing built sites.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, SitesError};
use crate::types::{PublishConfig, TypedConfig};

/// What to publish and from where.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub site_key: String,
    pub publish_key: String,
    /// Output directory of the last build.
    pub from: PathBuf,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: PublishRequest) -> Result<()>;
}

/// Builds a [`Publisher`] for a publish entry's `config`.
pub trait PublisherFactory: Send + Sync {
    fn get_publisher(&self, config: &TypedConfig) -> Result<Arc<dyn Publisher>>;
}

/// Where the last build landed.
pub trait BuildDirProvider: Send + Sync {
    fn last_build_dir(&self) -> Option<PathBuf>;
}

/// A build directory fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct FixedBuildDir(pub Option<PathBuf>);

impl BuildDirProvider for FixedBuildDir {
    fn last_build_dir(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Items that can be picked by key with a fallback to a default entry.
pub trait Keyed {
    fn key(&self) -> Option<&str>;
}

impl Keyed for PublishConfig {
    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// Pick the entry for `key`.
///
/// Tries an exact key match first (when `key` is not empty), then an entry
/// keyed `default`, empty or unkeyed, then the only entry if there is just
/// one.
pub fn find_first_match_or_default<'t, T: Keyed>(items: &'t [T], key: &str) -> Result<&'t T> {
    if !key.is_empty() {
        if let Some(item) = items.iter().find(|item| item.key() == Some(key)) {
            return Ok(item);
        }
    }
    if let Some(item) = items
        .iter()
        .find(|item| matches!(item.key(), None | Some("") | Some("default")))
    {
        return Ok(item);
    }
    match items {
        [only] => Ok(only),
        _ => Err(SitesError::PublisherNotFound {
            key: key.to_string(),
        }),
    }
}

/// Copies the build output into a local directory.
#[derive(Debug, Clone)]
pub struct FolderPublisher {
    target: PathBuf,
}

impl FolderPublisher {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn from_config(config: &TypedConfig) -> Result<Self> {
        let path = config
            .setting_str("path")
            .ok_or_else(|| SitesError::MissingSetting {
                kind: "folder publisher".to_string(),
                setting: "path".to_string(),
            })?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Publisher for FolderPublisher {
    async fn publish(&self, request: PublishRequest) -> Result<()> {
        let from = request.from.clone();
        let target = self.target.clone();
        let copied = tokio::task::spawn_blocking(move || copy_tree(&from, &target))
            .await
            .map_err(|err| SitesError::Io(std::io::Error::other(err)))??;
        info!(
            site = %request.site_key,
            publish = %request.publish_key,
            files = copied,
            target = %self.target.display(),
            "published site"
        );
        Ok(())
    }
}

/// Copy every file under `from` into `to`, keeping relative paths.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|err| SitesError::Io(err.into()))?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let destination = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)?;
        } else {
            std::fs::copy(entry.path(), &destination)?;
            copied += 1;
            debug!(file = %relative.display(), "copied");
        }
    }
    Ok(copied)
}

/// Knows the `folder` publisher type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPublisherFactory;

impl PublisherFactory for DefaultPublisherFactory {
    fn get_publisher(&self, config: &TypedConfig) -> Result<Arc<dyn Publisher>> {
        match config.type_.as_str() {
            "folder" => Ok(Arc::new(FolderPublisher::from_config(config)?)),
            other => Err(SitesError::UnknownPublisherType {
                type_name: other.to_string(),
            }),
        }
    }
}
