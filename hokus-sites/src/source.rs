//! Site sources: where a site's workspaces come from.
//!
//! Only listing workspaces is mandatory. Deleting, syncing and mounting are
//! optional capabilities; the default methods report them as unsupported and
//! [`SiteService`](crate::SiteService) turns that into a no-op.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, SitesError};
use crate::types::{TypedConfig, WorkspaceHeader};

/// Provides the workspaces of one site.
#[async_trait]
pub trait SiteSource: Send + Sync {
    /// All workspaces of the site
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceHeader>>;

    /// Whether the workspace may be removed from disk
    fn can_delete_workspace(&self, _workspace_key: &str) -> bool {
        false
    }

    /// Whether the workspace can be synchronized with its origin
    async fn can_sync_workspace(&self, _workspace_key: &str) -> Result<bool> {
        Ok(false)
    }

    /// Synchronize the workspace with its origin
    async fn sync_workspace(&self, _workspace_key: &str) -> Result<()> {
        Ok(())
    }

    /// Prepare the workspace for editing
    async fn mount_workspace(&self, _workspace_key: &str) -> Result<()> {
        Ok(())
    }
}

/// Builds the [`SiteSource`] for a site's `source` config.
pub trait SiteSourceFactory: Send + Sync {
    fn get(&self, site_key: &str, config: &TypedConfig) -> Result<Arc<dyn SiteSource>>;
}

/// Workspace key of the single workspace a folder source exposes.
pub const FOLDER_WORKSPACE_KEY: &str = "main";

/// A site whose only workspace is a local folder, edited in place.
#[derive(Debug, Clone)]
pub struct FolderSiteSource {
    path: PathBuf,
}

impl FolderSiteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &TypedConfig) -> Result<Self> {
        let path = config
            .setting_str("path")
            .ok_or_else(|| SitesError::MissingSetting {
                kind: "folder source".to_string(),
                setting: "path".to_string(),
            })?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl SiteSource for FolderSiteSource {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceHeader>> {
        Ok(vec![WorkspaceHeader {
            key: FOLDER_WORKSPACE_KEY.to_string(),
            path: self.path.clone(),
            state: "mounted".to_string(),
        }])
    }
}

/// Knows the `folder` source type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSiteSourceFactory;

impl SiteSourceFactory for DefaultSiteSourceFactory {
    fn get(&self, site_key: &str, config: &TypedConfig) -> Result<Arc<dyn SiteSource>> {
        match config.type_.as_str() {
            "folder" => {
                tracing::trace!(site = site_key, "creating folder site source");
                Ok(Arc::new(FolderSiteSource::from_config(config)?))
            }
            other => Err(SitesError::UnknownSourceType {
                type_name: other.to_string(),
            }),
        }
    }
}
