//! The site service: the operations the app runs against configured sites.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::configuration::ConfigurationProvider;
use crate::error::{Result, SitesError};
use crate::initializer::SiteInitializerFactory;
use crate::publish::{
    find_first_match_or_default, BuildDirProvider, DefaultPublisherFactory, FixedBuildDir,
    PublishRequest, PublisherFactory,
};
use crate::source::{DefaultSiteSourceFactory, SiteSource, SiteSourceFactory};
use crate::types::{Configurations, SiteConfig, SiteTouched, TypedConfig, WorkspaceHeader};

const EVENT_CAPACITY: usize = 64;

/// Builder for [`SiteService`]. Created by [`SiteService::builder`].
pub struct SiteServiceBuilder {
    configurations: Arc<dyn ConfigurationProvider>,
    sources: Arc<dyn SiteSourceFactory>,
    publishers: Arc<dyn PublisherFactory>,
    initializers: Option<Arc<dyn SiteInitializerFactory>>,
    build_dir: Arc<dyn BuildDirProvider>,
}

impl SiteServiceBuilder {
    pub fn with_sources(mut self, sources: Arc<dyn SiteSourceFactory>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_publishers(mut self, publishers: Arc<dyn PublisherFactory>) -> Self {
        self.publishers = publishers;
        self
    }

    pub fn with_initializers(mut self, initializers: Arc<dyn SiteInitializerFactory>) -> Self {
        self.initializers = Some(initializers);
        self
    }

    pub fn with_build_dir(mut self, build_dir: Arc<dyn BuildDirProvider>) -> Self {
        self.build_dir = build_dir;
        self
    }

    pub fn build(self) -> SiteService {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SiteService {
            configurations: self.configurations,
            sources: self.sources,
            publishers: self.publishers,
            initializers: self.initializers,
            build_dir: self.build_dir,
            events,
        }
    }
}

pub struct SiteService {
    configurations: Arc<dyn ConfigurationProvider>,
    sources: Arc<dyn SiteSourceFactory>,
    publishers: Arc<dyn PublisherFactory>,
    initializers: Option<Arc<dyn SiteInitializerFactory>>,
    build_dir: Arc<dyn BuildDirProvider>,
    events: broadcast::Sender<SiteTouched>,
}

impl SiteService {
    /// Start building a service over `configurations`, with folder sources,
    /// folder publishers and no build directory.
    pub fn builder(configurations: Arc<dyn ConfigurationProvider>) -> SiteServiceBuilder {
        SiteServiceBuilder {
            configurations,
            sources: Arc::new(DefaultSiteSourceFactory),
            publishers: Arc::new(DefaultPublisherFactory),
            initializers: None,
            build_dir: Arc::new(FixedBuildDir::default()),
        }
    }

    /// Receive an event for every [`SiteService::touch_site`].
    pub fn subscribe(&self) -> broadcast::Receiver<SiteTouched> {
        self.events.subscribe()
    }

    pub async fn site_config(&self, site_key: &str) -> Result<SiteConfig> {
        match self.configurations.get().await? {
            Configurations::Empty => Err(SitesError::EmptyConfiguration),
            configs => configs
                .site(site_key)
                .cloned()
                .ok_or_else(|| SitesError::SiteNotFound {
                    key: site_key.to_string(),
                }),
        }
    }

    /// Every configured site.
    pub async fn list_sites(&self) -> Result<Vec<SiteConfig>> {
        match self.configurations.get().await? {
            Configurations::Empty => Ok(Vec::new()),
            Configurations::Loaded { sites } => Ok(sites),
        }
    }

    async fn site_source(&self, site_key: &str) -> Result<Arc<dyn SiteSource>> {
        let site = self.site_config(site_key).await?;
        self.sources.get(site_key, &site.source)
    }

    pub async fn list_workspaces(&self, site_key: &str) -> Result<Vec<WorkspaceHeader>> {
        self.site_source(site_key).await?.list_workspaces().await
    }

    pub async fn get_workspace_head(
        &self,
        site_key: &str,
        workspace_key: &str,
    ) -> Result<Option<WorkspaceHeader>> {
        let workspaces = self.list_workspaces(site_key).await?;
        Ok(workspaces
            .into_iter()
            .find(|workspace| workspace.key == workspace_key))
    }

    /// Remove the workspace's folder when the source allows it. Returns
    /// whether anything was deleted.
    pub async fn delete_workspace(&self, site_key: &str, workspace_key: &str) -> Result<bool> {
        let source = self.site_source(site_key).await?;
        if !source.can_delete_workspace(workspace_key) {
            debug!(site = site_key, workspace = workspace_key, "workspace cannot be deleted");
            return Ok(false);
        }
        let workspaces = source.list_workspaces().await?;
        let Some(workspace) = workspaces.iter().find(|w| w.key == workspace_key) else {
            return Ok(false);
        };
        if !workspace.path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(&workspace.path).await?;
        info!(site = site_key, workspace = workspace_key, "deleted workspace");
        Ok(true)
    }

    pub async fn can_sync_workspace(&self, site_key: &str, workspace_key: &str) -> Result<bool> {
        self.site_source(site_key)
            .await?
            .can_sync_workspace(workspace_key)
            .await
    }

    pub async fn sync_workspace(&self, site_key: &str, workspace_key: &str) -> Result<()> {
        self.site_source(site_key)
            .await?
            .sync_workspace(workspace_key)
            .await
    }

    /// Announce that a workspace was opened.
    pub fn touch_site(&self, site_key: &str, workspace_key: &str) {
        let event = SiteTouched {
            site_key: site_key.to_string(),
            workspace_key: workspace_key.to_string(),
        };
        if self.events.send(event).is_err() {
            trace!(site = site_key, "site touched with no subscribers");
        }
    }

    pub async fn mount_workspace(&self, site_key: &str, workspace_key: &str) -> Result<()> {
        self.site_source(site_key)
            .await?
            .mount_workspace(workspace_key)
            .await
    }

    /// Register a new site with the initializer for `config.type_`.
    pub async fn initialize_site(&self, config: &TypedConfig) -> Result<SiteConfig> {
        let initializers =
            self.initializers
                .as_ref()
                .ok_or_else(|| SitesError::InitializersMissing {
                    type_name: config.type_.clone(),
                })?;
        initializers.get(&config.type_)?.initialize(config).await
    }

    /// Publish the last build of a site with the publisher chosen by `publish_key`.
    pub async fn publish(&self, site_key: &str, publish_key: &str) -> Result<()> {
        let site = self.site_config(site_key).await?;
        let entry = find_first_match_or_default(&site.publish, publish_key)?;
        let config = entry
            .config
            .as_ref()
            .ok_or_else(|| SitesError::PublisherConfigMissing {
                key: entry.key.clone().unwrap_or_default(),
            })?;
        let from = self
            .build_dir
            .last_build_dir()
            .ok_or(SitesError::BuildDirUnresolved)?;

        let publisher = self.publishers.get_publisher(config)?;
        debug!(
            site = site_key,
            publish = publish_key,
            publisher = %config.type_,
            from = %from.display(),
            "publishing"
        );
        publisher
            .publish(PublishRequest {
                site_key: site.key.clone(),
                publish_key: publish_key.to_string(),
                from,
            })
            .await
    }
}
