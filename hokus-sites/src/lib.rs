//! Sites, workspaces and publishing for Hokus
//!
//! A site is configured once (`config.<site>.json` in the sites directory)
//! and points at a source that provides its workspaces. [`SiteService`] runs
//! the app's operations against those sites through a handful of seams:
//!
//! - [`ConfigurationProvider`] - where site configs come from
//! - [`SiteSourceFactory`] / [`SiteSource`] - listing, syncing and mounting workspaces
//! - [`PublisherFactory`] / [`Publisher`] - shipping the last build somewhere
//! - [`SiteInitializerFactory`] / [`SiteInitializer`] - registering new sites
//!
//! [`InitialWorkspaceConfigBuilder`] derives a workspace's first `hokus.<ext>`
//! from its Hugo config.

pub mod configuration;
pub mod error;
pub mod initializer;
pub mod publish;
pub mod service;
pub mod source;
pub mod types;
pub mod workspace_config;

pub use configuration::{
    ConfigurationProvider, DirectoryConfigurationProvider, StaticConfigurationProvider,
};
pub use error::{Result, SitesError};
pub use initializer::{
    DefaultSiteInitializerFactory, FolderSiteInitializer, SiteInitializer, SiteInitializerFactory,
};
pub use publish::{
    find_first_match_or_default, BuildDirProvider, DefaultPublisherFactory, FixedBuildDir,
    FolderPublisher, Keyed, PublishRequest, Publisher, PublisherFactory,
};
pub use service::{SiteService, SiteServiceBuilder};
pub use source::{DefaultSiteSourceFactory, FolderSiteSource, SiteSource, SiteSourceFactory};
pub use types::{
    CollectionConfig, Configurations, HugoTarget, PublishConfig, SingleConfig, SiteConfig,
    SiteTouched, TypedConfig, WorkspaceConfig, WorkspaceHeader,
};
pub use workspace_config::{
    ensure_workspace_config, InitialWorkspaceConfig, InitialWorkspaceConfigBuilder,
};
