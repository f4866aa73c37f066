//! Site commands, run through [`SiteService`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hokus_sites::{
    ensure_workspace_config, DefaultSiteInitializerFactory, DirectoryConfigurationProvider,
    FixedBuildDir, SiteService, TypedConfig,
};
use tracing::info;

use super::print_document;
use crate::cli::OutputFormat;
use crate::config::HokusConfig;
use crate::exit_codes::EXIT_SUCCESS;

fn site_service(config: &HokusConfig, build_dir: Option<PathBuf>) -> SiteService {
    SiteService::builder(Arc::new(DirectoryConfigurationProvider::new(
        &config.sites_dir,
    )))
    .with_initializers(Arc::new(DefaultSiteInitializerFactory::new(
        &config.sites_dir,
    )))
    .with_build_dir(Arc::new(FixedBuildDir(
        build_dir.or_else(|| config.build_dir.clone()),
    )))
    .build()
}

pub async fn list_sites(config: &HokusConfig, format: OutputFormat) -> anyhow::Result<i32> {
    let sites = site_service(config, None).list_sites().await?;
    print_document(&sites, format)?;
    Ok(EXIT_SUCCESS)
}

pub async fn list_workspaces(
    config: &HokusConfig,
    site: &str,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let workspaces = site_service(config, None).list_workspaces(site).await?;
    print_document(&workspaces, format)?;
    Ok(EXIT_SUCCESS)
}

pub async fn publish(
    config: &HokusConfig,
    site: &str,
    publish_key: &str,
    build_dir: Option<PathBuf>,
) -> anyhow::Result<i32> {
    site_service(config, build_dir)
        .publish(site, publish_key)
        .await?;
    info!(site, publish = publish_key, "published");
    Ok(EXIT_SUCCESS)
}

pub async fn init_site(
    config: &HokusConfig,
    key: &str,
    path: &Path,
    name: Option<&str>,
    publish_path: Option<&Path>,
) -> anyhow::Result<i32> {
    let mut settings = TypedConfig::new("folder")
        .with_setting("key", key)
        .with_setting("path", path.to_string_lossy().into_owned());
    if let Some(name) = name {
        settings = settings.with_setting("name", name);
    }
    if let Some(target) = publish_path {
        settings = settings.with_setting("publishPath", target.to_string_lossy().into_owned());
    }
    let site = site_service(config, None).initialize_site(&settings).await?;
    info!(site = %site.key, "site registered");
    Ok(EXIT_SUCCESS)
}

pub fn init_workspace(path: &Path, quiet: bool) -> anyhow::Result<i32> {
    let written = ensure_workspace_config(path)?;
    if !quiet {
        match written {
            Some(file) => println!("wrote {}", file.display()),
            None => println!("{} already has a hokus config", path.display()),
        }
    }
    Ok(EXIT_SUCCESS)
}
