//! Integration tests for the site service over in-memory seams

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hokus_sites::{
    Configurations, DefaultSiteInitializerFactory, DirectoryConfigurationProvider, FixedBuildDir,
    PublishConfig, PublishRequest, Publisher, PublisherFactory, Result, SiteConfig, SiteService,
    SiteSource, SiteSourceFactory, SitesError, StaticConfigurationProvider, TypedConfig,
    WorkspaceHeader,
};
use serde_json::Map;
use tempfile::TempDir;

/// A git-like source that supports every optional capability.
struct SyncingSource {
    root: PathBuf,
    synced: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl SiteSource for SyncingSource {
    async fn list_workspaces(&self) -> Result<Vec<WorkspaceHeader>> {
        Ok(vec![
            WorkspaceHeader {
                key: "main".into(),
                path: self.root.join("main"),
                state: "mounted".into(),
            },
            WorkspaceHeader {
                key: "draft".into(),
                path: self.root.join("draft"),
                state: "ready".into(),
            },
        ])
    }

    fn can_delete_workspace(&self, workspace_key: &str) -> bool {
        workspace_key != "main"
    }

    async fn can_sync_workspace(&self, _workspace_key: &str) -> Result<bool> {
        Ok(true)
    }

    async fn sync_workspace(&self, workspace_key: &str) -> Result<()> {
        self.synced
            .lock()
            .unwrap()
            .push(workspace_key.to_string());
        Ok(())
    }
}

struct SyncingFactory {
    root: PathBuf,
    synced: Arc<Mutex<Vec<String>>>,
}

impl SiteSourceFactory for SyncingFactory {
    fn get(&self, _site_key: &str, _config: &TypedConfig) -> Result<Arc<dyn SiteSource>> {
        Ok(Arc::new(SyncingSource {
            root: self.root.clone(),
            synced: Arc::clone(&self.synced),
        }))
    }
}

/// Records publish requests instead of shipping anything.
#[derive(Default)]
struct RecordingPublisher {
    requests: Mutex<Vec<(String, PublishRequest)>>,
}

struct RecordingFactory(Arc<RecordingPublisher>);

struct TaggedPublisher {
    target: String,
    recorder: Arc<RecordingPublisher>,
}

#[async_trait]
impl Publisher for TaggedPublisher {
    async fn publish(&self, request: PublishRequest) -> Result<()> {
        self.recorder
            .requests
            .lock()
            .unwrap()
            .push((self.target.clone(), request));
        Ok(())
    }
}

impl PublisherFactory for RecordingFactory {
    fn get_publisher(&self, config: &TypedConfig) -> Result<Arc<dyn Publisher>> {
        Ok(Arc::new(TaggedPublisher {
            target: config.setting_str("path").unwrap_or_default().to_string(),
            recorder: Arc::clone(&self.0),
        }))
    }
}

fn publish_entry(key: Option<&str>, path: Option<&str>) -> PublishConfig {
    PublishConfig {
        key: key.map(str::to_string),
        config: path.map(|path| TypedConfig::new("folder").with_setting("path", path)),
    }
}

fn site(key: &str, publish: Vec<PublishConfig>) -> SiteConfig {
    SiteConfig {
        key: key.into(),
        name: key.into(),
        source: TypedConfig::new("folder").with_setting("path", "/sites/blog"),
        publish,
        extra: Map::new(),
    }
}

fn static_configs(sites: Vec<SiteConfig>) -> Arc<StaticConfigurationProvider> {
    Arc::new(StaticConfigurationProvider(Configurations::Loaded { sites }))
}

#[tokio::test]
async fn test_folder_site_workspaces() {
    let service = SiteService::builder(static_configs(vec![site("blog", vec![])])).build();

    let workspaces = service.list_workspaces("blog").await.unwrap();
    assert_eq!(workspaces.len(), 1);

    let head = service.get_workspace_head("blog", "main").await.unwrap();
    assert_eq!(head.unwrap().path, PathBuf::from("/sites/blog"));
    assert!(service
        .get_workspace_head("blog", "other")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_capabilities_are_no_ops() {
    let service = SiteService::builder(static_configs(vec![site("blog", vec![])])).build();

    assert!(!service.can_sync_workspace("blog", "main").await.unwrap());
    service.sync_workspace("blog", "main").await.unwrap();
    service.mount_workspace("blog", "main").await.unwrap();
    assert!(!service.delete_workspace("blog", "main").await.unwrap());
}

#[tokio::test]
async fn test_capable_source_syncs_and_deletes() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("draft")).unwrap();
    std::fs::create_dir_all(temp.path().join("main")).unwrap();
    let synced = Arc::new(Mutex::new(Vec::new()));
    let service = SiteService::builder(static_configs(vec![site("blog", vec![])]))
        .with_sources(Arc::new(SyncingFactory {
            root: temp.path().to_path_buf(),
            synced: Arc::clone(&synced),
        }))
        .build();

    assert!(service.can_sync_workspace("blog", "draft").await.unwrap());
    service.sync_workspace("blog", "draft").await.unwrap();
    assert_eq!(*synced.lock().unwrap(), vec!["draft".to_string()]);

    assert!(service.delete_workspace("blog", "draft").await.unwrap());
    assert!(!temp.path().join("draft").exists());
    assert!(!service.delete_workspace("blog", "main").await.unwrap());
    assert!(temp.path().join("main").exists());
}

#[tokio::test]
async fn test_unknown_site_and_empty_configuration() {
    let service = SiteService::builder(static_configs(vec![site("blog", vec![])])).build();
    let err = service.list_workspaces("docs").await.unwrap_err();
    assert!(matches!(err, SitesError::SiteNotFound { ref key } if key == "docs"));

    let empty = SiteService::builder(Arc::new(StaticConfigurationProvider(
        Configurations::Empty,
    )))
    .build();
    let err = empty.list_workspaces("blog").await.unwrap_err();
    assert!(matches!(err, SitesError::EmptyConfiguration));
    assert!(empty.list_sites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_touch_site_broadcasts() {
    let service = SiteService::builder(static_configs(vec![])).build();
    let mut events = service.subscribe();

    service.touch_site("blog", "main");

    let event = events.recv().await.unwrap();
    assert_eq!(event.site_key, "blog");
    assert_eq!(event.workspace_key, "main");
}

#[tokio::test]
async fn test_publish_resolution_order() {
    let recorder = Arc::new(RecordingPublisher::default());
    let sites = vec![site(
        "blog",
        vec![
            publish_entry(Some("staging"), Some("/out/staging")),
            publish_entry(Some("default"), Some("/out/default")),
        ],
    )];
    let service = SiteService::builder(static_configs(sites))
        .with_publishers(Arc::new(RecordingFactory(Arc::clone(&recorder))))
        .with_build_dir(Arc::new(FixedBuildDir(Some("/build/public".into()))))
        .build();

    service.publish("blog", "staging").await.unwrap();
    service.publish("blog", "unknown").await.unwrap();
    service.publish("blog", "").await.unwrap();

    let requests = recorder.requests.lock().unwrap();
    let targets: Vec<&str> = requests.iter().map(|(target, _)| target.as_str()).collect();
    assert_eq!(targets, vec!["/out/staging", "/out/default", "/out/default"]);
    assert_eq!(requests[0].1.site_key, "blog");
    assert_eq!(requests[0].1.from, PathBuf::from("/build/public"));
}

#[tokio::test]
async fn test_publish_failures() {
    let sites = vec![
        site("blog", vec![publish_entry(Some("manual"), None)]),
        site(
            "docs",
            vec![
                publish_entry(Some("a"), Some("/a")),
                publish_entry(Some("b"), Some("/b")),
            ],
        ),
        site("wiki", vec![publish_entry(None, Some("/w"))]),
    ];
    let service = SiteService::builder(static_configs(sites)).build();

    let err = service.publish("blog", "manual").await.unwrap_err();
    assert!(matches!(err, SitesError::PublisherConfigMissing { .. }));

    let err = service.publish("docs", "c").await.unwrap_err();
    assert!(matches!(err, SitesError::PublisherNotFound { .. }));

    let err = service.publish("wiki", "").await.unwrap_err();
    assert!(matches!(err, SitesError::BuildDirUnresolved));
}

#[tokio::test]
async fn test_initialize_then_list_from_directory() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("blog");
    std::fs::create_dir_all(&workspace).unwrap();
    let sites_dir = temp.path().join("sites");

    let service = SiteService::builder(Arc::new(DirectoryConfigurationProvider::new(&sites_dir)))
        .with_initializers(Arc::new(DefaultSiteInitializerFactory::new(&sites_dir)))
        .build();

    service
        .initialize_site(
            &TypedConfig::new("folder")
                .with_setting("key", "blog")
                .with_setting("name", "My Blog")
                .with_setting("path", workspace.to_string_lossy().into_owned()),
        )
        .await
        .unwrap();

    let sites = service.list_sites().await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "My Blog");
    assert!(workspace.join("config.toml").is_file());
    assert!(workspace.join("hokus.toml").is_file());

    let head = service.get_workspace_head("blog", "main").await.unwrap().unwrap();
    assert_eq!(head.path, workspace);
}

#[tokio::test]
async fn test_initialize_without_initializers_fails() {
    let service = SiteService::builder(static_configs(Vec::new())).build();

    let err = service
        .initialize_site(&TypedConfig::new("folder").with_setting("key", "blog"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, SitesError::InitializersMissing { ref type_name } if type_name == "folder")
    );
}
