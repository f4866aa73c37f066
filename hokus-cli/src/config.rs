//! CLI configuration loaded with figment
//!
//! Sources are merged in precedence order, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `~/.hokus/hokus.{toml,yaml,yml,json}`
//! 3. `./.hokus/hokus.{toml,yaml,yml,json}`
//! 4. `HOKUS_` environment variables (`HOKUS_SITES_DIR`, `HOKUS_BUILD_DIR`, `HOKUS_LOG_LEVEL`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use figment::Figment;
use hokus_common::DataFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Directory holding the config file, under home and under the working directory.
pub const CONFIG_DIR: &str = ".hokus";

/// Stem of the config file inside [`CONFIG_DIR`].
pub const CONFIG_STEM: &str = "hokus";

pub const ENV_PREFIX: &str = "HOKUS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HokusConfig {
    /// Directory of `config.<site>.{json,yaml,toml}` site configs.
    pub sites_dir: PathBuf,
    /// Output of the last Hugo build, published by `hokus publish`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    /// Log level used when no verbosity flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl HokusConfig {
    /// Defaults relative to `home`, falling back to the working directory.
    pub fn defaults(home: Option<&Path>) -> Self {
        let base = home.map(Path::to_path_buf).unwrap_or_default();
        Self {
            sites_dir: base.join(CONFIG_DIR).join("sites"),
            build_dir: None,
            log_level: None,
        }
    }

    /// Load from the user's home directory and the current directory.
    pub fn load() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(dirs::home_dir().as_deref(), &cwd)
    }

    pub fn load_from(home: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        let config = Self::figment(home, cwd).extract::<Self>()?;
        debug!(sites_dir = %config.sites_dir.display(), "loaded configuration");
        Ok(config)
    }

    /// Every source merged in precedence order.
    pub fn figment(home: Option<&Path>, cwd: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::defaults(home)));
        let dirs = home.into_iter().chain(std::iter::once(cwd));
        for dir in dirs {
            for file in config_files(&dir.join(CONFIG_DIR)) {
                trace!(path = %file.display(), "merging config file");
                figment = match DataFormat::from_path(&file) {
                    Some(DataFormat::Toml) => figment.merge(Toml::file(&file)),
                    Some(DataFormat::Yaml) => figment.merge(Yaml::file(&file)),
                    Some(DataFormat::Json) => figment.merge(Json::file(&file)),
                    None => figment,
                };
            }
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}

/// Existing `hokus.<ext>` files in `dir`, in extension order.
fn config_files(dir: &Path) -> Vec<PathBuf> {
    DataFormat::all_extensions()
        .into_iter()
        .map(|ext| dir.join(format!("{CONFIG_STEM}.{ext}")))
        .filter(|path| path.is_file())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(root: &Path, name: &str, content: &str) {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    #[serial]
    fn test_defaults_live_under_home() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();

        let config = HokusConfig::load_from(Some(home.path()), cwd.path()).unwrap();

        assert_eq!(config.sites_dir, home.path().join(".hokus").join("sites"));
        assert_eq!(config.build_dir, None);
    }

    #[test]
    #[serial]
    fn test_project_file_overrides_home_file() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_config(home.path(), "hokus.toml", "sites_dir = \"/home-sites\"\nlog_level = \"debug\"\n");
        write_config(cwd.path(), "hokus.yaml", "sites_dir: /project-sites\n");

        let config = HokusConfig::load_from(Some(home.path()), cwd.path()).unwrap();

        assert_eq!(config.sites_dir, PathBuf::from("/project-sites"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_files() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        write_config(cwd.path(), "hokus.json", r#"{"build_dir": "/from-file"}"#);
        std::env::set_var("HOKUS_BUILD_DIR", "/from-env");

        let config = HokusConfig::load_from(Some(home.path()), cwd.path());
        std::env::remove_var("HOKUS_BUILD_DIR");

        assert_eq!(config.unwrap().build_dir, Some(PathBuf::from("/from-env")));
    }
}
