//! Host plugins the form calls out to.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FormsError, Result};

/// Fixed 5x5 PNG served by [`MockPlugins`].
pub const MOCK_THUMBNAIL_SRC: &str = "data:image/png;base64, iVBORw0KGgoAAAANSUhEUgAAAAUAAAAFCAYAAACNbyblAAAAHElEQVQI12P4//8/w38GIAXDIBKE0DHxgljNBAAO9TXL0Y4OHwAAAABJRU5ErkJggg==";

/// Arguments of a bundle file dialog request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleDialogParams {
    pub title: String,
    /// Accepted file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Bundle directory the picked files get copied into.
    pub target_path: String,
}

/// Capabilities the embedding application provides to bundle fields.
#[async_trait]
pub trait FormPlugins: Send + Sync {
    /// Let the user pick files to add to a page bundle
    async fn open_bundle_file_dialog(&self, params: BundleDialogParams) -> Result<Vec<PathBuf>>;

    /// Image source (usually a data URI) for a bundle file
    async fn get_bundle_thumbnail_src(&self, target_path: &str) -> Result<String>;
}

/// Plugins that pretend a file was picked and serve a placeholder thumbnail.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPlugins;

#[async_trait]
impl FormPlugins for MockPlugins {
    async fn open_bundle_file_dialog(&self, params: BundleDialogParams) -> Result<Vec<PathBuf>> {
        let extension = params
            .extensions
            .first()
            .map(String::as_str)
            .unwrap_or("png");
        Ok(vec![PathBuf::from(format!(
            "{}/some-file.{}",
            params.target_path, extension
        ))])
    }

    async fn get_bundle_thumbnail_src(&self, _target_path: &str) -> Result<String> {
        Ok(MOCK_THUMBNAIL_SRC.to_string())
    }
}

/// For hosts without a plugin provider; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

#[async_trait]
impl FormPlugins for NoPlugins {
    async fn open_bundle_file_dialog(&self, _params: BundleDialogParams) -> Result<Vec<PathBuf>> {
        Err(FormsError::Plugin {
            message: "no file dialog available".to_string(),
        })
    }

    async fn get_bundle_thumbnail_src(&self, target_path: &str) -> Result<String> {
        Err(FormsError::Plugin {
            message: format!("no thumbnail provider for '{target_path}'"),
        })
    }
}
