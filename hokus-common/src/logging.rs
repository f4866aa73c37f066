//! Logging utilities for Hokus

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as YAML
///
/// Form data and site configs are nested documents; wrapping them keeps
/// multi-line log output readable.
///
/// ```
/// use hokus_common::Pretty;
/// use serde_json::json;
///
/// let site = json!({"key": "blog", "source": {"type": "folder", "path": "/srv/blog"}});
/// tracing::debug!("site config: {}", Pretty(&site));
///
/// let rendered = Pretty(&site).to_string();
/// assert!(rendered.contains("type: folder"));
/// assert_eq!(format!("{:?}", Pretty(&site)), rendered);
/// ```
///
/// Debug renders the same text as Display, falling back to `{:#?}` when
/// YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
