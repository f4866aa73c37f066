//! Type-conditional field lists.
//!
//! An extend node picks one of its variants by the current value of a sibling
//! field (the selector). Resolution is a pure function of that value: no
//! selector value or no matching variant both mean "nothing selected yet" and
//! produce an empty list.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{FormsError, Result};
use crate::fragments::FragmentId;
use crate::include::{IncludeResolver, LevelNode};
use crate::path::DataPath;
use crate::types::ExtendSpec;

/// Coerce a selector value to the tag variants are keyed by.
///
/// Strings are used as-is, booleans become `"true"`/`"false"`, numbers use
/// their JSON rendering. Null, arrays and objects never select anything.
pub fn selector_tag(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(tag) => Some(tag.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Where the chosen variant's fields end up.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement<'a> {
    /// Spliced in place of the extend node.
    Splice(Vec<LevelNode<'a>>),
    /// Wrapped in a group field named `key`. With `scoped`, the group reads
    /// its data from the object under `key`.
    Group {
        key: String,
        scoped: bool,
        nodes: Vec<LevelNode<'a>>,
    },
}

impl Placement<'_> {
    pub fn nodes(&self) -> &[LevelNode<'_>] {
        match self {
            Placement::Splice(nodes) => nodes,
            Placement::Group { nodes, .. } => nodes,
        }
    }
}

/// Outcome of resolving one extend node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendResolution<'a> {
    /// Tag of the variant that matched, if any.
    pub selected: Option<String>,
    pub placement: Placement<'a>,
}

/// Which keys to drop from the data when the selector value changes.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ClearPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub except: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_change: Option<Vec<String>>,
}

impl ClearPolicy {
    pub fn from_spec(spec: &ExtendSpec) -> Self {
        Self {
            except: spec.clear_except.clone(),
            on_change: spec.clear_on_change.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.except.is_none() && self.on_change.is_none()
    }

    /// Keys of `scope` to remove after a selector change.
    ///
    /// `clearExcept` wins over `clearOnChange`: when it is present every key
    /// not listed is cleared, so a key named by both lists is kept. `protect`
    /// (the selector itself, when it lives in the same scope) is never cleared.
    pub fn keys_to_clear(&self, scope: &Map<String, Value>, protect: Option<&str>) -> Vec<String> {
        let protected = |key: &str| protect == Some(key);
        if let Some(except) = &self.except {
            return scope
                .keys()
                .filter(|key| !protected(key.as_str()) && !except.iter().any(|kept| kept == *key))
                .cloned()
                .collect();
        }
        if let Some(on_change) = &self.on_change {
            return on_change
                .iter()
                .filter(|key| !protected(key.as_str()) && scope.contains_key(key.as_str()))
                .cloned()
                .collect();
        }
        Vec::new()
    }
}

/// Resolves extend nodes against a data scope.
#[derive(Debug, Clone, Copy)]
pub struct ExtendResolver<'r, 'a> {
    include: &'r IncludeResolver<'a>,
}

impl<'r, 'a> ExtendResolver<'r, 'a> {
    pub fn new(include: &'r IncludeResolver<'a>) -> Self {
        Self { include }
    }

    /// Pick the variant for the selector value found in `scope`.
    ///
    /// `chain` is the fragment chain the extend node was found in. Variants
    /// that stay in the same data scope continue it; a `groupdata` variant
    /// reads from the object under the extend's key and starts a fresh chain.
    pub fn resolve(
        &self,
        spec: &'a ExtendSpec,
        chain: &[FragmentId],
        scope: Option<&Value>,
        at: &DataPath,
    ) -> Result<ExtendResolution<'a>> {
        let value = scope.and_then(|scope| scope.get(spec.selector_key.as_str()));
        let tag = selector_tag(value);
        let variant = tag.as_deref().and_then(|tag| spec.variant(tag));

        trace!(
            selector = %spec.selector_key,
            tag = ?tag,
            matched = variant.is_some(),
            path = %at,
            "resolving extend"
        );

        let chain = if spec.is_grouped() { &[][..] } else { chain };
        let nodes = match variant {
            Some(variant) => self.include.resolve_within(&variant.fields, chain, at)?,
            None => Vec::new(),
        };
        let selected = variant.map(|variant| variant.key.clone());

        let placement = if spec.is_nested() {
            let key = spec.key.clone().ok_or_else(|| FormsError::InvalidSchema {
                message: format!(
                    "extend on '{}' sets nest or groupdata but has no key",
                    spec.selector_key
                ),
                path: at.clone(),
            })?;
            Placement::Group {
                key,
                scoped: spec.is_grouped(),
                nodes,
            }
        } else {
            Placement::Splice(nodes)
        };

        Ok(ExtendResolution {
            selected,
            placement,
        })
    }
}
