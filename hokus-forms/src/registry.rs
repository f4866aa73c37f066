//! Field type registry.
//!
//! Maps a `type` tag to what the resolver and validator need to know about it:
//! how to descend into its data, what shape its value takes, and which host
//! plugin (if any) the renderer will call for it. How a field is painted is
//! the renderer's business and not described here.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// How the resolver treats a field's data and children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Structure {
    /// Holds a single value.
    Leaf,
    /// Holds no data (`info`, thumbnails).
    Pseudo,
    /// Holds an array of objects, each resolved against the child fields.
    Accordion,
    /// Groups child fields; with `groupdata` they read from an object under the key.
    Nest,
    /// Holds an array of scalars edited through a single item template.
    LeafArray,
}

/// The shape a stored value must have.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ValueShape {
    Any,
    String,
    Boolean,
    Number,
    Array,
    Object,
}

impl ValueShape {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ValueShape::Any => true,
            ValueShape::String => value.is_string(),
            ValueShape::Boolean => value.is_boolean(),
            ValueShape::Number => value.is_number(),
            ValueShape::Array => value.is_array(),
            ValueShape::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueShape::Any => "any value",
            ValueShape::String => "a string",
            ValueShape::Boolean => "a boolean",
            ValueShape::Number => "a number",
            ValueShape::Array => "an array",
            ValueShape::Object => "an object",
        };
        f.write_str(name)
    }
}

/// Host plugins a field type relies on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    OpenBundleFileDialog,
    BundleThumbnail,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::OpenBundleFileDialog => f.write_str("openBundleFileDialog"),
            Capability::BundleThumbnail => f.write_str("getBundleThumbnailSrc"),
        }
    }
}

/// Schema-level metadata for one field type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldTypeDef {
    pub name: String,
    pub structure: Structure,
    pub value_shape: ValueShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
}

impl FieldTypeDef {
    pub fn new(name: impl Into<String>, structure: Structure, value_shape: ValueShape) -> Self {
        Self {
            name: name.into(),
            structure,
            value_shape,
            capability: None,
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Pseudo types are exempt from key uniqueness and never get defaults.
    pub fn holds_data(&self) -> bool {
        self.structure != Structure::Pseudo
    }
}

/// Lookup table from type tag to [`FieldTypeDef`].
#[derive(Debug, Clone)]
pub struct FieldTypeRegistry {
    types: HashMap<String, FieldTypeDef>,
}

static BUILTINS: LazyLock<FieldTypeRegistry> = LazyLock::new(FieldTypeRegistry::with_builtins);

impl FieldTypeRegistry {
    /// An empty registry. Every tag resolves to an opaque leaf.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// The shared registry of built-in types.
    pub fn builtin() -> &'static FieldTypeRegistry {
        &BUILTINS
    }

    /// A registry seeded with the types the desktop app ships with.
    pub fn with_builtins() -> Self {
        use Structure::*;
        Self::new()
            .with(FieldTypeDef::new("string", Leaf, ValueShape::String))
            .with(FieldTypeDef::new("markdown", Leaf, ValueShape::String))
            .with(FieldTypeDef::new("date", Leaf, ValueShape::String))
            .with(FieldTypeDef::new("readonly", Leaf, ValueShape::Any))
            .with(FieldTypeDef::new("hidden", Leaf, ValueShape::Any))
            .with(FieldTypeDef::new("number", Leaf, ValueShape::Number))
            .with(FieldTypeDef::new("boolean", Leaf, ValueShape::Boolean))
            .with(FieldTypeDef::new("select", Leaf, ValueShape::Any))
            .with(FieldTypeDef::new("info", Pseudo, ValueShape::Any))
            .with(FieldTypeDef::new("accordion", Accordion, ValueShape::Array))
            .with(FieldTypeDef::new("nest", Nest, ValueShape::Object))
            .with(FieldTypeDef::new("leaf-array", LeafArray, ValueShape::Array))
            .with(
                FieldTypeDef::new("bundle-manager", Accordion, ValueShape::Array)
                    .with_capability(Capability::OpenBundleFileDialog),
            )
            .with(
                FieldTypeDef::new("bundle-image-thumbnail", Pseudo, ValueShape::Any)
                    .with_capability(Capability::BundleThumbnail),
            )
    }

    /// Register or replace a type.
    pub fn register(&mut self, def: FieldTypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    /// Builder-style [`FieldTypeRegistry::register`].
    pub fn with(mut self, def: FieldTypeDef) -> Self {
        self.register(def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldTypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Like [`FieldTypeRegistry::get`], falling back to an opaque leaf for
    /// tags the registry does not know.
    pub fn resolve(&self, name: &str) -> FieldTypeDef {
        match self.get(name) {
            Some(def) => def.clone(),
            None => {
                warn!(field_type = name, "unknown field type, treating as a plain value");
                FieldTypeDef::new(name, Structure::Leaf, ValueShape::Any)
            }
        }
    }

    /// Registered tags, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_cover_desktop_types() {
        let registry = FieldTypeRegistry::builtin();
        for name in [
            "string",
            "boolean",
            "select",
            "nest",
            "accordion",
            "leaf-array",
            "info",
            "markdown",
            "date",
            "readonly",
            "bundle-manager",
            "bundle-image-thumbnail",
        ] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn pseudo_types_hold_no_data() {
        let registry = FieldTypeRegistry::builtin();
        assert!(!registry.get("info").unwrap().holds_data());
        assert!(!registry.get("bundle-image-thumbnail").unwrap().holds_data());
        assert!(registry.get("string").unwrap().holds_data());
    }

    #[test]
    fn bundle_types_carry_capabilities() {
        let registry = FieldTypeRegistry::builtin();
        assert_eq!(
            registry.get("bundle-manager").unwrap().capability,
            Some(Capability::OpenBundleFileDialog)
        );
        assert_eq!(
            registry.get("bundle-image-thumbnail").unwrap().capability,
            Some(Capability::BundleThumbnail)
        );
        assert_eq!(registry.get("string").unwrap().capability, None);
    }

    #[test]
    fn unknown_types_resolve_to_opaque_leaf() {
        let def = FieldTypeRegistry::new().resolve("color-picker");
        assert_eq!(def.structure, Structure::Leaf);
        assert_eq!(def.value_shape, ValueShape::Any);
        assert!(def.holds_data());
    }

    #[test]
    fn custom_types_can_be_registered() {
        let mut registry = FieldTypeRegistry::with_builtins();
        registry.register(FieldTypeDef::new("slider", Structure::Leaf, ValueShape::Number));
        assert_eq!(
            registry.resolve("slider").value_shape,
            ValueShape::Number
        );
    }

    #[test]
    fn value_shapes() {
        assert!(ValueShape::Boolean.accepts(&json!(true)));
        assert!(!ValueShape::Boolean.accepts(&json!("true")));
        assert!(ValueShape::Array.accepts(&json!([])));
        assert!(ValueShape::Any.accepts(&json!(null)));
        assert_eq!(ValueShape::Number.to_string(), "a number");
    }
}
