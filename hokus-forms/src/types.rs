//! Schema node types for form definitions.
//!
//! A form is described by a list of [`SchemaNode`]s. Concrete fields carry a
//! `key` and a `type`; two pseudo-nodes, `include` and `extend`, are replaced
//! during resolution. All types serialize to/from JSON with the same shape the
//! desktop app stores them in, including type-specific attributes this crate
//! does not interpret.

use std::path::Path;

use hokus_common::DataFormat;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::fragments::FragmentTable;

/// Type tag of an include node.
pub const INCLUDE_TYPE: &str = "include";
/// Type tag of an extend node.
pub const EXTEND_TYPE: &str = "extend";

/// One entry of a field list.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Field(FieldSpec),
    Include(IncludeSpec),
    Extend(ExtendSpec),
}

impl SchemaNode {
    /// The node's key, when it has one.
    pub fn key(&self) -> Option<&str> {
        match self {
            SchemaNode::Field(field) => Some(&field.key),
            SchemaNode::Include(include) => include.key.as_deref(),
            SchemaNode::Extend(extend) => extend.key.as_deref(),
        }
    }

    /// The `type` tag this node serializes with.
    pub fn type_tag(&self) -> &str {
        match self {
            SchemaNode::Field(field) => &field.type_,
            SchemaNode::Include(_) => INCLUDE_TYPE,
            SchemaNode::Extend(_) => EXTEND_TYPE,
        }
    }
}

impl From<FieldSpec> for SchemaNode {
    fn from(field: FieldSpec) -> Self {
        SchemaNode::Field(field)
    }
}

impl From<IncludeSpec> for SchemaNode {
    fn from(include: IncludeSpec) -> Self {
        SchemaNode::Include(include)
    }
}

impl From<ExtendSpec> for SchemaNode {
    fn from(extend: ExtendSpec) -> Self {
        SchemaNode::Extend(extend)
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    #[serde(rename = "type")]
    type_: &'static str,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Field(field) => field.serialize(serializer),
            SchemaNode::Include(include) => Tagged {
                type_: INCLUDE_TYPE,
                inner: include,
            }
            .serialize(serializer),
            SchemaNode::Extend(extend) => Tagged {
                type_: EXTEND_TYPE,
                inner: extend,
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        let Some(object) = value.as_object_mut() else {
            return Err(D::Error::custom("schema node must be an object"));
        };
        let tag = match object.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => return Err(D::Error::custom("schema node `type` must be a string")),
            None => return Err(D::Error::custom("schema node is missing its `type` tag")),
        };
        match tag.as_str() {
            INCLUDE_TYPE => {
                object.remove("type");
                IncludeSpec::deserialize(value)
                    .map(SchemaNode::Include)
                    .map_err(D::Error::custom)
            }
            EXTEND_TYPE => {
                object.remove("type");
                ExtendSpec::deserialize(value)
                    .map(SchemaNode::Extend)
                    .map_err(D::Error::custom)
            }
            _ => FieldSpec::deserialize(value)
                .map(SchemaNode::Field)
                .map_err(D::Error::custom),
        }
    }
}

/// Keeps an explicit `null` default distinct from an absent one.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A concrete field: something the renderer paints and, usually, a value in the data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub key: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    /// Child fields of container types (`accordion`, `nest`, `bundle-manager`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<SchemaNode>>,
    /// Item template of `leaf-array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Box<SchemaNode>>,
    /// Type-specific attributes (`options`, `itemTitleKey`, `multiline`, ...).
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            type_: type_.into(),
            title: None,
            default: None,
            required: None,
            tip: None,
            fields: None,
            field: None,
            attrs: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<SchemaNode>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// A boolean attribute, `false` when absent or not a boolean.
    pub fn attr_flag(&self, name: &str) -> bool {
        self.attr(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Child field list, empty for leaf types.
    pub fn child_fields(&self) -> &[SchemaNode] {
        self.fields.as_deref().unwrap_or(&[])
    }

    /// Copy without the child field list. Resolved fields carry their
    /// resolved children separately.
    pub fn without_children(&self) -> Self {
        Self {
            key: self.key.clone(),
            type_: self.type_.clone(),
            title: self.title.clone(),
            default: self.default.clone(),
            required: self.required,
            tip: self.tip.clone(),
            fields: None,
            field: self.field.clone(),
            attrs: self.attrs.clone(),
        }
    }
}

/// `{type: "include", include: name}`: splice a named fragment in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncludeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub include: String,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl IncludeSpec {
    pub fn new(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        Self {
            key: Some(fragment.clone()),
            include: fragment,
            attrs: Map::new(),
        }
    }
}

/// One selectable branch of an extend node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtendVariant {
    pub key: String,
    #[serde(default)]
    pub fields: Vec<SchemaNode>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl ExtendVariant {
    pub fn new(key: impl Into<String>, fields: Vec<SchemaNode>) -> Self {
        Self {
            key: key.into(),
            fields,
            attrs: Map::new(),
        }
    }
}

/// `{type: "extend", selectorKey, types: [...]}`: pick a field list by a sibling's value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtendSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub selector_key: String,
    #[serde(default)]
    pub types: Vec<ExtendVariant>,
    /// On selector change, clear every key in scope except these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_except: Option<Vec<String>>,
    /// On selector change, clear only these keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_on_change: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupdata: Option<bool>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl ExtendSpec {
    pub fn new(selector_key: impl Into<String>, types: Vec<ExtendVariant>) -> Self {
        Self {
            key: None,
            selector_key: selector_key.into(),
            types,
            clear_except: None,
            clear_on_change: None,
            nest: None,
            groupdata: None,
            attrs: Map::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn variant(&self, tag: &str) -> Option<&ExtendVariant> {
        self.types.iter().find(|variant| variant.key == tag)
    }

    pub fn is_nested(&self) -> bool {
        self.nest.unwrap_or(false) || self.is_grouped()
    }

    pub fn is_grouped(&self) -> bool {
        self.groupdata.unwrap_or(false)
    }
}

/// A complete form definition: root field list plus the fragments it includes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormSchema {
    #[serde(default)]
    pub fields: Vec<SchemaNode>,
    #[serde(default)]
    pub includes: FragmentTable,
}

impl FormSchema {
    pub fn new(fields: Vec<SchemaNode>, includes: FragmentTable) -> Self {
        Self { fields, includes }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read a schema from a `.json`, `.yaml`/`.yml` or `.toml` file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let (_, value) = DataFormat::read_file(path)?;
        Self::from_value(value)
    }
}
