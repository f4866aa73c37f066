//! Schema tree builder.
//!
//! Turns a [`FormSchema`] and the current form data into a
//! [`ResolvedFieldTree`]: includes spliced, extends replaced by their selected
//! variant, nested levels resolved against the data they describe, and the
//! defaults for missing values collected on the side. The caller's data is
//! never modified.
//!
//! Nested levels follow the data. An accordion resolves one item list per
//! array element and nothing when the array is empty or missing. A nest that
//! does not move into a new data object (no `groupdata`, or its object is
//! missing) is tracked; meeting the same nest again before any real data
//! level is entered leaves it [`Children::Deferred`] instead of recursing.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FormsError, Result};
use crate::extend::{ClearPolicy, ExtendResolver, Placement};
use crate::fragments::FragmentId;
use crate::include::{IncludeResolver, LevelNode};
use crate::path::DataPath;
use crate::registry::{Capability, FieldTypeDef, FieldTypeRegistry, Structure, ValueShape};
use crate::types::{FieldSpec, FormSchema, SchemaNode};

/// Children of a resolved field.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Children {
    None,
    /// Child fields of a nest. `scoped` children read from the object under the nest's key.
    Group {
        scoped: bool,
        fields: Vec<ResolvedField>,
    },
    /// One resolved field list per array element.
    Items { items: Vec<ResolvedItem> },
    /// A recursive nest with no data to descend into yet.
    Deferred,
}

impl Children {
    pub fn is_none(&self) -> bool {
        matches!(self, Children::None)
    }
}

/// One element of an accordion or bundle list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedItem {
    pub path: DataPath,
    pub fields: Vec<ResolvedField>,
}

/// A concrete field ready for rendering.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedField {
    pub spec: FieldSpec,
    pub path: DataPath,
    pub structure: Structure,
    pub value_shape: ValueShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
    #[serde(skip_serializing_if = "Children::is_none")]
    pub children: Children,
}

impl ResolvedField {
    fn new(spec: FieldSpec, path: DataPath, def: &FieldTypeDef, children: Children) -> Self {
        Self {
            spec,
            path,
            structure: def.structure,
            value_shape: def.value_shape,
            capability: def.capability,
            children,
        }
    }

    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn field_type(&self) -> &str {
        &self.spec.type_
    }

    pub fn title(&self) -> Option<&str> {
        self.spec.title.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.spec.is_required()
    }

    pub fn holds_data(&self) -> bool {
        self.structure != Structure::Pseudo
    }

    /// A nest without `groupdata`: its children live in the parent's object.
    pub fn shares_scope(&self) -> bool {
        self.structure == Structure::Nest && !self.spec.attr_flag("groupdata")
    }
}

/// Where an extend's selector lives and what to clear when it changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExtendBinding {
    /// Path of the selector value.
    pub selector: DataPath,
    /// Object whose keys the clear policy applies to.
    pub clear_scope: DataPath,
    /// Variant tag currently selected.
    pub selected: Option<String>,
    pub policy: ClearPolicy,
}

/// Defaults for values missing from the data, keyed by where they belong.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DefaultMap(IndexMap<DataPath, Value>);

impl DefaultMap {
    pub fn get(&self, path: &DataPath) -> Option<&Value> {
        self.0.get(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DataPath, &Value)> {
        self.0.iter()
    }

    fn record(&mut self, path: DataPath, value: Value) {
        self.0.entry(path).or_insert(value);
    }

    /// Write every default whose slot is still empty. Returns how many were written.
    pub fn apply_to(&self, data: &mut Value) -> Result<usize> {
        let mut applied = 0;
        for (path, value) in &self.0 {
            if path.lookup(data).is_none() {
                path.set(data, value.clone())?;
                applied += 1;
            }
        }
        Ok(applied)
    }
}

/// The include/extend-free field tree for one render pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ResolvedFieldTree {
    pub fields: Vec<ResolvedField>,
    pub defaults: DefaultMap,
    pub bindings: Vec<ExtendBinding>,
}

impl ResolvedFieldTree {
    /// Keys of the top-level fields, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(ResolvedField::key).collect()
    }

    /// Every resolved field, depth first.
    pub fn walk(&self) -> Vec<&ResolvedField> {
        let mut out = Vec::new();
        collect(&self.fields, &mut out);
        out
    }

    /// The field whose value lives at `path`.
    pub fn find(&self, path: &DataPath) -> Option<&ResolvedField> {
        self.walk().into_iter().find(|field| &field.path == path)
    }

    /// Every binding whose selector value lives at `path`.
    pub fn bindings_for(&self, path: &DataPath) -> Vec<&ExtendBinding> {
        self.bindings
            .iter()
            .filter(|binding| &binding.selector == path)
            .collect()
    }

    /// Number of nested item levels the data reached.
    pub fn depth(&self) -> usize {
        depth_of(&self.fields)
    }
}

fn collect<'t>(fields: &'t [ResolvedField], out: &mut Vec<&'t ResolvedField>) {
    for field in fields {
        out.push(field);
        match &field.children {
            Children::Group { fields, .. } => collect(fields, out),
            Children::Items { items } => {
                for item in items {
                    collect(&item.fields, out);
                }
            }
            Children::None | Children::Deferred => {}
        }
    }
}

fn depth_of(fields: &[ResolvedField]) -> usize {
    fields
        .iter()
        .map(|field| match &field.children {
            Children::Items { items } if !items.is_empty() => {
                1 + items
                    .iter()
                    .map(|item| depth_of(&item.fields))
                    .max()
                    .unwrap_or(0)
            }
            Children::Group { fields, .. } => depth_of(fields),
            _ => 0,
        })
        .max()
        .unwrap_or(0)
}

/// State of one build pass.
#[derive(Default)]
struct Pass<'a> {
    defaults: DefaultMap,
    bindings: Vec<ExtendBinding>,
    /// Nests entered since the last real data level.
    same_scope: Vec<&'a FieldSpec>,
    /// Set beneath a group whose key holds a non-object value.
    skip_defaults: bool,
}

impl<'a> Pass<'a> {
    /// Run `step` inside a new data level, where nest tracking starts over.
    fn descend<T>(&mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = std::mem::take(&mut self.same_scope);
        let result = step(self);
        self.same_scope = saved;
        result
    }

    /// Run `step` without recording defaults. Used below a scalar that sits
    /// where a group expects an object, since nothing can be written there.
    fn without_defaults<T>(&mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = std::mem::replace(&mut self.skip_defaults, true);
        let result = step(self);
        self.skip_defaults = saved;
        result
    }
}

/// Resolves a schema against data.
pub struct TreeBuilder<'a> {
    schema: &'a FormSchema,
    registry: &'a FieldTypeRegistry,
    include: IncludeResolver<'a>,
}

impl<'a> TreeBuilder<'a> {
    /// A builder using the built-in field types.
    pub fn new(schema: &'a FormSchema) -> Self {
        Self::with_registry(schema, FieldTypeRegistry::builtin())
    }

    pub fn with_registry(schema: &'a FormSchema, registry: &'a FieldTypeRegistry) -> Self {
        Self {
            schema,
            registry,
            include: IncludeResolver::new(&schema.includes),
        }
    }

    pub fn build(&self, data: &Value) -> Result<ResolvedFieldTree> {
        let mut pass = Pass::default();
        let fields = self.resolve_list(
            &self.schema.fields,
            &[],
            &DataPath::root(),
            Some(data),
            &mut pass,
        )?;
        debug!(
            fields = fields.len(),
            defaults = pass.defaults.len(),
            bindings = pass.bindings.len(),
            "resolved form tree"
        );
        Ok(ResolvedFieldTree {
            fields,
            defaults: pass.defaults,
            bindings: pass.bindings,
        })
    }

    fn resolve_list(
        &self,
        nodes: &'a [SchemaNode],
        chain: &[FragmentId],
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
    ) -> Result<Vec<ResolvedField>> {
        let level = self.include.resolve_within(nodes, chain, path)?;
        self.place_level(level, path, scope, pass)
    }

    fn place_level(
        &self,
        level: Vec<LevelNode<'a>>,
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
    ) -> Result<Vec<ResolvedField>> {
        let mut out = Vec::with_capacity(level.len());
        self.place(level, path, scope, pass, &mut out)?;
        check_unique_keys(&out, path)?;
        Ok(out)
    }

    fn place(
        &self,
        level: Vec<LevelNode<'a>>,
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
        out: &mut Vec<ResolvedField>,
    ) -> Result<()> {
        for node in level {
            match node {
                LevelNode::Field(spec) => out.push(self.resolve_field(spec, path, scope, pass)?),
                LevelNode::Extend { spec, chain } => {
                    let resolution =
                        ExtendResolver::new(&self.include).resolve(spec, &chain, scope, path)?;
                    let clear_scope = match &resolution.placement {
                        Placement::Group {
                            key, scoped: true, ..
                        } => path.child(key.as_str()),
                        _ => path.clone(),
                    };
                    pass.bindings.push(ExtendBinding {
                        selector: path.child(spec.selector_key.as_str()),
                        clear_scope,
                        selected: resolution.selected,
                        policy: ClearPolicy::from_spec(spec),
                    });
                    match resolution.placement {
                        Placement::Splice(nodes) => self.place(nodes, path, scope, pass, out)?,
                        Placement::Group { key, scoped, nodes } => {
                            out.push(self.resolve_extend_group(key, scoped, nodes, path, scope, pass)?)
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_field(
        &self,
        spec: &'a FieldSpec,
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
    ) -> Result<ResolvedField> {
        let def = self.registry.resolve(&spec.type_);
        let field_path = path.child(spec.key.as_str());
        let value = scope.and_then(|scope| scope.get(spec.key.as_str()));

        if def.holds_data() && value.is_none() && !pass.skip_defaults {
            if let Some(default) = &spec.default {
                pass.defaults.record(field_path.clone(), default.clone());
            }
        }

        let children = match def.structure {
            Structure::Leaf | Structure::Pseudo | Structure::LeafArray => Children::None,
            Structure::Accordion => {
                let items = match value {
                    Some(Value::Array(items)) => items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| -> Result<ResolvedItem> {
                            let item_path = field_path.index(index);
                            let fields = pass.descend(|pass| {
                                self.resolve_list(spec.child_fields(), &[], &item_path, Some(item), pass)
                            })?;
                            Ok(ResolvedItem {
                                path: item_path,
                                fields,
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                    _ => Vec::new(),
                };
                Children::Items { items }
            }
            Structure::Nest if spec.attr_flag("groupdata") => match value {
                Some(object @ Value::Object(_)) => {
                    let fields = pass.descend(|pass| {
                        self.resolve_list(spec.child_fields(), &[], &field_path, Some(object), pass)
                    })?;
                    Children::Group {
                        scoped: true,
                        fields,
                    }
                }
                None | Some(Value::Null) => {
                    self.resolve_same_scope(spec, true, &field_path, None, pass)?
                }
                Some(other) => {
                    warn!(path = %field_path, found = %other, "grouped nest expects an object");
                    pass.without_defaults(|pass| {
                        self.resolve_same_scope(spec, true, &field_path, None, pass)
                    })?
                }
            },
            Structure::Nest => self.resolve_same_scope(spec, false, path, scope, pass)?,
        };

        Ok(ResolvedField::new(
            spec.without_children(),
            field_path,
            &def,
            children,
        ))
    }

    /// Resolve a nest's children without entering a new data level.
    fn resolve_same_scope(
        &self,
        spec: &'a FieldSpec,
        scoped: bool,
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
    ) -> Result<Children> {
        if pass.same_scope.iter().any(|seen| std::ptr::eq(*seen, spec)) {
            debug!(key = %spec.key, path = %path, "deferring recursive nest");
            return Ok(Children::Deferred);
        }
        pass.same_scope.push(spec);
        let fields = self.resolve_list(spec.child_fields(), &[], path, scope, pass);
        pass.same_scope.pop();
        Ok(Children::Group {
            scoped,
            fields: fields?,
        })
    }

    fn resolve_extend_group(
        &self,
        key: String,
        scoped: bool,
        nodes: Vec<LevelNode<'a>>,
        path: &DataPath,
        scope: Option<&Value>,
        pass: &mut Pass<'a>,
    ) -> Result<ResolvedField> {
        let def = self.registry.resolve("nest");
        let group_path = path.child(key.as_str());
        let fields = if scoped {
            match scope.and_then(|scope| scope.get(key.as_str())) {
                Some(object @ Value::Object(_)) => pass
                    .descend(|pass| self.place_level(nodes, &group_path, Some(object), pass))?,
                None | Some(Value::Null) => self.place_level(nodes, &group_path, None, pass)?,
                Some(other) => {
                    warn!(path = %group_path, found = %other, "grouped extend expects an object");
                    pass.without_defaults(|pass| self.place_level(nodes, &group_path, None, pass))?
                }
            }
        } else {
            self.place_level(nodes, path, scope, pass)?
        };
        let spec = FieldSpec::new(key, def.name.clone()).with_attr("groupdata", scoped);
        Ok(ResolvedField::new(
            spec,
            group_path,
            &def,
            Children::Group { scoped, fields },
        ))
    }
}

/// Keys must be unique per data object, so children of unscoped nests are
/// checked together with their parent list.
fn check_unique_keys(fields: &[ResolvedField], path: &DataPath) -> Result<()> {
    let mut keys = Vec::new();
    scope_keys(fields, &mut keys);
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(FormsError::DuplicateKey {
                key: key.to_string(),
                path: path.clone(),
            });
        }
    }
    Ok(())
}

/// Data keys written into one object. An unscoped nest's own key is only a
/// label; its children are counted instead.
fn scope_keys<'t>(fields: &'t [ResolvedField], out: &mut Vec<&'t str>) {
    for field in fields {
        if !field.shares_scope() {
            if field.holds_data() {
                out.push(field.key());
            }
            continue;
        }
        if let Children::Group { fields, .. } = &field.children {
            scope_keys(fields, out);
        }
    }
}

impl FormSchema {
    /// Resolve this schema against `data` with the built-in field types.
    pub fn resolve(&self, data: &Value) -> Result<ResolvedFieldTree> {
        TreeBuilder::new(self).build(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::FragmentTable;
    use crate::types::{ExtendSpec, ExtendVariant, IncludeSpec};
    use serde_json::json;

    fn schema(fields: Vec<SchemaNode>) -> FormSchema {
        FormSchema::new(fields, FragmentTable::new())
    }

    #[test]
    fn default_is_recorded_without_touching_data() {
        let schema = schema(vec![FieldSpec::new("enableRobotsTXT", "boolean")
            .with_title("Enable Robots")
            .with_default(true)
            .into()]);
        let data = json!({});
        let tree = schema.resolve(&data).unwrap();
        assert_eq!(
            tree.defaults.get(&DataPath::root().child("enableRobotsTXT")),
            Some(&json!(true))
        );
        assert_eq!(data, json!({}));
    }

    #[test]
    fn present_value_suppresses_default() {
        let schema = schema(vec![FieldSpec::new("draft", "boolean").with_default(false).into()]);
        let tree = schema.resolve(&json!({"draft": true})).unwrap();
        assert!(tree.defaults.is_empty());
    }

    #[test]
    fn pseudo_fields_get_no_default_and_no_key_check() {
        let schema = schema(vec![
            FieldSpec::new("info", "info").with_default("x").into(),
            FieldSpec::new("info", "info").into(),
        ]);
        let tree = schema.resolve(&json!({})).unwrap();
        assert!(tree.defaults.is_empty());
        assert_eq!(tree.keys(), vec!["info", "info"]);
    }

    #[test]
    fn duplicate_sibling_keys_fail() {
        let schema = schema(vec![
            FieldSpec::new("title", "string").into(),
            FieldSpec::new("title", "string").into(),
        ]);
        let err = schema.resolve(&json!({})).unwrap_err();
        match err {
            FormsError::DuplicateKey { key, path } => {
                assert_eq!(key, "title");
                assert!(path.is_root());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accordion_resolves_one_list_per_item() {
        let schema = schema(vec![FieldSpec::new("options", "accordion")
            .with_fields(vec![
                FieldSpec::new("value", "string").into(),
                FieldSpec::new("text", "string").with_default("").into(),
            ])
            .into()]);
        let tree = schema
            .resolve(&json!({"options": [{"value": "a"}, {"value": "b", "text": "B"}]}))
            .unwrap();
        let Children::Items { items } = &tree.fields[0].children else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].fields[0].path.to_string(), "options[1].value");
        assert_eq!(tree.defaults.len(), 1);
        assert!(tree
            .defaults
            .get(&"options[0].text".parse().unwrap())
            .is_some());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn missing_accordion_data_means_no_items() {
        let schema = schema(vec![FieldSpec::new("options", "accordion")
            .with_fields(vec![FieldSpec::new("value", "string").into()])
            .into()]);
        let tree = schema.resolve(&json!({})).unwrap();
        assert_eq!(tree.fields[0].children, Children::Items { items: vec![] });
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn grouped_nest_reads_from_its_object() {
        let schema = schema(vec![FieldSpec::new("seo", "nest")
            .with_attr("groupdata", true)
            .with_fields(vec![FieldSpec::new("description", "string").with_default("").into()])
            .into()]);
        let tree = schema.resolve(&json!({"seo": {"description": "hi"}})).unwrap();
        assert!(tree.defaults.is_empty());
        let field = tree.find(&"seo.description".parse().unwrap()).unwrap();
        assert_eq!(field.key(), "description");

        let tree = schema.resolve(&json!({})).unwrap();
        assert_eq!(
            tree.defaults.get(&"seo.description".parse().unwrap()),
            Some(&json!(""))
        );
    }

    #[test]
    fn ungrouped_nest_shares_the_parent_scope() {
        let schema = schema(vec![FieldSpec::new("layout", "nest")
            .with_fields(vec![FieldSpec::new("columns", "number").with_default(2).into()])
            .into()]);
        let tree = schema.resolve(&json!({})).unwrap();
        assert_eq!(
            tree.defaults.get(&DataPath::root().child("columns")),
            Some(&json!(2))
        );
    }

    #[test]
    fn self_including_nest_without_data_is_deferred() {
        let fragments = FragmentTable::new().with(
            "group",
            vec![FieldSpec::new("inner", "nest")
                .with_fields(vec![IncludeSpec::new("group").into()])
                .into()],
        );
        let schema = FormSchema::new(vec![IncludeSpec::new("group").into()], fragments);
        let tree = schema.resolve(&json!({})).unwrap();
        let Children::Group { fields, .. } = &tree.fields[0].children else {
            panic!("expected a group");
        };
        assert_eq!(fields[0].children, Children::Deferred);
    }

    #[test]
    fn extend_splices_selected_variant_and_records_binding() {
        let schema = schema(vec![
            FieldSpec::new("type", "select").with_default("string").into(),
            ExtendSpec::new(
                "type",
                vec![
                    ExtendVariant::new("string", vec![FieldSpec::new("multiline", "boolean").into()]),
                    ExtendVariant::new("boolean", vec![FieldSpec::new("default", "boolean").into()]),
                ],
            )
            .into(),
        ]);
        let tree = schema.resolve(&json!({"type": "boolean"})).unwrap();
        assert_eq!(tree.keys(), vec!["type", "default"]);
        assert_eq!(tree.bindings.len(), 1);
        assert_eq!(tree.bindings[0].selector.to_string(), "type");
        assert_eq!(tree.bindings[0].selected.as_deref(), Some("boolean"));

        let tree = schema.resolve(&json!({})).unwrap();
        assert_eq!(tree.keys(), vec!["type"]);
        assert_eq!(tree.bindings[0].selected, None);
    }

    #[test]
    fn spliced_variant_keys_are_checked_against_siblings() {
        let schema = schema(vec![
            FieldSpec::new("title", "string").into(),
            ExtendSpec::new(
                "kind",
                vec![ExtendVariant::new("a", vec![FieldSpec::new("title", "string").into()])],
            )
            .into(),
        ]);
        assert!(schema.resolve(&json!({"kind": "b"})).is_ok());
        assert!(matches!(
            schema.resolve(&json!({"kind": "a"})),
            Err(FormsError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn grouped_extend_builds_a_scoped_group() {
        let mut extend = ExtendSpec::new(
            "kind",
            vec![ExtendVariant::new("video", vec![FieldSpec::new("url", "string").into()])],
        )
        .with_key("media");
        extend.groupdata = Some(true);
        let schema = schema(vec![FieldSpec::new("kind", "select").into(), extend.into()]);
        let tree = schema
            .resolve(&json!({"kind": "video", "media": {"url": "x"}}))
            .unwrap();
        assert_eq!(tree.keys(), vec!["kind", "media"]);
        assert_eq!(tree.bindings[0].clear_scope.to_string(), "media");
        assert!(tree.find(&"media.url".parse().unwrap()).is_some());
    }

    #[test]
    fn grouped_extend_can_include_its_own_fragment_per_level() {
        let mut extend = ExtendSpec::new(
            "kind",
            vec![ExtendVariant::new("group", vec![IncludeSpec::new("node").into()])],
        )
        .with_key("child");
        extend.groupdata = Some(true);
        let fragments = FragmentTable::new().with(
            "node",
            vec![FieldSpec::new("kind", "select").into(), extend.into()],
        );
        let schema = FormSchema::new(vec![IncludeSpec::new("node").into()], fragments);
        let tree = schema
            .resolve(&json!({
                "kind": "group",
                "child": {"kind": "group", "child": {"kind": "leaf"}}
            }))
            .unwrap();
        assert!(tree.find(&"child.child.kind".parse().unwrap()).is_some());
        assert_eq!(tree.bindings.len(), 3);
    }

    #[test]
    fn ungrouped_nest_children_collide_with_siblings() {
        let schema = schema(vec![
            FieldSpec::new("title", "string").into(),
            FieldSpec::new("layout", "nest")
                .with_fields(vec![FieldSpec::new("title", "string").into()])
                .into(),
        ]);
        match schema.resolve(&json!({})).unwrap_err() {
            FormsError::DuplicateKey { key, path } => {
                assert_eq!(key, "title");
                assert!(path.is_root());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn grouped_nest_over_a_scalar_records_no_defaults() {
        let schema = schema(vec![FieldSpec::new("seo", "nest")
            .with_attr("groupdata", true)
            .with_fields(vec![FieldSpec::new("description", "string").with_default("").into()])
            .into()]);
        let tree = schema.resolve(&json!({"seo": "flat"})).unwrap();
        assert!(tree.defaults.is_empty());
        assert!(tree.find(&"seo.description".parse().unwrap()).is_some());

        let tree = schema.resolve(&json!({"seo": null})).unwrap();
        assert_eq!(tree.defaults.len(), 1);
    }

    #[test]
    fn resolution_is_idempotent() {
        let schema = schema(vec![FieldSpec::new("tags", "leaf-array").with_default(json!([])).into()]);
        let data = json!({});
        assert_eq!(schema.resolve(&data).unwrap(), schema.resolve(&data).unwrap());
    }
}
