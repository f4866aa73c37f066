//! Form host: owns the committed data of one form and drives edits, saves
//! and plugin calls against freshly resolved trees.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{FormsError, Result};
use crate::path::DataPath;
use crate::plugins::{BundleDialogParams, FormPlugins};
use crate::registry::{Capability, FieldTypeRegistry};
use crate::tree::{ExtendBinding, ResolvedField, ResolvedFieldTree, TreeBuilder};
use crate::types::FormSchema;
use crate::validate::{Validator, Verdict};

/// Upper bound on resolve/apply rounds in [`FormHost::seed_defaults`].
pub const MAX_SEED_PASSES: usize = 16;

/// Result of [`FormHost::submit`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SubmitOutcome {
    Accepted { epoch: u64 },
    Rejected { reason: String },
}

/// What a single [`FormHost::set_value`] call did besides writing the value.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChangeEffect {
    /// An extend selector changed and the variant was swapped.
    pub remounted: bool,
    /// Values removed by the extend's clear policy.
    pub cleared: Vec<DataPath>,
    /// Defaults written for the newly selected variant.
    pub defaults_applied: usize,
}

pub struct FormHost {
    schema: FormSchema,
    registry: FieldTypeRegistry,
    data: Value,
    epoch: u64,
    plugins: Arc<dyn FormPlugins>,
}

impl FormHost {
    pub fn new(schema: FormSchema, data: Value, plugins: Arc<dyn FormPlugins>) -> Self {
        Self {
            schema,
            registry: FieldTypeRegistry::with_builtins(),
            data,
            epoch: 0,
            plugins,
        }
    }

    pub fn with_registry(mut self, registry: FieldTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// The committed data.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Bumped on every structural change (selector swap or accepted save).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Resolve the schema against the committed data.
    pub fn render(&self) -> Result<ResolvedFieldTree> {
        self.resolve(&self.data)
    }

    fn resolve(&self, data: &Value) -> Result<ResolvedFieldTree> {
        TreeBuilder::with_registry(&self.schema, &self.registry).build(data)
    }

    /// Write pending defaults into the data until none are left.
    ///
    /// Applying a default can select a new extend variant whose own defaults
    /// only show up on the next pass, so this resolves again after each round.
    /// Returns the number of values written.
    pub fn seed_defaults(&mut self) -> Result<usize> {
        let mut total = 0;
        for pass in 0..MAX_SEED_PASSES {
            let tree = self.render()?;
            let applied = tree.defaults.apply_to(&mut self.data)?;
            total += applied;
            if applied == 0 {
                debug!(passes = pass + 1, applied = total, "defaults seeded");
                return Ok(total);
            }
        }
        warn!(
            passes = MAX_SEED_PASSES,
            applied = total,
            "defaults still pending after the last seeding pass"
        );
        Ok(total)
    }

    /// Set the value of a resolved field.
    ///
    /// When the field is an extend selector and its value changes, the
    /// extend's clear policy runs on its scope, the epoch is bumped and
    /// defaults are seeded for the new variant.
    pub fn set_value(&mut self, path: &DataPath, value: Value) -> Result<ChangeEffect> {
        let tree = self.render()?;
        if tree.find(path).is_none() {
            return Err(FormsError::FieldNotFound { path: path.clone() });
        }
        let bindings: Vec<ExtendBinding> = tree.bindings_for(path).into_iter().cloned().collect();
        let previous = path.lookup(&self.data).cloned();
        let changed = previous.as_ref() != Some(&value);
        path.set(&mut self.data, value)?;

        if !changed || bindings.is_empty() {
            return Ok(ChangeEffect::default());
        }

        let mut cleared = Vec::new();
        for binding in &bindings {
            let protect = match path.parent() {
                Some(parent) if parent == binding.clear_scope => path.last_key(),
                _ => None,
            };
            let Some(scope) = binding
                .clear_scope
                .lookup_mut(&mut self.data)
                .and_then(Value::as_object_mut)
            else {
                continue;
            };
            for key in binding.policy.keys_to_clear(scope, protect) {
                scope.shift_remove(key.as_str());
                let cleared_path = binding.clear_scope.child(key);
                if !cleared.contains(&cleared_path) {
                    cleared.push(cleared_path);
                }
            }
        }

        self.epoch += 1;
        debug!(
            selector = %path,
            cleared = cleared.len(),
            epoch = self.epoch,
            "extend selector changed"
        );
        let defaults_applied = self.seed_defaults()?;
        Ok(ChangeEffect {
            remounted: true,
            cleared,
            defaults_applied,
        })
    }

    /// Validate `edited` and commit it when the validator accepts.
    pub fn submit(&mut self, edited: Value, validator: &dyn Validator) -> Result<SubmitOutcome> {
        let tree = self.resolve(&edited)?;
        match validator.validate(&tree, &edited) {
            Verdict::Accept => {
                self.data = edited;
                self.epoch += 1;
                info!(epoch = self.epoch, "form data accepted");
                Ok(SubmitOutcome::Accepted { epoch: self.epoch })
            }
            Verdict::Reject(reason) => {
                debug!(%reason, "form data rejected");
                Ok(SubmitOutcome::Rejected { reason })
            }
        }
    }

    /// Ask the plugin host for bundle files and append them to the bundle list at `path`.
    ///
    /// Files already listed are not added twice. Returns the picked files.
    pub async fn open_bundle_files(&mut self, path: &DataPath) -> Result<Vec<PathBuf>> {
        let field = self.capable_field(path, Capability::OpenBundleFileDialog)?;
        let params = BundleDialogParams {
            title: field.title().unwrap_or(field.key()).to_string(),
            extensions: string_list(field.spec.attr("extensions")),
            target_path: field
                .spec
                .attr("path")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        };
        let plugins = Arc::clone(&self.plugins);
        let files = plugins.open_bundle_file_dialog(params).await?;

        if path.lookup(&self.data).is_none_or(Value::is_null) {
            path.set(&mut self.data, Value::Array(Vec::new()))?;
        }
        let Some(items) = path.lookup_mut(&mut self.data).and_then(Value::as_array_mut) else {
            return Err(FormsError::PathConflict {
                path: path.clone(),
                reason: "bundle list is not an array".to_string(),
            });
        };
        for file in &files {
            let src = file.to_string_lossy();
            if !items.iter().any(|item| item.get("src").and_then(Value::as_str) == Some(&*src)) {
                items.push(json!({ "src": src }));
            }
        }
        debug!(path = %path, files = files.len(), "bundle files added");
        Ok(files)
    }

    /// Thumbnail source for the bundle item holding the thumbnail field at `path`.
    ///
    /// The file is read from the sibling named by the field's `srcKey`
    /// attribute, `src` by default.
    pub async fn bundle_thumbnail(&self, path: &DataPath) -> Result<String> {
        let field = self.capable_field(path, Capability::BundleThumbnail)?;
        let src_key = field
            .spec
            .attr("srcKey")
            .and_then(Value::as_str)
            .unwrap_or("src");
        let src_path = path.parent().unwrap_or_default().child(src_key);
        let src = src_path
            .lookup(&self.data)
            .and_then(Value::as_str)
            .ok_or_else(|| FormsError::FieldNotFound {
                path: src_path.clone(),
            })?;
        self.plugins.get_bundle_thumbnail_src(src).await
    }

    fn capable_field(&self, path: &DataPath, capability: Capability) -> Result<ResolvedField> {
        let tree = self.render()?;
        let field = tree
            .find(path)
            .ok_or_else(|| FormsError::FieldNotFound { path: path.clone() })?;
        if field.capability != Some(capability) {
            return Err(FormsError::MissingCapability {
                path: path.clone(),
                capability,
            });
        }
        Ok(field.clone())
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
