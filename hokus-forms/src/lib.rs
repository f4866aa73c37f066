//! Form schema resolution for Hokus
//!
//! Hokus forms are declared as lists of schema nodes. Besides concrete fields
//! a list can hold `include` nodes, which splice a named fragment in place,
//! and `extend` nodes, which pick one of several field lists by the current
//! value of a sibling field. This crate turns such a schema plus the form's
//! data into a concrete tree of fields a renderer can paint.
//!
//! # Architecture
//!
//! - **Pure resolution**: [`TreeBuilder`] never touches the caller's data; defaults are returned on the side
//! - **Data-bounded recursion**: fragments may include themselves; nested levels only expand as deep as the data goes
//! - **Host owns state**: [`FormHost`] holds the committed data, applies clear policies and runs save validation
//! - **Plugins are injected**: bundle dialogs and thumbnails go through the [`FormPlugins`] trait

pub mod builtin;
pub mod error;
pub mod extend;
pub mod fragments;
pub mod host;
pub mod include;
pub mod path;
pub mod plugins;
pub mod registry;
pub mod tree;
pub mod types;
pub mod validate;

pub use builtin::form_builder_schema;
pub use error::{FormsError, Result};
pub use extend::{selector_tag, ClearPolicy, ExtendResolution, ExtendResolver, Placement};
pub use fragments::{Fragment, FragmentId, FragmentTable};
pub use host::{ChangeEffect, FormHost, SubmitOutcome};
pub use include::{IncludeResolver, LevelNode};
pub use path::{DataPath, PathSegment};
pub use plugins::{BundleDialogParams, FormPlugins, MockPlugins, NoPlugins};
pub use registry::{Capability, FieldTypeDef, FieldTypeRegistry, Structure, ValueShape};
pub use tree::{
    Children, DefaultMap, ExtendBinding, ResolvedField, ResolvedFieldTree, ResolvedItem,
    TreeBuilder,
};
pub use types::{ExtendSpec, ExtendVariant, FieldSpec, FormSchema, IncludeSpec, SchemaNode};
pub use validate::{Problem, SchemaValidator, Validator, Verdict};
