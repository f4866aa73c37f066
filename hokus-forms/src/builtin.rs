//! Schemas shipped with the crate.

use crate::error::Result;
use crate::types::FormSchema;

const FORM_BUILDER_JSON: &str = include_str!("../builtin/form-builder.json");

/// The form that edits form definitions: an accordion of fields whose
/// `type` selects the attributes shown for each field, with `nest` fields
/// holding another accordion of the same shape.
pub fn form_builder_schema() -> Result<FormSchema> {
    FormSchema::from_json(FORM_BUILDER_JSON)
}
