//! Save-time validation.
//!
//! A [`Validator`] looks at the tree resolved against the edited data and
//! returns a [`Verdict`]. The host commits the data only on `Accept`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::path::DataPath;
use crate::registry::Structure;
use crate::tree::{ResolvedField, ResolvedFieldTree};

/// Outcome of validating edited form data.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "verdict", content = "reason", rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject(String),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Decides whether edited data may be committed.
pub trait Validator {
    fn validate(&self, tree: &ResolvedFieldTree, data: &Value) -> Verdict;
}

impl<F> Validator for F
where
    F: Fn(&ResolvedFieldTree, &Value) -> Verdict,
{
    fn validate(&self, tree: &ResolvedFieldTree, data: &Value) -> Verdict {
        self(tree, data)
    }
}

/// One reason a value was refused.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Problem {
    pub path: DataPath,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Checks required fields and value shapes against the resolved tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Every problem found, in tree order.
    pub fn problems(&self, tree: &ResolvedFieldTree, data: &Value) -> Vec<Problem> {
        tree.walk()
            .into_iter()
            .filter(|field| field.holds_data())
            .filter_map(|field| check_field(field, data))
            .collect()
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, tree: &ResolvedFieldTree, data: &Value) -> Verdict {
        let problems = self.problems(tree, data);
        if problems.is_empty() {
            return Verdict::Accept;
        }
        let reason = problems
            .iter()
            .map(Problem::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Verdict::Reject(reason)
    }
}

fn check_field(field: &ResolvedField, data: &Value) -> Option<Problem> {
    let problem = |message: String| {
        Some(Problem {
            path: field.path.clone(),
            message,
        })
    };
    let value = field.path.lookup(data);

    if field.is_required() && value.is_none_or(is_blank) {
        return problem("is required".to_string());
    }

    // An ungrouped nest shares its parent's object and has no value of its own.
    let shares_scope = field.structure == Structure::Nest && !field.spec.attr_flag("groupdata");
    match value {
        Some(value) if !value.is_null() && !shares_scope && !field.value_shape.accepts(value) => {
            problem(format!("expected {}", field.value_shape))
        }
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::FragmentTable;
    use crate::types::{FieldSpec, FormSchema};
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::new(
            vec![
                FieldSpec::new("title", "string").with_required(true).into(),
                FieldSpec::new("weight", "number").into(),
                FieldSpec::new("draft", "boolean").into(),
            ],
            FragmentTable::new(),
        )
    }

    #[test]
    fn valid_data_is_accepted() {
        let data = json!({"title": "Hello", "weight": 3, "draft": false});
        let tree = schema().resolve(&data).unwrap();
        assert_eq!(SchemaValidator.validate(&tree, &data), Verdict::Accept);
    }

    #[test]
    fn missing_required_value_is_reported() {
        let data = json!({"title": "  "});
        let tree = schema().resolve(&data).unwrap();
        let problems = SchemaValidator.problems(&tree, &data);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].to_string(), "title: is required");
    }

    #[test]
    fn wrong_shape_is_rejected_with_path() {
        let data = json!({"title": "x", "weight": "heavy", "draft": "no"});
        let tree = schema().resolve(&data).unwrap();
        let Verdict::Reject(reason) = SchemaValidator.validate(&tree, &data) else {
            panic!("expected a rejection");
        };
        assert_eq!(reason, "weight: expected a number; draft: expected a boolean");
    }

    #[test]
    fn closures_are_validators() {
        let data = json!({});
        let tree = schema().resolve(&data).unwrap();
        let reject_all = |_: &ResolvedFieldTree, _: &Value| Verdict::Reject("read only".into());
        assert!(!reject_all.validate(&tree, &data).is_accept());
    }
}
