//! `resolve`, `defaults` and `validate`

use std::sync::Arc;

use anyhow::Context;
use hokus_common::{DataFormat, Pretty};
use hokus_forms::{form_builder_schema, FormHost, FormSchema, NoPlugins, SchemaValidator};
use serde_json::Value;
use tracing::debug;

use super::print_document;
use crate::cli::{FormArgs, OutputFormat};
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};

fn load_schema(args: &FormArgs) -> anyhow::Result<FormSchema> {
    match &args.schema {
        Some(path) => FormSchema::load(path)
            .with_context(|| format!("failed to load schema {}", path.display())),
        None => Ok(form_builder_schema()?),
    }
}

fn load_data(args: &FormArgs) -> anyhow::Result<Value> {
    match &args.data {
        Some(path) => {
            let (_, value) = DataFormat::read_file(path)
                .with_context(|| format!("failed to load data {}", path.display()))?;
            Ok(value)
        }
        None => Ok(Value::Object(Default::default())),
    }
}

fn load_host(args: &FormArgs) -> anyhow::Result<FormHost> {
    Ok(FormHost::new(load_schema(args)?, load_data(args)?, Arc::new(NoPlugins)))
}

pub fn resolve(args: &FormArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let tree = load_host(args)?.render()?;
    debug!(fields = tree.walk().len(), depth = tree.depth(), "resolved schema");
    print_document(&tree, format)?;
    Ok(EXIT_SUCCESS)
}

pub fn defaults(args: &FormArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let mut host = load_host(args)?;
    let applied = host.seed_defaults()?;
    debug!(applied, "seeded defaults");
    print_document(host.data(), format)?;
    Ok(EXIT_SUCCESS)
}

/// Prints one line per problem and exits with a warning code when there are any.
pub fn validate(args: &FormArgs, quiet: bool) -> anyhow::Result<i32> {
    let host = load_host(args)?;
    let tree = host.render()?;
    let problems = SchemaValidator.problems(&tree, host.data());
    if problems.is_empty() {
        if !quiet {
            println!("valid");
        }
        return Ok(EXIT_SUCCESS);
    }
    debug!("validation problems: {}", Pretty(&problems));
    for problem in &problems {
        println!("{problem}");
    }
    Ok(EXIT_WARNING)
}
