//! Include expansion.
//!
//! Expansion is lazy and works one structural level at a time: includes that
//! sit directly in the list being resolved are spliced (following
//! include-of-include chains), but nested lists such as an accordion's
//! `fields` or an extend's variants are left untouched. The tree builder
//! resolves those when it visits them with concrete data, so a fragment that
//! includes itself through a nested level only expands as deep as the data
//! goes.
//!
//! An include chain that returns to a fragment already being expanded at the
//! same level would never terminate and is reported as an `IncludeCycle`.

use tracing::trace;

use crate::error::{FormsError, Result};
use crate::fragments::{FragmentId, FragmentTable};
use crate::path::DataPath;
use crate::types::{ExtendSpec, FieldSpec, SchemaNode};

/// A node left after include expansion at one level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelNode<'a> {
    Field(&'a FieldSpec),
    /// An extend together with the fragment chain it was found in, so its
    /// variants continue cycle detection from the same point.
    Extend {
        spec: &'a ExtendSpec,
        chain: Vec<FragmentId>,
    },
}

/// Splices include nodes using a fragment table.
#[derive(Debug, Clone, Copy)]
pub struct IncludeResolver<'a> {
    fragments: &'a FragmentTable,
}

impl<'a> IncludeResolver<'a> {
    pub fn new(fragments: &'a FragmentTable) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &'a FragmentTable {
        self.fragments
    }

    /// Expand the includes of one level. `at` is only used for error reports.
    pub fn resolve(&self, nodes: &'a [SchemaNode], at: &DataPath) -> Result<Vec<LevelNode<'a>>> {
        self.resolve_within(nodes, &[], at)
    }

    /// Expand the includes of one level, continuing an existing fragment chain.
    pub fn resolve_within(
        &self,
        nodes: &'a [SchemaNode],
        seen: &[FragmentId],
        at: &DataPath,
    ) -> Result<Vec<LevelNode<'a>>> {
        let mut stack = seen.to_vec();
        let mut out = Vec::with_capacity(nodes.len());
        self.expand(nodes, &mut stack, at, &mut out)?;
        Ok(out)
    }

    fn expand(
        &self,
        nodes: &'a [SchemaNode],
        stack: &mut Vec<FragmentId>,
        at: &DataPath,
        out: &mut Vec<LevelNode<'a>>,
    ) -> Result<()> {
        for node in nodes {
            match node {
                SchemaNode::Field(field) => out.push(LevelNode::Field(field)),
                SchemaNode::Extend(spec) => out.push(LevelNode::Extend {
                    spec,
                    chain: stack.clone(),
                }),
                SchemaNode::Include(include) => {
                    let (id, fragment) =
                        self.fragments.lookup(&include.include).ok_or_else(|| {
                            FormsError::UnknownFragment {
                                name: include.include.clone(),
                                origin: self.origin(stack),
                                path: at.clone(),
                            }
                        })?;
                    if stack.contains(&id) {
                        let mut chain = stack.clone();
                        chain.push(id);
                        return Err(FormsError::IncludeCycle {
                            chain: self.fragments.describe_chain(&chain),
                            path: at.clone(),
                        });
                    }
                    trace!(fragment = %fragment.name, path = %at, "expanding include");
                    stack.push(id);
                    self.expand(&fragment.nodes, stack, at, out)?;
                    stack.pop();
                }
            }
        }
        Ok(())
    }

    fn origin(&self, stack: &[FragmentId]) -> String {
        match stack.last() {
            Some(&id) => format!("fragment '{}'", self.fragments.get(id).name),
            None => "the field list".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtendVariant, IncludeSpec};

    fn keys(level: &[LevelNode<'_>]) -> Vec<String> {
        level
            .iter()
            .map(|node| match node {
                LevelNode::Field(field) => field.key.clone(),
                LevelNode::Extend { spec, .. } => format!("extend:{}", spec.selector_key),
            })
            .collect()
    }

    #[test]
    fn splices_fragments_in_order() {
        let fragments = FragmentTable::new()
            .with("base", vec![FieldSpec::new("key", "string").into()])
            .with(
                "any",
                vec![
                    IncludeSpec::new("base").into(),
                    FieldSpec::new("type", "select").into(),
                ],
            );
        let nodes = vec![
            FieldSpec::new("first", "string").into(),
            IncludeSpec::new("any").into(),
            FieldSpec::new("last", "string").into(),
        ];
        let level = IncludeResolver::new(&fragments)
            .resolve(&nodes, &DataPath::root())
            .unwrap();
        assert_eq!(keys(&level), vec!["first", "key", "type", "last"]);
    }

    #[test]
    fn unknown_fragment_is_reported_with_origin() {
        let fragments = FragmentTable::new().with("any", vec![IncludeSpec::new("missing").into()]);
        let nodes = vec![IncludeSpec::new("any").into()];
        let err = IncludeResolver::new(&fragments)
            .resolve(&nodes, &"fields[2]".parse().unwrap())
            .unwrap_err();
        match err {
            FormsError::UnknownFragment { name, origin, path } => {
                assert_eq!(name, "missing");
                assert_eq!(origin, "fragment 'any'");
                assert_eq!(path.to_string(), "fields[2]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nested_lists_are_not_expanded() {
        let fragments = FragmentTable::new().with(
            "recursive",
            vec![FieldSpec::new("children", "accordion")
                .with_fields(vec![IncludeSpec::new("recursive").into()])
                .into()],
        );
        let nodes = vec![IncludeSpec::new("recursive").into()];
        let level = IncludeResolver::new(&fragments)
            .resolve(&nodes, &DataPath::root())
            .unwrap();
        assert_eq!(keys(&level), vec!["children"]);
    }

    #[test]
    fn same_level_cycle_is_detected() {
        let fragments = FragmentTable::new()
            .with("a", vec![IncludeSpec::new("b").into()])
            .with("b", vec![IncludeSpec::new("a").into()]);
        let nodes = vec![IncludeSpec::new("a").into()];
        let err = IncludeResolver::new(&fragments)
            .resolve(&nodes, &DataPath::root())
            .unwrap_err();
        match err {
            FormsError::IncludeCycle { chain, .. } => assert_eq!(chain, "a -> b -> a"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_fragment_twice_side_by_side_is_not_a_cycle() {
        let fragments =
            FragmentTable::new().with("tip", vec![FieldSpec::new("tip", "string").into()]);
        let nodes = vec![
            IncludeSpec::new("tip").into(),
            IncludeSpec::new("tip").into(),
        ];
        let level = IncludeResolver::new(&fragments)
            .resolve(&nodes, &DataPath::root())
            .unwrap();
        assert_eq!(level.len(), 2);
    }

    #[test]
    fn extends_remember_their_chain() {
        let fragments = FragmentTable::new().with(
            "any",
            vec![ExtendSpec::new("type", vec![ExtendVariant::new("string", vec![])]).into()],
        );
        let nodes = vec![IncludeSpec::new("any").into()];
        let level = IncludeResolver::new(&fragments)
            .resolve(&nodes, &DataPath::root())
            .unwrap();
        let LevelNode::Extend { chain, .. } = &level[0] else {
            panic!("expected an extend");
        };
        assert_eq!(chain, &vec![fragments.id("any").unwrap()]);
    }
}
