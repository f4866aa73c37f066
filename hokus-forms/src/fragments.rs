//! Named, reusable field lists.
//!
//! Fragments are stored in an arena and addressed by [`FragmentId`]. Include
//! nodes only hold a fragment *name*, so a fragment that includes itself is
//! just an index pointing back into the arena, never a cyclic object graph.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::SchemaNode;

/// Index of a fragment inside a [`FragmentTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(usize);

impl FragmentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named field list.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: String,
    pub nodes: Vec<SchemaNode>,
}

/// Fragment arena with a name index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentTable {
    fragments: Vec<Fragment>,
    index: HashMap<String, FragmentId>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment. Re-inserting a name replaces its field list and keeps its id.
    pub fn insert(&mut self, name: impl Into<String>, nodes: Vec<SchemaNode>) -> FragmentId {
        let name = name.into();
        if let Some(&id) = self.index.get(&name) {
            self.fragments[id.0].nodes = nodes;
            return id;
        }
        let id = FragmentId(self.fragments.len());
        self.index.insert(name.clone(), id);
        self.fragments.push(Fragment { name, nodes });
        id
    }

    /// Builder-style [`FragmentTable::insert`].
    pub fn with(mut self, name: impl Into<String>, nodes: Vec<SchemaNode>) -> Self {
        self.insert(name, nodes);
        self
    }

    pub fn id(&self, name: &str) -> Option<FragmentId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: FragmentId) -> &Fragment {
        &self.fragments[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<(FragmentId, &Fragment)> {
        self.id(name).map(|id| (id, self.get(id)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Render an id chain as `a -> b -> c`.
    pub fn describe_chain(&self, chain: &[FragmentId]) -> String {
        chain
            .iter()
            .map(|&id| self.get(id).name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Serialize for FragmentTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fragments.len()))?;
        for fragment in &self.fragments {
            map.serialize_entry(&fragment.name, &fragment.nodes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FragmentTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, Vec<SchemaNode>>::deserialize(deserializer)?;
        let mut table = FragmentTable::new();
        for (name, nodes) in entries {
            table.insert(name, nodes);
        }
        Ok(table)
    }
}
