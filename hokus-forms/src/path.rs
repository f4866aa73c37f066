//! Addresses of values inside form data.
//!
//! A [`DataPath`] is a list of object keys and array indexes, rendered as
//! `fields[0].type`. The empty path is the data root and renders as `$`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{FormsError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataPath(Vec<PathSegment>);

impl DataPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// The final key, if the path ends in one.
    pub fn last_key(&self) -> Option<&str> {
        match self.0.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    pub fn lookup<'v>(&self, data: &'v Value) -> Option<&'v Value> {
        self.0.iter().try_fold(data, |value, segment| match segment {
            PathSegment::Key(key) => value.get(key.as_str()),
            PathSegment::Index(index) => value.get(*index),
        })
    }

    pub fn lookup_mut<'v>(&self, data: &'v mut Value) -> Option<&'v mut Value> {
        self.0.iter().try_fold(data, |value, segment| match segment {
            PathSegment::Key(key) => value.get_mut(key.as_str()),
            PathSegment::Index(index) => value.get_mut(*index),
        })
    }

    /// Write `value` at this path, creating missing objects along the way.
    ///
    /// Arrays are never grown: an index past the end is a `PathConflict`, as is
    /// walking through a scalar.
    pub fn set(&self, data: &mut Value, value: Value) -> Result<()> {
        let Some((last, parents)) = self.0.split_last() else {
            *data = value;
            return Ok(());
        };

        let mut current = data;
        for (depth, segment) in parents.iter().enumerate() {
            current = self.step(current, segment, depth)?;
        }

        match last {
            PathSegment::Key(key) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let Value::Object(object) = current else {
                    return Err(self.conflict("parent is not an object"));
                };
                object.insert(key.clone(), value);
            }
            PathSegment::Index(index) => {
                let slot = current
                    .as_array_mut()
                    .and_then(|items| items.get_mut(*index))
                    .ok_or_else(|| self.conflict("array index out of range"))?;
                *slot = value;
            }
        }
        Ok(())
    }

    fn step<'v>(
        &self,
        current: &'v mut Value,
        segment: &PathSegment,
        depth: usize,
    ) -> Result<&'v mut Value> {
        match segment {
            PathSegment::Key(key) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let Value::Object(object) = current else {
                    return Err(self.conflict_at(depth, "not an object"));
                };
                Ok(object.entry(key.clone()).or_insert(Value::Null))
            }
            PathSegment::Index(index) => current
                .as_array_mut()
                .and_then(|items| items.get_mut(*index))
                .ok_or_else(|| self.conflict_at(depth, "array index out of range")),
        }
    }

    /// Remove the value at this path, returning it.
    pub fn remove(&self, data: &mut Value) -> Option<Value> {
        let (last, parents) = self.0.split_last()?;
        let parent = DataPath(parents.to_vec()).lookup_mut(data)?;
        match last {
            PathSegment::Key(key) => parent.as_object_mut()?.shift_remove(key.as_str()),
            PathSegment::Index(_) => None,
        }
    }

    fn conflict(&self, reason: &str) -> FormsError {
        FormsError::PathConflict {
            path: self.clone(),
            reason: reason.to_string(),
        }
    }

    fn conflict_at(&self, depth: usize, reason: &str) -> FormsError {
        FormsError::PathConflict {
            path: DataPath(self.0[..=depth].to_vec()),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for DataPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for DataPath {
    type Err = FormsError;

    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input == "$" {
            return Ok(Self::root());
        }
        let invalid = || FormsError::InvalidPath {
            input: input.to_string(),
        };

        let mut segments = Vec::new();
        for part in input.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(at) => (&part[..at], &part[at..]),
                None => (part, ""),
            };
            if key.is_empty() && segments.is_empty() {
                return Err(invalid());
            }
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }
            while let Some(stripped) = rest.strip_prefix('[') {
                let close = stripped.find(']').ok_or_else(invalid)?;
                let index = stripped[..close].parse().map_err(|_| invalid())?;
                segments.push(PathSegment::Index(index));
                rest = &stripped[close + 1..];
            }
            if !rest.is_empty() {
                return Err(invalid());
            }
        }
        Ok(Self(segments))
    }
}
