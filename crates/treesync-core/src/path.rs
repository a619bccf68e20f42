//! Dotted key paths into a model tree.
//!
//! Used to build, read and update values at nested map positions, e.g.
//! to seed one sub-tree of a replica without touching its siblings.

use crate::map::MapModel;
use crate::model::Model;
use std::fmt;

/// A path of map keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create an empty (root) path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parse a path from dot notation (e.g., "user.name").
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Create a child path.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// Split into the first key and the remaining path.
    fn split_first(&self) -> Option<(&String, KeyPath)> {
        self.0
            .split_first()
            .map(|(head, rest)| (head, KeyPath(rest.to_vec())))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        KeyPath::parse(path)
    }
}

impl<T: Clone> Model<T> {
    /// Build the nested maps that hold `value` at `path`.
    ///
    /// `nested("a.b", v)` is `{a: {b: v}}`; the root path yields `v` itself.
    pub fn nested(path: &KeyPath, value: Model<T>) -> Self {
        path.segments().iter().rev().fold(value, |inner, key| {
            Model::Map(MapModel::new().assoc(key.clone(), inner))
        })
    }

    /// Follow `path` through nested maps.
    pub fn get_in(&self, path: &KeyPath) -> Option<&Model<T>> {
        path.segments()
            .iter()
            .try_fold(self, |node, key| node.as_map()?.find(key))
    }

    /// Return a copy with `value` placed at `path`.
    ///
    /// Missing or non-map intermediates become maps. Placing `Absent`
    /// removes the final key, and leaves the tree as it is when the path
    /// does not exist.
    pub fn assoc_in(&self, path: &KeyPath, value: Model<T>) -> Self {
        let Some((key, rest)) = path.split_first() else {
            return value;
        };
        let map = match self.as_map() {
            Some(map) => map.clone(),
            None if value.is_absent() => return self.clone(),
            None => MapModel::new(),
        };
        let child = match map.find(key) {
            Some(child) => child.assoc_in(&rest, value),
            None if value.is_absent() => return self.clone(),
            None if rest.is_root() => value,
            None => Model::nested(&rest, value),
        };
        Model::Map(map.assoc(key.clone(), child))
    }
}
