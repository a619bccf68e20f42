//! Diff - the delta format mirroring [`Model`]
//!
//! Each model kind has exactly one delta shape, plus the universal
//! `Value` replacement used whenever the two sides disagree on kind.

use crate::model::Model;
use crate::path::KeyPath;
use im::Vector;
use std::collections::BTreeMap;
use std::fmt;

/// Description of how to transform one model into another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diff<T: Clone> {
    /// Replace whatever is there with this model. `Value(Model::Absent)`
    /// inside a map diff removes the key.
    Value(Model<T>),
    /// Replace a primitive's value.
    Primitive(T),
    /// Per-key changes to a map.
    Map(MapDiff<T>),
    /// Append to, or rewrite, a list.
    List(ListDiff<T>),
}

/// The kind of a diff, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Value,
    Primitive,
    Map,
    List,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Value => write!(f, "value"),
            DiffKind::Primitive => write!(f, "primitive"),
            DiffKind::Map => write!(f, "map"),
            DiffKind::List => write!(f, "list"),
        }
    }
}

impl<T: Clone> Diff<T> {
    pub fn kind(&self) -> DiffKind {
        match self {
            Diff::Value(_) => DiffKind::Value,
            Diff::Primitive(_) => DiffKind::Primitive,
            Diff::Map(_) => DiffKind::Map,
            Diff::List(_) => DiffKind::List,
        }
    }

    /// The removal marker used inside map diffs.
    pub fn remove() -> Self {
        Diff::Value(Model::Absent)
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Diff::Value(Model::Absent))
    }

    /// Wrap `diff` in single-entry map diffs so it only touches `path`.
    ///
    /// Every map along the path must already exist on the receiving side,
    /// except when `diff` is itself a `Value` at the final key.
    pub fn nested(path: &KeyPath, diff: Diff<T>) -> Self {
        path.segments().iter().rev().fold(diff, |inner, key| {
            Diff::Map(MapDiff::single(key.clone(), inner))
        })
    }
}

/// Changed, added and removed keys of a map.
///
/// Never holds an entry for an unchanged key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapDiff<T: Clone> {
    entries: BTreeMap<String, Diff<T>>,
}

impl<T: Clone> MapDiff<T> {
    pub(crate) fn from_entries(entries: BTreeMap<String, Diff<T>>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn single(key: impl Into<String>, diff: Diff<T>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), diff);
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Diff<T>> {
        self.entries.get(key)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Diff<T>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, T: Clone> FromIterator<(K, Diff<T>)> for MapDiff<T> {
    fn from_iter<I: IntoIterator<Item = (K, Diff<T>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, d)| (k.into(), d)).collect(),
        }
    }
}

/// Items to splice into a list at `index`.
///
/// `index == 0` discards the receiver's contents; any other index must
/// equal the receiver's length, making the diff a pure append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListDiff<T: Clone> {
    items: Vector<Model<T>>,
    index: usize,
}

impl<T: Clone> ListDiff<T> {
    pub fn new(items: Vector<Model<T>>, index: usize) -> Self {
        Self { items, index }
    }

    /// A diff replacing the whole list with `items`.
    pub fn replace(items: Vector<Model<T>>) -> Self {
        Self::new(items, 0)
    }

    pub fn items(&self) -> &Vector<Model<T>> {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_replace(&self) -> bool {
        self.index == 0
    }
}
