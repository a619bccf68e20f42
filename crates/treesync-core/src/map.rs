//! Map model - a persistent container of named child models
//!
//! Keys are unique strings; order is irrelevant. Every update returns a
//! new map that shares all untouched children with the original.
//!
//! Key design: a stored child is never `Absent`. Associating `Absent`
//! removes the key, and a missing key is reported as "no entry".

use crate::diff::{Diff, MapDiff};
use crate::diffable::Diffable;
use crate::error::{PatchError, Result};
use crate::model::Model;
use im::HashMap;
use std::collections::BTreeMap;

/// Persistent string-keyed map of models.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapModel<T: Clone> {
    entries: HashMap<String, Model<T>>,
}

impl<T: Clone> MapModel<T> {
    /// Create a new empty map
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return a copy with `key` bound to `value`.
    /// Binding `Absent` removes the key instead.
    pub fn assoc(&self, key: impl Into<String>, value: Model<T>) -> Self {
        let key = key.into();
        let entries = match value {
            Model::Absent => self.entries.without(&key),
            value => self.entries.update(key, value),
        };
        Self { entries }
    }

    /// Return a copy without `key`.
    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self.entries.without(key),
        }
    }

    /// Get the child at `key`, if any
    pub fn find(&self, key: &str) -> Option<&Model<T>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Model<T>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if both maps share the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.entries.ptr_eq(&other.entries)
    }
}

impl<T: Clone> Default for MapModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T: Clone> FromIterator<(K, Model<T>)> for MapModel<T> {
    fn from_iter<I: IntoIterator<Item = (K, Model<T>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.assoc(key, value))
    }
}

impl<T: Clone + PartialEq> Diffable for MapModel<T> {
    type Delta = MapDiff<T>;

    /// Walk the union of both key sets, recording additions, removals
    /// and non-empty child diffs.
    fn diff(&self, other: &Self) -> Option<MapDiff<T>> {
        if self.ptr_eq(other) {
            return None;
        }

        let mut entries = BTreeMap::new();

        for (key, theirs) in other.entries.iter() {
            match self.entries.get(key) {
                None => {
                    entries.insert(key.clone(), Diff::Value(theirs.clone()));
                }
                Some(ours) => {
                    if let Some(child) = ours.diff(theirs) {
                        entries.insert(key.clone(), child);
                    }
                }
            }
        }

        for key in self.entries.keys() {
            if !other.entries.contains_key(key) {
                entries.insert(key.clone(), Diff::remove());
            }
        }

        MapDiff::from_entries(entries)
    }

    fn patch(&self, delta: &MapDiff<T>) -> Result<Self> {
        let mut result = self.clone();

        for (key, change) in delta.iter() {
            let value = match (self.entries.get(key), change) {
                (None, Diff::Value(value)) => value.clone(),
                (None, _) => return Err(PatchError::MissingEntry { key: key.clone() }),
                (Some(_), Diff::Value(Model::Absent)) => Model::Absent,
                (Some(child), change) => child
                    .patch(change)
                    .map_err(|err| err.at_key(key.as_str()))?,
            };
            result = result.assoc(key.clone(), value);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, i32)]) -> MapModel<i32> {
        entries
            .iter()
            .map(|(k, v)| (*k, Model::Primitive(*v)))
            .collect()
    }

    #[test]
    fn test_map_assoc_and_find() {
        let empty: MapModel<i32> = MapModel::new();
        let one = empty.assoc("a", Model::Primitive(1));

        assert_eq!(one.find("a"), Some(&Model::Primitive(1)));
        assert_eq!(empty.find("a"), None);
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_map_assoc_absent_removes_key() {
        let m = map(&[("a", 1), ("b", 2)]);
        let removed = m.assoc("b", Model::Absent);

        assert_eq!(removed.find("b"), None);
        assert!(!removed.contains_key("b"));
        assert_eq!(removed.len(), 1);
        // original untouched
        assert_eq!(m.find("b"), Some(&Model::Primitive(2)));
    }

    #[test]
    fn test_map_from_iter_skips_absent() {
        let m: MapModel<i32> = vec![("a", Model::Primitive(1)), ("b", Model::Absent)]
            .into_iter()
            .collect();
        assert_eq!(m.len(), 1);
        assert!(!m.contains_key("b"));
    }

    #[test]
    fn test_map_diff_update_and_add() {
        let a = map(&[("a", 1), ("b", 2)]);
        let b = map(&[("a", 1), ("b", 3), ("c", 4)]);

        let delta = a.diff(&b).unwrap();
        assert_eq!(delta.len(), 2);
        assert_eq!(delta.get("a"), None);
        assert_eq!(delta.get("b"), Some(&Diff::Primitive(3)));
        assert_eq!(delta.get("c"), Some(&Diff::Value(Model::Primitive(4))));

        assert_eq!(a.patch(&delta).unwrap(), b);
    }

    #[test]
    fn test_map_diff_removal() {
        let a = map(&[("a", 1), ("b", 2)]);
        let b = map(&[("a", 1)]);

        let delta = a.diff(&b).unwrap();
        assert_eq!(delta.len(), 1);
        assert!(delta.get("b").unwrap().is_removal());

        let patched = a.patch(&delta).unwrap();
        assert_eq!(patched, b);
        assert_eq!(patched.find("b"), None);
    }

    #[test]
    fn test_map_diff_identical_content_is_none() {
        let a = map(&[("a", 1), ("b", 2)]);
        let b = map(&[("b", 2), ("a", 1)]);
        assert!(a.diff(&b).is_none());
        assert!(a.diff(&a.clone()).is_none());
    }

    #[test]
    fn test_map_nested_diff_recurses() {
        let inner_a = map(&[("x", 1), ("y", 2)]);
        let inner_b = inner_a.assoc("y", Model::Primitive(5));
        let a: MapModel<i32> = MapModel::new().assoc("inner", inner_a.into());
        let b: MapModel<i32> = MapModel::new().assoc("inner", inner_b.into());

        let delta = a.diff(&b).unwrap();
        let expected = Diff::Map(MapDiff::single("y", Diff::Primitive(5)));
        assert_eq!(delta.get("inner"), Some(&expected));
        assert_eq!(a.patch(&delta).unwrap(), b);
    }

    #[test]
    fn test_map_patch_compound_diff_on_missing_key_fails() {
        let a = map(&[("a", 1)]);
        let delta = MapDiff::single("missing", Diff::Primitive(2));

        let err = a.patch(&delta).unwrap_err();
        assert_eq!(
            err,
            PatchError::MissingEntry {
                key: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_map_patch_removal_of_missing_key_is_noop() {
        let a = map(&[("a", 1)]);
        let delta: MapDiff<i32> = MapDiff::single("gone", Diff::remove());
        assert_eq!(a.patch(&delta).unwrap(), a);
    }

    #[test]
    fn test_map_patch_reports_key_of_nested_failure() {
        let a: MapModel<i32> = MapModel::new().assoc("list", Model::empty_list());
        let delta = MapDiff::single("list", Diff::Primitive(1));

        let err = a.patch(&delta).unwrap_err();
        assert_eq!(err.path(), "list");
        assert!(err.is_inconsistency());
    }

    #[test]
    fn test_map_patch_is_all_or_nothing() {
        let a = map(&[("a", 1), ("b", 2)]);
        let delta: MapDiff<i32> = vec![
            ("a", Diff::Primitive(10)),
            ("z", Diff::Primitive(3)),
        ]
        .into_iter()
        .collect();

        assert!(a.patch(&delta).is_err());
        assert_eq!(a, map(&[("a", 1), ("b", 2)]));
    }
}
