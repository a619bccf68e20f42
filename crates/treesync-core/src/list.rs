//! List model - a persistent ordered sequence of child models
//!
//! Lists only understand two kinds of change: appending to the end, and
//! rewriting the whole sequence. Anything else (truncation, insertion in
//! the middle, reordering) is shipped as a rewrite at index 0.
//!
//! A diff that neither rewrites nor appends at the receiver's current end
//! means the receiver diverged from the diff's origin. That case is
//! reported as [`PatchError::Diverged`] rather than merged.

use crate::diff::ListDiff;
use crate::diffable::Diffable;
use crate::error::{PatchError, Result};
use crate::model::Model;
use im::Vector;

/// Persistent ordered list of models.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListModel<T: Clone> {
    items: Vector<Model<T>>,
}

impl<T: Clone> ListModel<T> {
    pub fn new() -> Self {
        Self {
            items: Vector::new(),
        }
    }

    /// Return a copy with `item` appended.
    pub fn add(&self, item: Model<T>) -> Self {
        let mut items = self.items.clone();
        items.push_back(item);
        Self { items }
    }

    pub fn get(&self, index: usize) -> Option<&Model<T>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model<T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &Vector<Model<T>> {
        &self.items
    }

    /// True if both lists share the same underlying storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.items.ptr_eq(&other.items)
    }
}

impl<T: Clone + PartialEq> ListModel<T> {
    fn is_prefix_of(&self, other: &Self) -> bool {
        self.len() <= other.len()
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(ours, theirs)| ours == theirs)
    }
}

impl<T: Clone> Default for ListModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<Model<T>> for ListModel<T> {
    fn from_iter<I: IntoIterator<Item = Model<T>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Clone> From<Vector<Model<T>>> for ListModel<T> {
    fn from(items: Vector<Model<T>>) -> Self {
        Self { items }
    }
}

impl<T: Clone + PartialEq> Diffable for ListModel<T> {
    type Delta = ListDiff<T>;

    fn diff(&self, other: &Self) -> Option<ListDiff<T>> {
        if self.ptr_eq(other) {
            return None;
        }

        if self.is_prefix_of(other) {
            if self.len() == other.len() {
                None
            } else {
                Some(ListDiff::new(other.items.skip(self.len()), self.len()))
            }
        } else {
            Some(ListDiff::replace(other.items.clone()))
        }
    }

    fn patch(&self, delta: &ListDiff<T>) -> Result<Self> {
        let index = delta.index();
        if index == 0 {
            Ok(Self {
                items: delta.items().clone(),
            })
        } else if index == self.len() {
            let mut items = self.items.clone();
            items.append(delta.items().clone());
            Ok(Self { items })
        } else {
            // TODO: reconcile appends onto a diverged list instead of failing
            // once a merge policy for concurrent list edits is agreed on.
            Err(PatchError::Diverged {
                index,
                len: self.len(),
            })
        }
    }
}
