//! Model - the immutable, heterogeneous state tree
//!
//! A model is one of four kinds: an absent tombstone, a primitive leaf,
//! a keyed map or an ordered list. Every operation returns a fresh model;
//! maps and lists share structure with the value they were derived from,
//! so snapshotting after each change stays cheap.
//!
//! Diffing two models of different kinds always yields a full replacement.
//! Diffing two models of the same kind delegates to that kind's algorithm.

use crate::diff::Diff;
use crate::diffable::Diffable;
use crate::error::{PatchError, Result};
use crate::list::ListModel;
use crate::map::MapModel;
use crate::primitive;
use std::fmt;

/// A node in the synchronized state tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Model<T: Clone> {
    /// Tombstone. Only meaningful as a removal marker inside a map diff.
    Absent,
    /// Opaque application value, always replaced atomically.
    Primitive(T),
    /// String-keyed children.
    Map(MapModel<T>),
    /// Ordered children.
    List(ListModel<T>),
}

/// The kind of a model, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Absent,
    Primitive,
    Map,
    List,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Absent => write!(f, "absent"),
            ModelKind::Primitive => write!(f, "primitive"),
            ModelKind::Map => write!(f, "map"),
            ModelKind::List => write!(f, "list"),
        }
    }
}

impl<T: Clone> Model<T> {
    pub fn primitive(value: T) -> Self {
        Model::Primitive(value)
    }

    pub fn empty_map() -> Self {
        Model::Map(MapModel::new())
    }

    pub fn empty_list() -> Self {
        Model::List(ListModel::new())
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Absent => ModelKind::Absent,
            Model::Primitive(_) => ModelKind::Primitive,
            Model::Map(_) => ModelKind::Map,
            Model::List(_) => ModelKind::List,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Model::Absent)
    }

    pub fn as_primitive(&self) -> Option<&T> {
        match self {
            Model::Primitive(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapModel<T>> {
        match self {
            Model::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListModel<T>> {
        match self {
            Model::List(list) => Some(list),
            _ => None,
        }
    }
}

impl<T: Clone + PartialEq> Diffable for Model<T> {
    type Delta = Diff<T>;

    fn diff(&self, other: &Self) -> Option<Diff<T>> {
        let replace = || Some(Diff::Value(other.clone()));
        match self {
            Model::Absent => match other {
                Model::Absent => None,
                _ => replace(),
            },
            Model::Primitive(a) => match other {
                Model::Primitive(b) => primitive::diff(a, b),
                _ => replace(),
            },
            Model::Map(a) => match other {
                Model::Map(b) => a.diff(b).map(Diff::Map),
                _ => replace(),
            },
            Model::List(a) => match other {
                Model::List(b) => a.diff(b).map(Diff::List),
                _ => replace(),
            },
        }
    }

    fn patch(&self, delta: &Diff<T>) -> Result<Self> {
        if let Diff::Value(value) = delta {
            return Ok(value.clone());
        }
        let mismatch = || PatchError::KindMismatch {
            model: self.kind(),
            diff: delta.kind(),
        };
        match self {
            // Insertion and removal are decided by the containing map.
            Model::Absent => Ok(Model::Absent),
            Model::Primitive(_) => match delta {
                Diff::Primitive(value) => Ok(primitive::patch(value)),
                _ => Err(mismatch()),
            },
            Model::Map(map) => match delta {
                Diff::Map(map_diff) => map.patch(map_diff).map(Model::Map),
                _ => Err(mismatch()),
            },
            Model::List(list) => match delta {
                Diff::List(list_diff) => list.patch(list_diff).map(Model::List),
                _ => Err(mismatch()),
            },
        }
    }
}

impl<T: Clone> From<MapModel<T>> for Model<T> {
    fn from(map: MapModel<T>) -> Self {
        Model::Map(map)
    }
}

impl<T: Clone> From<ListModel<T>> for Model<T> {
    fn from(list: ListModel<T>) -> Self {
        Model::List(list)
    }
}
