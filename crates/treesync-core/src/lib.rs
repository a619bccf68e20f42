//! treesync core - structural diff and patch over a persistent state tree
//!
//! A [`Model`] is an immutable tree of maps, lists and primitive leaves.
//! Two holders of the same state keep in sync by shipping only the
//! [`Diff`] between consecutive snapshots:
//!
//! ```text
//! producer:  d = diff(old, new)      // None => nothing to send
//! consumer:  new = patch(old, d)
//! ```
//!
//! # Delta shapes
//!
//! - Primitives are replaced atomically.
//! - Maps carry only added, changed and removed keys.
//! - Lists carry either an append (index = old length) or a full rewrite
//!   (index 0). A list that no longer matches the diff's origin fails with
//!   [`PatchError::Diverged`] so the caller can resync.
//! - Models of different kinds are replaced wholesale.
//!
//! # Example
//!
//! ```rust
//! use treesync_core::{diff, patch, MapModel, Model};
//!
//! let old: Model<i32> = MapModel::new()
//!     .assoc("a", Model::Primitive(1))
//!     .assoc("b", Model::Primitive(2))
//!     .into();
//! let new: Model<i32> = old.as_map().unwrap()
//!     .assoc("b", Model::Primitive(3))
//!     .into();
//!
//! let delta = diff(&old, &new).unwrap();
//! assert_eq!(patch(&old, &delta).unwrap(), new);
//! assert!(diff(&new, &new).is_none());
//! ```

pub mod diff;
pub mod diffable;
pub mod error;
pub mod json;
pub mod list;
pub mod map;
pub mod model;
pub mod path;
mod primitive;

pub use diff::{Diff, DiffKind, ListDiff, MapDiff};
pub use diffable::Diffable;
pub use error::{PatchError, Result};
pub use json::JsonModel;
pub use list::ListModel;
pub use map::MapModel;
pub use model::{Model, ModelKind};
pub use path::KeyPath;

/// Compute the delta from `old` to `new`; `None` means nothing changed.
pub fn diff<T: Clone + PartialEq>(old: &Model<T>, new: &Model<T>) -> Option<Diff<T>> {
    old.diff(new)
}

/// Apply `delta` to `old`, returning the new model. `old` is left untouched.
pub fn patch<T: Clone + PartialEq>(old: &Model<T>, delta: &Diff<T>) -> Result<Model<T>> {
    old.patch(delta)
}
