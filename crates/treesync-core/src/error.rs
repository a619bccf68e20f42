//! Error types for patch application.

use crate::diff::DiffKind;
use crate::model::ModelKind;
use thiserror::Error;

/// Errors that can occur while applying a [`Diff`](crate::Diff) to a model.
///
/// Two classes exist. Inconsistency errors (`KindMismatch`, `MissingEntry`)
/// mean the diff was never produced against this model and indicate a bug in
/// the caller. Divergence errors (`Diverged`) mean the target moved away from
/// the diff's origin; the caller should fall back to a full resync.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Type mismatch: cannot apply {diff} diff to {model} model")]
    KindMismatch { model: ModelKind, diff: DiffKind },

    #[error("Missing entry: compound diff targets absent key {key:?}")]
    MissingEntry { key: String },

    #[error("Operation not supported: list diff at index {index} does not fit list of length {len}")]
    Diverged { index: usize, len: usize },

    #[error("At key {key:?}: {source}")]
    AtKey {
        key: String,
        #[source]
        source: Box<PatchError>,
    },
}

impl PatchError {
    /// Wrap this error with the map key it occurred under.
    pub fn at_key(self, key: impl Into<String>) -> Self {
        PatchError::AtKey {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all key wrappers removed.
    pub fn root_cause(&self) -> &PatchError {
        match self {
            PatchError::AtKey { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Dotted path of map keys leading to the failure ("" at the root).
    pub fn path(&self) -> String {
        let mut keys = Vec::new();
        let mut current = self;
        while let PatchError::AtKey { key, source } = current {
            keys.push(key.as_str());
            current = source;
        }
        keys.join(".")
    }

    /// True when the target diverged from the diff's origin and needs a resync.
    pub fn is_divergence(&self) -> bool {
        matches!(self.root_cause(), PatchError::Diverged { .. })
    }

    /// True when the diff could never have been produced against the target.
    pub fn is_inconsistency(&self) -> bool {
        !self.is_divergence()
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_path_and_cause() {
        let err = PatchError::Diverged { index: 5, len: 2 }
            .at_key("items")
            .at_key("doc");

        assert_eq!(err.path(), "doc.items");
        assert!(err.is_divergence());
        assert!(!err.is_inconsistency());
        assert_eq!(err.root_cause(), &PatchError::Diverged { index: 5, len: 2 });
    }

    #[test]
    fn test_mismatch_is_inconsistency() {
        let err = PatchError::KindMismatch {
            model: ModelKind::List,
            diff: DiffKind::Map,
        };
        assert!(err.is_inconsistency());
        assert_eq!(err.path(), "");
        assert_eq!(
            err.to_string(),
            "Type mismatch: cannot apply map diff to list model"
        );
    }
}
