//! The diff/patch trait - the algebraic contract every tree node honours
//!
//! For any two values A and B of a diffable type:
//!  - Reflexivity:  diff(A, A) = none
//!  - Round-trip:   patch(A, diff(A, B)) = B
//!  - Stability:    diff(patch(A, diff(A, B)), B) = none
//!
//!  A producer only ever ships the delta; the consumer reconstructs B from A.

use crate::error::Result;

/// Structural diff and its inverse application.
pub trait Diffable: Sized {
    /// The delta type describing how to get from one value to another
    type Delta;

    /// Compute the delta that turns `self` into `other`.
    /// Returns `None` when the two values are equal.
    fn diff(&self, other: &Self) -> Option<Self::Delta>;

    /// Apply a delta, producing a new value. `self` is never modified.
    fn patch(&self, delta: &Self::Delta) -> Result<Self>;

    /// Check that applying `delta` to `self` yields `target`
    fn converges_with(&self, target: &Self, delta: &Self::Delta) -> bool
    where
        Self: PartialEq,
    {
        matches!(self.patch(delta), Ok(ref patched) if patched == target)
    }
}
