//! Error types for replication.

use crate::buffer::SeqNo;
use thiserror::Error;
use treesync_core::PatchError;

/// Errors that can occur while publishing or mirroring snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Sequence gap: expected {expected}, received {received}")]
    SequenceGap { expected: SeqNo, received: SeqNo },

    #[error("Resync required: delta {seq} diverged: {source}")]
    ResyncRequired {
        seq: SeqNo,
        #[source]
        source: PatchError,
    },

    #[error("Awaiting snapshot: delta {seq} refused")]
    AwaitingSnapshot { seq: SeqNo },

    #[error("Inconsistent diff: {0}")]
    Inconsistent(#[from] PatchError),

    #[error("Peer not found: {0}")]
    UnknownPeer(String),
}

impl SyncError {
    /// True when the only way forward is a full snapshot.
    pub fn needs_snapshot(&self) -> bool {
        matches!(
            self,
            SyncError::ResyncRequired { .. } | SyncError::AwaitingSnapshot { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
