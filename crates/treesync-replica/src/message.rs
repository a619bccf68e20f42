//! Messages exchanged between a publisher and its mirrors.

use crate::buffer::{SeqNo, TaggedDiff};
use treesync_core::Model;

/// A unit of replication traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncMessage<T: Clone> {
    /// One transaction's diff.
    Delta(TaggedDiff<T>),
    /// The full state as of `seq`.
    Snapshot { seq: SeqNo, model: Model<T> },
}

impl<T: Clone> SyncMessage<T> {
    /// Sequence number the receiver reaches after applying this message.
    pub fn seq(&self) -> SeqNo {
        match self {
            SyncMessage::Delta(tagged) => tagged.seq,
            SyncMessage::Snapshot { seq, .. } => *seq,
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, SyncMessage::Snapshot { .. })
    }
}
