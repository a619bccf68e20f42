//! Mirror - a remote holder that reconstructs state from diffs.

use crate::buffer::{PeerId, SeqNo};
use crate::error::{Result, SyncError};
use crate::message::SyncMessage;
use tracing::{debug, info, warn};
use treesync_core::{Diffable, Model};

/// A replica kept in sync by applying a publisher's messages in order.
#[derive(Debug, Clone)]
pub struct Mirror<T: Clone> {
    /// Mirror identifier
    pub id: PeerId,
    state: Model<T>,
    /// Sequence number of the last applied message
    applied_seq: SeqNo,
    /// Set once a diff failed to apply; only a snapshot clears it
    needs_resync: bool,
}

impl<T: Clone + PartialEq> Mirror<T> {
    /// Create a mirror at seq 0 with an absent state.
    pub fn new(id: impl Into<PeerId>) -> Self {
        Self {
            id: id.into(),
            state: Model::Absent,
            applied_seq: 0,
            needs_resync: false,
        }
    }

    pub fn state(&self) -> &Model<T> {
        &self.state
    }

    pub fn applied_seq(&self) -> SeqNo {
        self.applied_seq
    }

    pub fn needs_resync(&self) -> bool {
        self.needs_resync
    }

    /// Apply one message, returning the sequence number to acknowledge.
    ///
    /// The state is left untouched when an error is returned.
    pub fn apply(&mut self, message: &SyncMessage<T>) -> Result<SeqNo> {
        match message {
            SyncMessage::Snapshot { seq, model } => {
                if *seq < self.applied_seq && !self.needs_resync {
                    debug!(mirror = %self.id, seq, applied = self.applied_seq, "ignored stale snapshot");
                    return Ok(self.applied_seq);
                }
                info!(mirror = %self.id, seq, "installed snapshot");
                self.state = model.clone();
                self.applied_seq = *seq;
                self.needs_resync = false;
                Ok(self.applied_seq)
            }
            SyncMessage::Delta(tagged) => {
                if self.needs_resync {
                    return Err(SyncError::AwaitingSnapshot { seq: tagged.seq });
                }
                if tagged.seq <= self.applied_seq {
                    debug!(mirror = %self.id, seq = tagged.seq, "ignored duplicate delta");
                    return Ok(self.applied_seq);
                }
                let expected = self.applied_seq + 1;
                if tagged.seq != expected {
                    warn!(mirror = %self.id, expected, received = tagged.seq, "sequence gap");
                    return Err(SyncError::SequenceGap {
                        expected,
                        received: tagged.seq,
                    });
                }

                match self.state.patch(&tagged.diff) {
                    Ok(next) => {
                        self.state = next;
                        self.applied_seq = tagged.seq;
                        debug!(mirror = %self.id, seq = tagged.seq, "applied delta");
                        Ok(self.applied_seq)
                    }
                    Err(err) if err.is_divergence() => {
                        warn!(mirror = %self.id, seq = tagged.seq, path = %err.path(), "diverged from publisher");
                        self.needs_resync = true;
                        Err(SyncError::ResyncRequired {
                            seq: tagged.seq,
                            source: err,
                        })
                    }
                    Err(err) => Err(SyncError::Inconsistent(err)),
                }
            }
        }
    }

    /// Apply messages in order, stopping at the first failure.
    pub fn apply_all<'a, I>(&mut self, messages: I) -> Result<SeqNo>
    where
        I: IntoIterator<Item = &'a SyncMessage<T>>,
        T: 'a,
    {
        for message in messages {
            self.apply(message)?;
        }
        Ok(self.applied_seq)
    }

    /// Replace local state outside the sync protocol, e.g. from a
    /// host-side edit. The next diff from the publisher will usually
    /// fail to apply and trigger a resync.
    pub fn overwrite(&mut self, model: Model<T>) {
        self.state = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TaggedDiff;
    use im::Vector;
    use treesync_core::{Diff, ListDiff, PatchError};

    fn delta(seq: SeqNo, diff: Diff<i32>) -> SyncMessage<i32> {
        SyncMessage::Delta(TaggedDiff { seq, diff })
    }

    #[test]
    fn test_apply_in_order() {
        let mut mirror = Mirror::new("m1");
        mirror.apply(&delta(1, Diff::Value(Model::Primitive(1)))).unwrap();
        mirror.apply(&delta(2, Diff::Primitive(2))).unwrap();

        assert_eq!(mirror.state(), &Model::Primitive(2));
        assert_eq!(mirror.applied_seq(), 2);
    }

    #[test]
    fn test_duplicate_delta_is_ignored() {
        let mut mirror = Mirror::new("m1");
        let first = delta(1, Diff::Value(Model::Primitive(1)));
        mirror.apply(&first).unwrap();

        assert_eq!(mirror.apply(&first), Ok(1));
        assert_eq!(mirror.state(), &Model::Primitive(1));
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut mirror: Mirror<i32> = Mirror::new("m1");
        let err = mirror.apply(&delta(3, Diff::Primitive(1))).unwrap_err();

        assert_eq!(
            err,
            SyncError::SequenceGap {
                expected: 1,
                received: 3
            }
        );
        assert!(!mirror.needs_resync());
    }

    #[test]
    fn test_divergence_requires_snapshot() {
        let mut mirror = Mirror::new("m1");
        mirror
            .apply(&delta(1, Diff::Value(Model::empty_list())))
            .unwrap();

        let bad = delta(2, Diff::List(ListDiff::new(Vector::new(), 5)));
        let err = mirror.apply(&bad).unwrap_err();
        assert!(err.needs_snapshot());
        assert!(mirror.needs_resync());
        assert_eq!(mirror.state(), &Model::empty_list());

        let next = delta(2, Diff::Value(Model::Primitive(1)));
        assert_eq!(
            mirror.apply(&next),
            Err(SyncError::AwaitingSnapshot { seq: 2 })
        );

        let snapshot = SyncMessage::Snapshot {
            seq: 4,
            model: Model::Primitive(9),
        };
        assert_eq!(mirror.apply(&snapshot), Ok(4));
        assert!(!mirror.needs_resync());
        assert_eq!(mirror.state(), &Model::Primitive(9));
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let mut mirror = Mirror::new("m1");
        let old = SyncMessage::Snapshot {
            seq: 3,
            model: Model::Primitive(3),
        };
        mirror
            .apply(&SyncMessage::Snapshot {
                seq: 5,
                model: Model::Primitive(5),
            })
            .unwrap();

        assert_eq!(mirror.apply(&old), Ok(5));
        assert_eq!(mirror.state(), &Model::Primitive(5));
        assert_eq!(mirror.applied_seq(), 5);
    }

    #[test]
    fn test_older_snapshot_accepted_while_resyncing() {
        let mut mirror = Mirror::new("m1");
        mirror.apply(&delta(1, Diff::Value(Model::empty_list()))).unwrap();
        mirror
            .apply(&delta(2, Diff::List(ListDiff::new(Vector::new(), 5))))
            .unwrap_err();
        assert!(mirror.needs_resync());

        let snapshot = SyncMessage::Snapshot {
            seq: 0,
            model: Model::Absent,
        };
        assert_eq!(mirror.apply(&snapshot), Ok(0));
        assert_eq!(mirror.state(), &Model::Absent);
        assert!(!mirror.needs_resync());
    }

    #[test]
    fn test_inconsistent_diff_is_reported() {
        let mut mirror = Mirror::new("m1");
        mirror.apply(&delta(1, Diff::Value(Model::Primitive(1)))).unwrap();

        let err = mirror
            .apply(&delta(2, Diff::List(ListDiff::new(Vector::new(), 0))))
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Inconsistent(PatchError::KindMismatch { .. })
        ));
        assert!(!mirror.needs_resync());
        assert_eq!(mirror.applied_seq(), 1);
    }
}
