//! Delta log for outgoing diffs, and acknowledgment tracking
//!
//! The publisher keeps every diff it produced, tagged with a sequence
//! number, until all peers have acknowledged it:
//!
//! On transaction:
//!   d = diff(X, X')      // skip when none
//!   X = X'
//!   D.push(d)            // seq = seq + 1
//!
//! On send to peer j:
//!   send D[acked[j]..] to j, or a snapshot of X when D no longer
//!   reaches back to acked[j]
//!
//! On ack(seq) from peer j:
//!   acked[j] = max(acked[j], seq)
//!   drop D[..min(acked)]

use std::collections::{BTreeMap, VecDeque};
use treesync_core::Diff;

/// Sequence number of a logged diff
pub type SeqNo = u64;

/// Peer identifier
pub type PeerId = String;

/// A diff tagged with the sequence number it produces
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedDiff<T: Clone> {
    pub seq: SeqNo,
    pub diff: Diff<T>,
}

/// Bounded, ordered log of diffs awaiting acknowledgment
#[derive(Debug, Clone)]
pub struct DeltaLog<T: Clone> {
    /// Sequence number of the newest diff
    current_seq: SeqNo,
    /// Retained diffs, oldest first
    deltas: VecDeque<TaggedDiff<T>>,
    /// Maximum diffs to retain before evicting the oldest
    max_buffered: usize,
}

impl<T: Clone> DeltaLog<T> {
    pub fn new(max_buffered: usize) -> Self {
        Self {
            current_seq: 0,
            deltas: VecDeque::new(),
            max_buffered: max_buffered.max(1),
        }
    }

    /// Append a diff, returning its sequence number
    pub fn push(&mut self, diff: Diff<T>) -> SeqNo {
        self.current_seq += 1;
        self.deltas.push_back(TaggedDiff {
            seq: self.current_seq,
            diff,
        });

        // Diffs do not compose, so overflow evicts instead of compacting.
        while self.deltas.len() > self.max_buffered {
            self.deltas.pop_front();
        }

        self.current_seq
    }

    /// Diffs after `acked_seq`, oldest first
    pub fn since(&self, acked_seq: SeqNo) -> Vec<&TaggedDiff<T>> {
        self.deltas
            .iter()
            .filter(|td| td.seq > acked_seq)
            .collect()
    }

    /// True if every diff after `acked_seq` is still retained
    pub fn covers(&self, acked_seq: SeqNo) -> bool {
        acked_seq + self.deltas.len() as SeqNo >= self.current_seq
    }

    /// Drop diffs up to and including `acked_seq`, returning how many were dropped
    pub fn ack(&mut self, acked_seq: SeqNo) -> usize {
        let initial_len = self.deltas.len();
        self.deltas.retain(|td| td.seq > acked_seq);
        initial_len - self.deltas.len()
    }

    /// Sequence number of the oldest retained diff
    pub fn oldest_seq(&self) -> Option<SeqNo> {
        self.deltas.front().map(|td| td.seq)
    }

    pub fn current_seq(&self) -> SeqNo {
        self.current_seq
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Tracks acknowledgments from peers for log trimming
#[derive(Debug, Clone, Default)]
pub struct AckTracker {
    /// Maps peer_id -> last acked sequence number
    acked: BTreeMap<PeerId, SeqNo>,
}

impl AckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer (initializes ack to 0)
    pub fn register_peer(&mut self, peer_id: impl Into<PeerId>) {
        self.acked.entry(peer_id.into()).or_insert(0);
    }

    pub fn remove_peer(&mut self, peer_id: &str) -> bool {
        self.acked.remove(peer_id).is_some()
    }

    pub fn is_registered(&self, peer_id: &str) -> bool {
        self.acked.contains_key(peer_id)
    }

    /// Update the ack for a peer; acks never move backwards.
    /// Returns false for unregistered peers.
    pub fn update_ack(&mut self, peer_id: &str, seq: SeqNo) -> bool {
        match self.acked.get_mut(peer_id) {
            Some(acked) => {
                *acked = (*acked).max(seq);
                true
            }
            None => false,
        }
    }

    pub fn get_ack(&self, peer_id: &str) -> Option<SeqNo> {
        self.acked.get(peer_id).copied()
    }

    /// Minimum acked sequence across all peers (safe to trim up to this)
    pub fn min_acked(&self) -> Option<SeqNo> {
        self.acked.values().copied().min()
    }

    pub fn peers(&self) -> impl Iterator<Item = &PeerId> {
        self.acked.keys()
    }
}
