//! Publisher - the authoritative holder of a state tree
//!
//! Every write goes through [`Publisher::transact`], which snapshots the
//! state before and after the change and logs the diff between them.
//! Mirrors pull the diffs they have not acknowledged yet, or a full
//! snapshot when they fell too far behind or diverged.

use crate::buffer::{AckTracker, DeltaLog, PeerId, SeqNo, TaggedDiff};
use crate::config::ReplicaConfig;
use crate::error::{Result, SyncError};
use crate::message::SyncMessage;
use std::collections::BTreeMap;
use tracing::{debug, info};
use treesync_core::{Diffable, KeyPath, Model};

/// Authoritative state plus the log of diffs that produced it.
#[derive(Debug, Clone)]
pub struct Publisher<T: Clone> {
    /// Publisher identifier
    pub id: PeerId,
    /// Current snapshot
    state: Model<T>,
    /// Diffs awaiting acknowledgment
    log: DeltaLog<T>,
    /// Ack tracker for peers
    acks: AckTracker,
    /// Peers that must receive a snapshot before further diffs, with the
    /// sequence number their ack has to reach to clear the request
    pending_resync: BTreeMap<PeerId, SeqNo>,
    config: ReplicaConfig,
}

impl<T: Clone + PartialEq> Publisher<T> {
    /// Create a publisher whose state starts out absent.
    pub fn new(id: impl Into<PeerId>, config: ReplicaConfig) -> Self {
        Self {
            id: id.into(),
            state: Model::Absent,
            log: DeltaLog::new(config.max_buffered_deltas),
            acks: AckTracker::new(),
            pending_resync: BTreeMap::new(),
            config,
        }
    }

    /// Create a publisher and log `initial` as its first transaction.
    pub fn with_state(id: impl Into<PeerId>, config: ReplicaConfig, initial: Model<T>) -> Self {
        let mut publisher = Self::new(id, config);
        publisher.transact(|_| initial);
        publisher
    }

    /// Get current state (read-only)
    pub fn state(&self) -> &Model<T> {
        &self.state
    }

    pub fn current_seq(&self) -> SeqNo {
        self.log.current_seq()
    }

    pub fn log(&self) -> &DeltaLog<T> {
        &self.log
    }

    /// Run a logical operation against the current snapshot.
    ///
    /// Returns the sequence number of the logged diff, or `None` when the
    /// operation left the state unchanged.
    pub fn transact<F>(&mut self, operation: F) -> Option<SeqNo>
    where
        F: FnOnce(&Model<T>) -> Model<T>,
    {
        let next = operation(&self.state);
        let diff = self.state.diff(&next)?;
        let kind = diff.kind();

        self.state = next;
        let seq = self.log.push(diff);
        debug!(publisher = %self.id, seq, %kind, "logged transaction");
        Some(seq)
    }

    /// Place `value` at `path`, leaving the rest of the tree untouched.
    pub fn seed(&mut self, path: &KeyPath, value: Model<T>) -> Option<SeqNo> {
        self.transact(|state| state.assoc_in(path, value))
    }

    /// Register a peer; it starts from the empty state at seq 0.
    pub fn register_peer(&mut self, peer_id: impl Into<PeerId>) {
        self.acks.register_peer(peer_id);
    }

    /// Forget a peer so it no longer holds back log trimming.
    pub fn remove_peer(&mut self, peer_id: &str) -> bool {
        self.pending_resync.remove(peer_id);
        let removed = self.acks.remove_peer(peer_id);
        self.trim();
        removed
    }

    /// Full state at the current sequence number
    pub fn snapshot(&self) -> SyncMessage<T> {
        SyncMessage::Snapshot {
            seq: self.current_seq(),
            model: self.state.clone(),
        }
    }

    /// Mark a peer as needing a snapshot, e.g. after it reported divergence.
    pub fn request_resync(&mut self, peer_id: &str) -> Result<()> {
        if !self.acks.is_registered(peer_id) {
            return Err(SyncError::UnknownPeer(peer_id.to_string()));
        }
        info!(publisher = %self.id, peer = peer_id, "resync requested");
        self.pending_resync
            .insert(peer_id.to_string(), self.current_seq());
        Ok(())
    }

    /// Messages a peer needs to catch up, oldest first.
    pub fn prepare_sync(&self, peer_id: &str) -> Result<Vec<SyncMessage<T>>> {
        let acked = self
            .acks
            .get_ack(peer_id)
            .ok_or_else(|| SyncError::UnknownPeer(peer_id.to_string()))?;

        if self.pending_resync.contains_key(peer_id) || !self.log.covers(acked) {
            debug!(publisher = %self.id, peer = peer_id, acked, "sending snapshot");
            return Ok(vec![self.snapshot()]);
        }

        Ok(self
            .log
            .since(acked)
            .into_iter()
            .take(self.config.max_deltas_per_sync)
            .cloned()
            .map(SyncMessage::Delta)
            .collect())
    }

    /// Process an ack from a peer, then trim what every peer has seen.
    pub fn process_ack(&mut self, peer_id: &str, seq: SeqNo) -> Result<()> {
        if !self.acks.update_ack(peer_id, seq) {
            return Err(SyncError::UnknownPeer(peer_id.to_string()));
        }
        if matches!(self.pending_resync.get(peer_id), Some(&required) if seq >= required) {
            self.pending_resync.remove(peer_id);
        }
        self.trim();
        Ok(())
    }

    /// Pending diffs for a peer without wrapping them in messages
    pub fn pending_for(&self, peer_id: &str) -> Vec<&TaggedDiff<T>> {
        match self.acks.get_ack(peer_id) {
            Some(acked) => self.log.since(acked),
            None => Vec::new(),
        }
    }

    fn trim(&mut self) {
        if let Some(min_acked) = self.acks.min_acked() {
            let dropped = self.log.ack(min_acked);
            if dropped > 0 {
                debug!(publisher = %self.id, min_acked, dropped, "trimmed delta log");
            }
        }
    }
}
