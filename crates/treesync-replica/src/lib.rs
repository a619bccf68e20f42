//! treesync replica - publishing and mirroring state trees
//!
//! A [`Publisher`] owns the authoritative [`Model`](treesync_core::Model)
//! and turns every transaction into a sequence-numbered diff. A [`Mirror`]
//! rebuilds the same state by patching those diffs in order.
//!
//! # Protocol
//!
//! ```text
//! On transaction f:
//!   X' = f(X)
//!   d  = diff(X, X')      // nothing logged when none
//!   X  = X'
//!   D.push(d)
//!
//! On sync with mirror j:
//!   send D[acked[j]..] to j, or snapshot(X) when D no longer reaches back
//!   or j asked for a resync
//!
//! On mirror receiving (seq, d):
//!   X = patch(X, d)       // in seq order; duplicates are ignored
//!   ack(seq)
//!   on divergence: stop and wait for a snapshot
//! ```
//!
//! # Example
//!
//! ```rust
//! use treesync_core::{KeyPath, Model};
//! use treesync_replica::{Mirror, Publisher, ReplicaConfig};
//!
//! let mut publisher: Publisher<i32> = Publisher::new("server", ReplicaConfig::default());
//! let mut mirror = Mirror::new("client");
//! publisher.register_peer("client");
//!
//! publisher.seed(&KeyPath::parse("counter"), Model::Primitive(1));
//!
//! let messages = publisher.prepare_sync("client").unwrap();
//! let acked = mirror.apply_all(&messages).unwrap();
//! publisher.process_ack("client", acked).unwrap();
//!
//! assert_eq!(mirror.state(), publisher.state());
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod message;
pub mod mirror;
pub mod publisher;

// Re-export main types for convenience
pub use buffer::{AckTracker, DeltaLog, PeerId, SeqNo, TaggedDiff};
pub use config::{ReplicaConfig, ReplicaConfigBuilder};
pub use error::{Result, SyncError};
pub use message::SyncMessage;
pub use mirror::Mirror;
pub use publisher::Publisher;
