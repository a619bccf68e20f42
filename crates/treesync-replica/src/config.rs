//! Replication configuration.

use serde::{Deserialize, Serialize};

/// Configuration for publishers and mirrors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaConfig {
    /// Maximum deltas retained for peers that have not acknowledged them.
    /// Peers that fall further behind receive a snapshot instead.
    pub max_buffered_deltas: usize,
    /// Maximum deltas handed out by a single sync call.
    pub max_deltas_per_sync: usize,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            max_buffered_deltas: 256,
            max_deltas_per_sync: 64,
        }
    }
}

/// Builder for replica configuration.
pub struct ReplicaConfigBuilder {
    config: ReplicaConfig,
}

impl ReplicaConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ReplicaConfig::default(),
        }
    }

    pub fn max_buffered_deltas(mut self, count: usize) -> Self {
        self.config.max_buffered_deltas = count.max(1);
        self
    }

    pub fn max_deltas_per_sync(mut self, count: usize) -> Self {
        self.config.max_deltas_per_sync = count.max(1);
        self
    }

    pub fn build(self) -> ReplicaConfig {
        self.config
    }
}

impl Default for ReplicaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
