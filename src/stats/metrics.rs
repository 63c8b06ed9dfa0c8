//! Statistics for topics and the registry as a whole
//!
//! Snapshots computed on demand from the registry; informational only, never
//! consulted for routing decisions.

use crate::protocol::TopicName;

/// Membership counts for one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicStats {
    /// Topic these counts describe
    pub topic: TopicName,
    /// Registered publishers
    pub publishers: usize,
    /// Registered subscribers
    pub subscribers: usize,
}

impl TopicStats {
    /// Total members on the topic
    pub fn members(&self) -> usize {
        self.publishers + self.subscribers
    }
}

/// Aggregate counts across the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Topics with at least one member
    pub topics: usize,
    /// Tracked sessions, including pre-handshake ones
    pub sessions: usize,
    /// Registered publishers across all topics
    pub publishers: usize,
    /// Registered subscribers across all topics
    pub subscribers: usize,
}

impl RegistryStats {
    /// Create zeroed stats
    pub fn new() -> Self {
        Self::default()
    }
}
