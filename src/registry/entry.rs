//! Per-topic membership entry
//!
//! An entry exists in the registry only while it has at least one member;
//! the store removes the topic key when the last member leaves.

use std::collections::HashMap;
use std::sync::Arc;

use crate::protocol::Role;
use crate::session::{Session, SessionId};

/// Membership sets for a single topic
#[derive(Debug, Default)]
pub struct TopicEntry {
    publishers: HashMap<SessionId, Arc<Session>>,
    subscribers: HashMap<SessionId, Arc<Session>>,
}

impl TopicEntry {
    /// Create an empty entry
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Insert a session under its role
    pub(super) fn insert(&mut self, role: Role, session: Arc<Session>) {
        match role {
            Role::Publisher => self.publishers.insert(session.id(), session),
            Role::Subscriber => self.subscribers.insert(session.id(), session),
        };
    }

    /// Remove a session from its role's set. Returns whether it was present.
    pub(super) fn remove(&mut self, role: Role, id: SessionId) -> bool {
        match role {
            Role::Publisher => self.publishers.remove(&id).is_some(),
            Role::Subscriber => self.subscribers.remove(&id).is_some(),
        }
    }

    /// Copy of the current subscriber set
    pub(super) fn subscribers_snapshot(&self) -> Vec<Arc<Session>> {
        self.subscribers.values().cloned().collect()
    }

    /// Number of registered publishers
    pub fn publisher_count(&self) -> usize {
        self.publishers.len()
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// True when neither role has members; the store drops the topic key
    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty() && self.subscribers.is_empty()
    }
}
