//! Topic registry implementation
//!
//! One registry-wide `RwLock` guards both maps. Critical sections are pure
//! map operations; the lock is never held across a send, so registration,
//! removal, and in-flight broadcasts cannot deadlock each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::entry::TopicEntry;
use crate::protocol::{Role, TopicName};
use crate::session::{Session, SessionId};
use crate::stats::{RegistryStats, TopicStats};

/// Central registry mapping topics to their publisher and subscriber
/// sessions, plus every tracked session for bulk shutdown
pub struct TopicRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    topics: HashMap<TopicName, TopicEntry>,
    sessions: HashMap<SessionId, Arc<Session>>,
}

impl TopicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Track a session from accept time, before its handshake completes
    ///
    /// Pre-handshake sessions never join a topic set but must be reachable
    /// by server shutdown.
    pub async fn track(&self, session: &Arc<Session>) {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id(), Arc::clone(session));
    }

    /// Register a session as a publisher of its recorded topic
    pub async fn register_publisher(&self, session: &Arc<Session>) {
        self.register(session, Role::Publisher).await;
    }

    /// Register a session as a subscriber of its recorded topic
    pub async fn register_subscriber(&self, session: &Arc<Session>) {
        self.register(session, Role::Subscriber).await;
    }

    async fn register(&self, session: &Arc<Session>, role: Role) {
        let Some(topic) = session.topic().cloned() else {
            tracing::warn!(
                session_id = %session.id(),
                "Registration without a recorded topic ignored"
            );
            return;
        };

        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.id(), Arc::clone(session));
        let entry = inner
            .topics
            .entry(topic.clone())
            .or_insert_with(TopicEntry::new);
        entry.insert(role, Arc::clone(session));

        match role {
            Role::Publisher => tracing::info!(
                topic = %topic,
                session_id = %session.id(),
                publishers = entry.publisher_count(),
                "Publisher registered"
            ),
            Role::Subscriber => tracing::info!(
                topic = %topic,
                session_id = %session.id(),
                subscribers = entry.subscriber_count(),
                "Subscriber registered"
            ),
        }
    }

    /// Remove a session from its topic set and from the tracked set
    ///
    /// The session's own recorded role and topic locate it; no scanning.
    /// Safe to call repeatedly; disconnect paths race and the second call is
    /// a no-op.
    pub async fn remove_client(&self, session: &Session) {
        let mut inner = self.inner.write().await;
        let was_tracked = inner.sessions.remove(&session.id()).is_some();

        if let (Some(role), Some(topic)) = (session.role(), session.topic()) {
            if let Some(entry) = inner.topics.get_mut(topic) {
                entry.remove(role, session.id());
                if entry.is_empty() {
                    inner.topics.remove(topic);
                    tracing::debug!(topic = %topic, "Topic dropped, no members left");
                }
            }
        }

        if was_tracked {
            tracing::info!(
                session_id = %session.id(),
                peer = %session.peer_addr(),
                "Session removed"
            );
        }
    }

    /// Snapshot of the current subscribers of `topic`
    ///
    /// A copy, not a live view: the broadcast that consumes it runs with the
    /// lock released, and membership changes after the snapshot do not
    /// affect the in-flight delivery.
    pub async fn subscribers_of(&self, topic: &TopicName) -> Vec<Arc<Session>> {
        let inner = self.inner.read().await;
        inner
            .topics
            .get(topic)
            .map(|entry| entry.subscribers_snapshot())
            .unwrap_or_default()
    }

    /// Sorted union of topics present in either role's map
    pub async fn available_topics(&self) -> Vec<TopicName> {
        let inner = self.inner.read().await;
        let mut topics: Vec<TopicName> = inner.topics.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Per-topic membership counts, sorted by topic
    pub async fn topic_stats(&self) -> Vec<TopicStats> {
        let inner = self.inner.read().await;
        let mut stats: Vec<TopicStats> = inner
            .topics
            .iter()
            .map(|(topic, entry)| TopicStats {
                topic: topic.clone(),
                publishers: entry.publisher_count(),
                subscribers: entry.subscriber_count(),
            })
            .collect();
        stats.sort_by(|a, b| a.topic.cmp(&b.topic));
        stats
    }

    /// Aggregate counts across the registry
    pub async fn stats(&self) -> RegistryStats {
        let inner = self.inner.read().await;
        let mut stats = RegistryStats {
            topics: inner.topics.len(),
            sessions: inner.sessions.len(),
            ..RegistryStats::new()
        };
        for entry in inner.topics.values() {
            stats.publishers += entry.publisher_count();
            stats.subscribers += entry.subscriber_count();
        }
        stats
    }

    /// Number of tracked sessions
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Remove and return every tracked session, clearing all topic sets
    ///
    /// The bulk-shutdown primitive: the controller disconnects what this
    /// returns.
    pub async fn drain_sessions(&self) -> Vec<Arc<Session>> {
        let mut inner = self.inner.write().await;
        inner.topics.clear();
        let drained: Vec<Arc<Session>> = inner.sessions.drain().map(|(_, s)| s).collect();
        if !drained.is_empty() {
            tracing::info!(sessions = drained.len(), "Registry drained for shutdown");
        }
        drained
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing;

    fn topic(name: &str) -> TopicName {
        TopicName::normalize(name).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_snapshot() {
        let registry = TopicRegistry::new();
        let (s1, _) = testing::session(1, Role::Subscriber, "sports");
        let (s2, _) = testing::session(2, Role::Subscriber, "sports");
        let (p1, _) = testing::session(3, Role::Publisher, "sports");

        registry.register_subscriber(&s1).await;
        registry.register_subscriber(&s2).await;
        registry.register_publisher(&p1).await;

        let snapshot = registry.subscribers_of(&topic("sports")).await;
        assert_eq!(snapshot.len(), 2);
        // Publishers are not part of the subscriber snapshot.
        assert!(snapshot.iter().all(|s| s.id() != p1.id()));
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let registry = TopicRegistry::new();
        let (s1, _) = testing::session(1, Role::Subscriber, "news");
        registry.register_subscriber(&s1).await;

        let snapshot = registry.subscribers_of(&topic("news")).await;
        registry.remove_client(&s1).await;

        // The earlier snapshot is unaffected by the removal.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.subscribers_of(&topic("news")).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_topic_is_empty() {
        let registry = TopicRegistry::new();
        assert!(registry.subscribers_of(&topic("nobody")).await.is_empty());
    }

    #[tokio::test]
    async fn test_topic_isolation() {
        let registry = TopicRegistry::new();
        let (sports, _) = testing::session(1, Role::Subscriber, "sports");
        let (news, _) = testing::session(2, Role::Subscriber, "news");

        registry.register_subscriber(&sports).await;
        registry.register_subscriber(&news).await;

        let snapshot = registry.subscribers_of(&topic("sports")).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), sports.id());
    }

    #[tokio::test]
    async fn test_last_removal_drops_topic_key() {
        let registry = TopicRegistry::new();
        let (s1, _) = testing::session(1, Role::Subscriber, "weather");
        let (p1, _) = testing::session(2, Role::Publisher, "weather");

        registry.register_subscriber(&s1).await;
        registry.register_publisher(&p1).await;
        assert_eq!(registry.available_topics().await, vec![topic("weather")]);

        registry.remove_client(&s1).await;
        assert_eq!(registry.available_topics().await, vec![topic("weather")]);

        registry.remove_client(&p1).await;
        assert!(registry.available_topics().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let registry = TopicRegistry::new();
        let (s1, _) = testing::session(1, Role::Subscriber, "sports");
        registry.register_subscriber(&s1).await;

        registry.remove_client(&s1).await;
        let after_first = registry.stats().await;

        registry.remove_client(&s1).await;
        assert_eq!(registry.stats().await, after_first);
        assert_eq!(after_first.sessions, 0);
        assert_eq!(after_first.topics, 0);
    }

    #[tokio::test]
    async fn test_tracked_session_without_handshake() {
        let registry = TopicRegistry::new();
        let sink = testing::RecordingSink::new();
        let session = Arc::new(Session::new(
            SessionId::new(9),
            "127.0.0.1:49000".parse().unwrap(),
            sink,
        ));

        registry.track(&session).await;
        let stats = registry.stats().await;
        assert_eq!(stats.sessions, 1);
        assert_eq!(stats.topics, 0);

        // Removal of a never-registered session is safe.
        registry.remove_client(&session).await;
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_available_topics_sorted_union() {
        let registry = TopicRegistry::new();
        let (p, _) = testing::session(1, Role::Publisher, "zebra");
        let (s, _) = testing::session(2, Role::Subscriber, "alpha");

        registry.register_publisher(&p).await;
        registry.register_subscriber(&s).await;

        assert_eq!(
            registry.available_topics().await,
            vec![topic("alpha"), topic("zebra")]
        );
    }

    #[tokio::test]
    async fn test_drain_sessions_clears_everything() {
        let registry = TopicRegistry::new();
        let (s1, _) = testing::session(1, Role::Subscriber, "sports");
        let (p1, _) = testing::session(2, Role::Publisher, "news");
        registry.register_subscriber(&s1).await;
        registry.register_publisher(&p1).await;

        let drained = registry.drain_sessions().await;
        assert_eq!(drained.len(), 2);
        assert_eq!(registry.session_count().await, 0);
        assert!(registry.available_topics().await.is_empty());
    }

    #[tokio::test]
    async fn test_topic_stats_counts() {
        let registry = TopicRegistry::new();
        let (p1, _) = testing::session(1, Role::Publisher, "sports");
        let (s1, _) = testing::session(2, Role::Subscriber, "sports");
        let (s2, _) = testing::session(3, Role::Subscriber, "sports");

        registry.register_publisher(&p1).await;
        registry.register_subscriber(&s1).await;
        registry.register_subscriber(&s2).await;

        let stats = registry.topic_stats().await;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].publishers, 1);
        assert_eq!(stats[0].subscribers, 2);
        assert_eq!(stats[0].members(), 3);
    }
}
