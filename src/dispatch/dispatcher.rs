//! Broadcast dispatcher implementation
//!
//! A publish call delivers to exactly the subscribers that were members of
//! the topic at the instant the snapshot was taken. Joins after the snapshot
//! miss the message; leavers after the snapshot fail their individual send
//! and are cleaned up, never surfaced to the publisher.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::protocol::{BroadcastMessage, TopicName};
use crate::registry::TopicRegistry;
use crate::session::Session;

/// Routes published lines to the current subscribers of a topic
pub struct Dispatcher {
    registry: Arc<TopicRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a shared registry
    pub fn new(registry: Arc<TopicRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher routes through
    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    /// Broadcast one payload line on `topic`
    ///
    /// The formatted line is encoded once and shared by every send. Returns
    /// the number of subscribers successfully delivered to; a publish never
    /// fails because some subset of subscribers is unreachable.
    pub async fn publish(&self, topic: &TopicName, payload: &str, origin: SocketAddr) -> usize {
        let message = BroadcastMessage::new(topic.clone(), origin.to_string(), payload);
        let line = message.encode();

        let snapshot = self.registry.subscribers_of(topic).await;
        if snapshot.is_empty() {
            tracing::debug!(topic = %topic, origin = %origin, "No subscribers, dropping broadcast");
            return 0;
        }

        let mut delivered = 0;
        let mut failed: Vec<Arc<Session>> = Vec::new();
        for subscriber in &snapshot {
            if subscriber.send_line(&line).await {
                delivered += 1;
            } else {
                failed.push(Arc::clone(subscriber));
            }
        }

        // Failures are removed after the iteration completes; the send loop
        // itself never touches the registry lock.
        for subscriber in failed {
            tracing::debug!(
                topic = %topic,
                session_id = %subscriber.id(),
                "Subscriber unreachable, removing"
            );
            self.registry.remove_client(&subscriber).await;
        }

        tracing::debug!(
            topic = %topic,
            origin = %origin,
            delivered,
            snapshot = snapshot.len(),
            "Broadcast complete"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Role;
    use crate::session::testing;

    fn topic(name: &str) -> TopicName {
        TopicName::normalize(name).unwrap()
    }

    fn origin() -> SocketAddr {
        "192.168.10.2:5000".parse().unwrap()
    }

    async fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(TopicRegistry::new()))
    }

    #[tokio::test]
    async fn test_delivers_to_every_snapshot_member() {
        let dispatcher = dispatcher().await;
        let (s1, sink1) = testing::session(1, Role::Subscriber, "sports");
        let (s2, sink2) = testing::session(2, Role::Subscriber, "sports");
        dispatcher.registry().register_subscriber(&s1).await;
        dispatcher.registry().register_subscriber(&s2).await;

        let delivered = dispatcher.publish(&topic("sports"), "goal!", origin()).await;

        assert_eq!(delivered, 2);
        for sink in [sink1, sink2] {
            let lines = sink.received();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0], "[TOPIC:SPORTS] [PUBLISHER 192.168.10.2:5000]: goal!");
        }
    }

    #[tokio::test]
    async fn test_other_topics_never_observe_the_message() {
        let dispatcher = dispatcher().await;
        let (sports, sports_sink) = testing::session(1, Role::Subscriber, "sports");
        let (news, news_sink) = testing::session(2, Role::Subscriber, "news");
        dispatcher.registry().register_subscriber(&sports).await;
        dispatcher.registry().register_subscriber(&news).await;

        dispatcher.publish(&topic("sports"), "goal!", origin()).await;

        assert_eq!(sports_sink.received().len(), 1);
        assert!(news_sink.received().is_empty());
    }

    #[tokio::test]
    async fn test_no_subscribers_is_a_noop() {
        let dispatcher = dispatcher().await;
        assert_eq!(dispatcher.publish(&topic("empty"), "hello", origin()).await, 0);
    }

    #[tokio::test]
    async fn test_dead_subscriber_is_removed_not_fatal() {
        let dispatcher = dispatcher().await;
        let (live, live_sink) = testing::session(1, Role::Subscriber, "sports");
        let (dead, _) = testing::dead_session(2, Role::Subscriber, "sports");
        dispatcher.registry().register_subscriber(&live).await;
        dispatcher.registry().register_subscriber(&dead).await;

        let delivered = dispatcher.publish(&topic("sports"), "goal!", origin()).await;

        // The live subscriber was delivered to; the dead one was excluded
        // from the count and is gone from the registry once publish returns.
        assert_eq!(delivered, 1);
        assert_eq!(live_sink.received().len(), 1);
        let remaining = dispatcher.registry().subscribers_of(&topic("sports")).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), live.id());
    }

    #[tokio::test]
    async fn test_single_publisher_order_preserved() {
        let dispatcher = dispatcher().await;
        let (s1, sink) = testing::session(1, Role::Subscriber, "sports");
        dispatcher.registry().register_subscriber(&s1).await;

        for payload in ["first", "second", "third"] {
            dispatcher.publish(&topic("sports"), payload, origin()).await;
        }

        let lines = sink.received();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
        assert!(lines[2].ends_with("third"));
    }

    #[tokio::test]
    async fn test_join_after_snapshot_misses_message() {
        let dispatcher = dispatcher().await;
        let (early, early_sink) = testing::session(1, Role::Subscriber, "sports");
        dispatcher.registry().register_subscriber(&early).await;

        dispatcher.publish(&topic("sports"), "goal!", origin()).await;

        let (late, late_sink) = testing::session(2, Role::Subscriber, "sports");
        dispatcher.registry().register_subscriber(&late).await;

        assert_eq!(early_sink.received().len(), 1);
        assert!(late_sink.received().is_empty());
    }
}
