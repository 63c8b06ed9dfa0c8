//! Shared session handle
//!
//! A [`Session`] is the server-side state for one connected client, shared
//! between the connection's own task and the broadcast path. Role and topic
//! are written exactly once during the handshake and read-only afterwards;
//! the alive flag flips false exactly once when disconnect is finalized.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::protocol::{LineSink, Role, TopicName};

/// Stable identifier for a session, allocated at accept time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw id
    pub fn new(raw: u64) -> Self {
        SessionId(raw)
    }

    /// The raw id
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State for one connected client, for its entire lifetime
pub struct Session {
    id: SessionId,
    peer_addr: SocketAddr,
    role: OnceLock<Role>,
    topic: OnceLock<TopicName>,
    alive: AtomicBool,
    outbound: Arc<dyn LineSink>,
}

impl Session {
    /// Create a session for a freshly accepted connection
    pub fn new(id: SessionId, peer_addr: SocketAddr, outbound: Arc<dyn LineSink>) -> Self {
        Self {
            id,
            peer_addr,
            role: OnceLock::new(),
            topic: OnceLock::new(),
            alive: AtomicBool::new(true),
            outbound,
        }
    }

    /// Session id
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Remote peer address; `address:port` is the session's wire-visible
    /// identity, embedded in broadcast framing
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Record the role. First write wins; the handshake performs it once.
    pub fn set_role(&self, role: Role) {
        let _ = self.role.set(role);
    }

    /// Record the topic. First write wins; the handshake performs it once.
    pub fn set_topic(&self, topic: TopicName) {
        let _ = self.topic.set(topic);
    }

    /// Role, once the handshake has recorded it
    pub fn role(&self) -> Option<Role> {
        self.role.get().copied()
    }

    /// Topic, once the handshake has recorded it
    pub fn topic(&self) -> Option<&TopicName> {
        self.topic.get()
    }

    /// Whether disconnect has not yet been finalized
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the session not alive
    ///
    /// Returns `true` only for the first caller; racing disconnect paths use
    /// this to run cleanup at most once.
    pub fn retire(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    /// Send one line to the peer
    ///
    /// Returns `false` if the session is already retired or the write fails.
    pub async fn send_line(&self, line: &[u8]) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.outbound.send_line(line).await
    }

    /// Shut down the outbound side of the connection
    pub async fn close_outbound(&self) {
        self.outbound.close().await;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("role", &self.role.get())
            .field("topic", &self.topic.get())
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::RecordingSink;

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[test]
    fn test_role_and_topic_set_once() {
        let session = Session::new(SessionId::new(1), addr(), RecordingSink::new());

        assert_eq!(session.role(), None);
        session.set_role(Role::Publisher);
        session.set_role(Role::Subscriber);
        assert_eq!(session.role(), Some(Role::Publisher));

        let sports = TopicName::normalize("sports").unwrap();
        let news = TopicName::normalize("news").unwrap();
        session.set_topic(sports.clone());
        session.set_topic(news);
        assert_eq!(session.topic(), Some(&sports));
    }

    #[test]
    fn test_retire_is_idempotent() {
        let session = Session::new(SessionId::new(2), addr(), RecordingSink::new());

        assert!(session.is_alive());
        assert!(session.retire());
        assert!(!session.retire());
        assert!(!session.is_alive());
    }

    #[tokio::test]
    async fn test_send_after_retire_fails() {
        let sink = RecordingSink::new();
        let session = Session::new(SessionId::new(3), addr(), sink.clone());

        assert!(session.send_line(b"hello").await);
        session.retire();
        assert!(!session.send_line(b"too late").await);
        assert_eq!(sink.received(), vec!["hello"]);
    }
}
