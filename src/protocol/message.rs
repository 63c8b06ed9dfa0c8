//! Broadcast message framing
//!
//! A published payload is formatted once and the resulting `Bytes` line is
//! shared by every subscriber send, so fan-out clones are reference-counted
//! rather than copied.

use bytes::Bytes;

use super::handshake::TopicName;

/// A payload line framed for delivery to subscribers
///
/// The frame embeds the topic and the publisher's identity so a subscriber
/// can never be confused about provenance:
///
/// ```text
/// [TOPIC:SPORTS] [PUBLISHER 127.0.0.1:52114]: goal!
/// ```
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// Topic the payload was published on
    pub topic: TopicName,
    /// Publisher identity (`address:port`)
    pub origin: String,
    /// Payload line, opaque to the server
    pub payload: String,
}

impl BroadcastMessage {
    /// Create a new message
    pub fn new(topic: TopicName, origin: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic,
            origin: origin.into(),
            payload: payload.into(),
        }
    }

    /// Encode the formatted line (without a trailing newline) into `Bytes`
    pub fn encode(&self) -> Bytes {
        Bytes::from(self.to_string())
    }
}

impl std::fmt::Display for BroadcastMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[TOPIC:{}] [PUBLISHER {}]: {}",
            self.topic, self.origin, self.payload
        )
    }
}
