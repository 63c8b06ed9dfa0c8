//! Handshake tokens: client role and topic name
//!
//! The handshake is two lines, role then topic. Both are parsed here so the
//! connection handler stays a pure state machine.

use super::constants::{ROLE_PUBLISHER, ROLE_SUBSCRIBER, TOPIC_SEPARATOR};

/// Declared role of a connected client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sends payload lines to be broadcast on its topic
    Publisher,
    /// Receives every broadcast line on its topic
    Subscriber,
}

impl Role {
    /// Parse a role line, case-insensitively
    ///
    /// Returns `None` for anything other than `PUBLISHER` or `SUBSCRIBER`;
    /// the caller disconnects on `None`.
    pub fn parse(token: &str) -> Option<Role> {
        let token = token.trim();
        if token.eq_ignore_ascii_case(ROLE_PUBLISHER) {
            Some(Role::Publisher)
        } else if token.eq_ignore_ascii_case(ROLE_SUBSCRIBER) {
            Some(Role::Subscriber)
        } else {
            None
        }
    }

    /// Wire token for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Publisher => ROLE_PUBLISHER,
            Role::Subscriber => ROLE_SUBSCRIBER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized topic name
///
/// A topic partitions publishers and subscribers into independent broadcast
/// domains. Normalization (trim, whitespace runs to `_`, uppercase) happens
/// exactly once, at construction, so equality and hashing of `TopicName`s is
/// plain string comparison everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicName(String);

impl TopicName {
    /// Normalize a raw topic line into a topic name
    ///
    /// Returns `None` when the line is empty after trimming; the caller
    /// disconnects on `None`.
    pub fn normalize(raw: &str) -> Option<TopicName> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }
        let name = words.join(&TOPIC_SEPARATOR.to_string()).to_uppercase();
        Some(TopicName(name))
    }

    /// The normalized name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
