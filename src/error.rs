//! Crate error types
//!
//! Errors are deliberately coarse: a connection that fails its handshake or
//! its transport is disconnected and logged, never escalated to the server.

use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// I/O error on the listener or a connection
    Io(io::Error),
    /// Handshake failed before the session became active
    Handshake(HandshakeError),
}

/// Reason a handshake was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// Peer closed before sending a role line
    MissingRole,
    /// Role line was neither PUBLISHER nor SUBSCRIBER
    InvalidRole(String),
    /// Peer closed before sending a topic line
    MissingTopic,
    /// Topic line was empty after normalization
    EmptyTopic,
    /// Handshake did not complete within the configured timeout
    TimedOut,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Handshake(e) => write!(f, "handshake failed: {}", e),
        }
    }
}

impl std::fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeError::MissingRole => write!(f, "peer closed before sending a role"),
            HandshakeError::InvalidRole(token) => write!(f, "unrecognized role: {:?}", token),
            HandshakeError::MissingTopic => write!(f, "peer closed before sending a topic"),
            HandshakeError::EmptyTopic => write!(f, "topic is empty after normalization"),
            HandshakeError::TimedOut => write!(f, "handshake timed out"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Handshake(_) => None,
        }
    }
}

impl std::error::Error for HandshakeError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self {
        Error::Handshake(e)
    }
}
