//! Protocol constants

/// Role token a publishing client sends as its first line
pub const ROLE_PUBLISHER: &str = "PUBLISHER";

/// Role token a subscribing client sends as its first line
pub const ROLE_SUBSCRIBER: &str = "SUBSCRIBER";

/// Literal line that closes a connection from either role
pub const TERMINATE_LINE: &str = "terminate";

/// Separator substituted for whitespace runs inside topic names
pub const TOPIC_SEPARATOR: char = '_';

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;
