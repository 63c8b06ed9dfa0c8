//! Wire protocol for the line-oriented pub/sub exchange
//!
//! The protocol is one UTF-8 text line per logical message:
//!
//! ```text
//! Client                                   Server
//!   |                                        |
//!   |------- PUBLISHER | SUBSCRIBER -------->|   (role, case-insensitive)
//!   |------- <topic> ----------------------->|   (normalized server-side)
//!   |                                        |
//!   |          [Handshake Complete]          |
//!   |                                        |
//!   |------- <payload> --------------------->|   (publisher only)
//!   |<------ [TOPIC:T] [PUBLISHER a:p]: ... -|   (subscriber only)
//!   |------- terminate --------------------->|   (either role, closes)
//! ```
//!
//! Topics are normalized (trimmed, whitespace runs collapsed to `_`,
//! uppercased) so `sports`, `SPORTS` and `Sports` name the same broadcast
//! domain.

pub mod constants;
pub mod handshake;
pub mod message;
pub mod transport;

pub use handshake::{Role, TopicName};
pub use message::BroadcastMessage;
pub use transport::{read_line, LineSink, StreamLineSink};
