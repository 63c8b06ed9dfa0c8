//! Line-protocol client implementation
//!
//! Provides client-side connections for:
//! - Publishing lines to a topic
//! - Subscribing to a topic and receiving pushed broadcasts

pub mod config;
pub mod publisher;
pub mod subscriber;

pub use config::ClientConfig;
pub use publisher::Publisher;
pub use subscriber::{Subscriber, SubscriberEvent};
