//! Client configuration

use std::net::SocketAddr;

/// Configuration for a client connection
///
/// The role is implied by whether [`Publisher`](super::Publisher) or
/// [`Subscriber`](super::Subscriber) connects with it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address
    pub server_addr: SocketAddr,

    /// Raw topic to register under; the server normalizes it
    pub topic: String,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(server_addr: SocketAddr, topic: impl Into<String>) -> Self {
        Self {
            server_addr,
            topic: topic.into(),
        }
    }

    /// Set the topic
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let addr: SocketAddr = "127.0.0.1:7878".parse().unwrap();
        let config = ClientConfig::new(addr, "sports").topic("news");

        assert_eq!(config.server_addr, addr);
        assert_eq!(config.topic, "news");
    }
}
