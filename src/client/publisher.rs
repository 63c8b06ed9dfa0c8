//! Publishing client
//!
//! Connects, performs the role/topic handshake, then sends one payload line
//! per broadcast. The server relays each line to the subscribers of the
//! topic at that moment.

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::config::ClientConfig;
use crate::error::{HandshakeError, Result};
use crate::protocol::constants::TERMINATE_LINE;
use crate::protocol::{Role, TopicName};

/// Client-side publisher connection
///
/// # Example
/// ```no_run
/// use linecast_rs::client::{ClientConfig, Publisher};
///
/// # async fn example() -> linecast_rs::Result<()> {
/// let config = ClientConfig::new("127.0.0.1:7878".parse().unwrap(), "sports");
/// let mut publisher = Publisher::connect(config).await?;
/// publisher.publish("goal!").await?;
/// publisher.terminate().await?;
/// # Ok(())
/// # }
/// ```
pub struct Publisher {
    stream: TcpStream,
    topic: TopicName,
}

impl Publisher {
    /// Connect and complete the handshake as a publisher
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let topic = TopicName::normalize(&config.topic).ok_or(HandshakeError::EmptyTopic)?;
        let stream = TcpStream::connect(config.server_addr).await?;

        let mut publisher = Self { stream, topic };
        publisher.send(Role::Publisher.as_str()).await?;
        let topic_line = publisher.topic.to_string();
        publisher.send(&topic_line).await?;

        tracing::debug!(topic = %publisher.topic, "Publisher connected");
        Ok(publisher)
    }

    /// Topic this publisher broadcasts on
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }

    /// Broadcast one payload line
    pub async fn publish(&mut self, payload: &str) -> Result<()> {
        self.send(payload).await
    }

    /// Send the terminate line and close the connection
    pub async fn terminate(mut self) -> Result<()> {
        self.send(TERMINATE_LINE).await?;
        self.stream.shutdown().await?;
        Ok(())
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\n").await?;
        self.stream.flush().await?;
        Ok(())
    }
}
