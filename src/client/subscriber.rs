//! Subscribing client
//!
//! Connects, performs the role/topic handshake, then hands incoming server
//! lines (welcome notice, topic list, pushed broadcasts) to the caller over
//! an event channel driven by a background reader task.

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use super::config::ClientConfig;
use crate::error::{HandshakeError, Result};
use crate::protocol::constants::TERMINATE_LINE;
use crate::protocol::{read_line, Role, TopicName};

/// Events from a subscriber connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberEvent {
    /// A line pushed by the server (welcome, topic list, or broadcast)
    Message(String),

    /// The server closed the connection
    Disconnected,
}

/// Client-side subscriber connection
///
/// # Example
/// ```no_run
/// use linecast_rs::client::{ClientConfig, Subscriber, SubscriberEvent};
///
/// # async fn example() -> linecast_rs::Result<()> {
/// let config = ClientConfig::new("127.0.0.1:7878".parse().unwrap(), "sports");
/// let (subscriber, mut events) = Subscriber::connect(config).await?;
///
/// while let Some(event) = events.recv().await {
///     match event {
///         SubscriberEvent::Message(line) => println!("{line}"),
///         SubscriberEvent::Disconnected => break,
///     }
/// }
/// # drop(subscriber);
/// # Ok(())
/// # }
/// ```
pub struct Subscriber {
    writer: OwnedWriteHalf,
    topic: TopicName,
}

impl Subscriber {
    /// Connect and complete the handshake as a subscriber
    ///
    /// Returns the subscriber handle and the receiving end of its event
    /// channel. The channel yields every server line in arrival order and a
    /// final [`SubscriberEvent::Disconnected`] when the stream ends.
    pub async fn connect(config: ClientConfig) -> Result<(Self, mpsc::Receiver<SubscriberEvent>)> {
        let topic = TopicName::normalize(&config.topic).ok_or(HandshakeError::EmptyTopic)?;
        let stream = TcpStream::connect(config.server_addr).await?;
        let (read_half, mut writer) = stream.into_split();

        for line in [Role::Subscriber.as_str(), topic.as_str()] {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                match read_line(&mut reader).await {
                    Ok(Some(line)) => {
                        if tx.send(SubscriberEvent::Message(line)).await.is_err() {
                            // Receiver dropped; stop reading.
                            break;
                        }
                    }
                    Ok(None) | Err(_) => {
                        let _ = tx.send(SubscriberEvent::Disconnected).await;
                        break;
                    }
                }
            }
        });

        tracing::debug!(topic = %topic, "Subscriber connected");
        Ok((Self { writer, topic }, rx))
    }

    /// Topic this subscriber listens on
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }

    /// Send the terminate line and close the connection
    pub async fn terminate(mut self) -> Result<()> {
        self.writer.write_all(TERMINATE_LINE.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }
}
