//! Per-connection handler
//!
//! Each accepted connection runs one `Connection` on its own task: the
//! two-line handshake, registration, then either the publisher relay loop or
//! the subscriber listen loop. Errors here terminate only this session; the
//! listener logs them at debug and the server keeps running.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::dispatch::Dispatcher;
use crate::error::{Error, HandshakeError, Result};
use crate::protocol::constants::TERMINATE_LINE;
use crate::protocol::{read_line, Role, StreamLineSink, TopicName};
use crate::registry::TopicRegistry;
use crate::server::config::ServerConfig;
use crate::session::{Session, SessionId, SessionPhase};

/// Handler for one accepted connection
pub(crate) struct Connection {
    session: Arc<Session>,
    reader: BufReader<OwnedReadHalf>,
    registry: Arc<TopicRegistry>,
    dispatcher: Arc<Dispatcher>,
    config: ServerConfig,
    shutdown: watch::Receiver<bool>,
    phase: SessionPhase,
}

impl Connection {
    pub(crate) fn new(
        id: SessionId,
        socket: TcpStream,
        peer_addr: SocketAddr,
        config: ServerConfig,
        registry: Arc<TopicRegistry>,
        dispatcher: Arc<Dispatcher>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let (read_half, write_half) = socket.into_split();
        let sink = Arc::new(StreamLineSink::new(write_half));
        let session = Arc::new(Session::new(id, peer_addr, sink));

        Self {
            session,
            reader: BufReader::new(read_half),
            registry,
            dispatcher,
            config,
            shutdown,
            phase: SessionPhase::new(),
        }
    }

    /// Run the session to completion
    ///
    /// Cleanup is unconditional: whatever path ends the session (terminate
    /// line, handshake rejection, I/O error, server shutdown), it runs at
    /// most once, guarded by `Session::retire`.
    pub(crate) async fn run(&mut self) -> Result<()> {
        self.registry.track(&self.session).await;
        let result = self.drive().await;
        self.finalize().await;
        result
    }

    async fn drive(&mut self) -> Result<()> {
        self.phase.begin_handshake();
        let (role, topic) = self.handshake().await?;
        self.session.set_role(role);
        self.session.set_topic(topic.clone());

        match role {
            Role::Publisher => self.registry.register_publisher(&self.session).await,
            Role::Subscriber => {
                self.registry.register_subscriber(&self.session).await;
                self.send_welcome(&topic).await?;
            }
        }
        self.phase.activate(role);
        tracing::info!(
            session_id = %self.session.id(),
            peer = %self.session.peer_addr(),
            role = %role,
            topic = %topic,
            "Session active"
        );

        self.active_loop(role, &topic).await
    }

    /// Two-phase handshake: one role line, one topic line
    async fn handshake(&mut self) -> Result<(Role, TopicName)> {
        let deadline = self.config.handshake_timeout;

        let role_line = timeout(deadline, read_line(&mut self.reader))
            .await
            .map_err(|_| HandshakeError::TimedOut)??
            .ok_or(HandshakeError::MissingRole)?;
        let role = Role::parse(&role_line).ok_or(HandshakeError::InvalidRole(role_line))?;
        self.phase.role_received();

        let topic_line = timeout(deadline, read_line(&mut self.reader))
            .await
            .map_err(|_| HandshakeError::TimedOut)??
            .ok_or(HandshakeError::MissingTopic)?;
        let topic = TopicName::normalize(&topic_line).ok_or(HandshakeError::EmptyTopic)?;

        Ok((role, topic))
    }

    async fn send_welcome(&mut self, topic: &TopicName) -> Result<()> {
        let welcome = format!("Welcome! You are now subscribed to topic: {}", topic);
        self.push_line(welcome.as_bytes()).await?;

        let topics = self.registry.available_topics().await;
        if topics.len() > 1 {
            let list = topics
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            self.push_line(format!("Available topics: {}", list).as_bytes())
                .await?;
        }
        Ok(())
    }

    async fn push_line(&self, line: &[u8]) -> Result<()> {
        if self.session.send_line(line).await {
            Ok(())
        } else {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "peer unreachable",
            )))
        }
    }

    async fn active_loop(&mut self, role: Role, topic: &TopicName) -> Result<()> {
        loop {
            let line = tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::debug!(session_id = %self.session.id(), "Server shutdown, closing session");
                    return Ok(());
                }
                line = read_line(&mut self.reader) => line?,
            };

            let Some(line) = line else {
                // Peer closed the stream.
                return Ok(());
            };

            if line == TERMINATE_LINE {
                tracing::info!(
                    session_id = %self.session.id(),
                    role = %role,
                    topic = %topic,
                    "Peer requested termination"
                );
                return Ok(());
            }

            match role {
                Role::Publisher => {
                    self.dispatcher
                        .publish(topic, &line, self.session.peer_addr())
                        .await;
                }
                Role::Subscriber => {
                    // Subscribers only listen; anything but the terminate
                    // line is acknowledged silently.
                    tracing::trace!(session_id = %self.session.id(), "Ignoring subscriber input");
                }
            }
        }
    }

    async fn finalize(&mut self) {
        self.phase.terminate();
        if self.session.retire() {
            self.registry.remove_client(&self.session).await;
            self.session.close_outbound().await;
            tracing::debug!(
                session_id = %self.session.id(),
                peer = %self.session.peer_addr(),
                "Session closed"
            );
        }
    }
}
