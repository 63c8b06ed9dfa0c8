//! Broadcast server listener
//!
//! Handles the TCP accept loop, spawns one handler task per connection, and
//! orchestrates graceful shutdown: stop accepting, signal every session,
//! drain handler tasks up to a grace period, then abort stragglers.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::registry::TopicRegistry;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::session::SessionId;

/// Topic pub/sub broadcast server
pub struct BroadcastServer {
    config: ServerConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    registry: Arc<TopicRegistry>,
    dispatcher: Arc<Dispatcher>,
    next_session_id: AtomicU64,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl BroadcastServer {
    /// Bind the listening socket
    ///
    /// Binding is the only startup step that can fail; everything after it
    /// recovers per-session.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let local_addr = listener.local_addr()?;

        let registry = Arc::new(TopicRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry)));

        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        tracing::info!(addr = %local_addr, "Broadcast server listening");

        Ok(Self {
            config,
            listener,
            local_addr,
            registry,
            dispatcher,
            next_session_id: AtomicU64::new(1),
            connection_semaphore,
        })
    }

    /// The bound address (useful after binding port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared handle to the topic registry
    pub fn registry(&self) -> Arc<TopicRegistry> {
        Arc::clone(&self.registry)
    }

    /// Run the server until the process ends
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run the server with graceful shutdown
    ///
    /// When `shutdown` resolves: the accept loop stops, every session is
    /// signaled and disconnected, and handler tasks are awaited up to the
    /// configured grace period before being aborted. The shutdown future may
    /// be driven from any task (e.g. a signal handler).
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut handlers = JoinSet::new();

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&mut handlers, &shutdown_rx) => result,
        };

        self.stop_sessions(&shutdown_tx, &mut handlers).await;
        result
    }

    async fn accept_loop(
        &self,
        handlers: &mut JoinSet<()>,
        shutdown_rx: &watch::Receiver<bool>,
    ) -> Result<()> {
        loop {
            // Reap finished handler tasks so the set doesn't grow unbounded.
            while handlers.try_join_next().is_some() {}

            match self.listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr, handlers, shutdown_rx.clone());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(
        &self,
        socket: TcpStream,
        peer_addr: SocketAddr,
        handlers: &mut JoinSet<()>,
        shutdown_rx: watch::Receiver<bool>,
    ) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        let id = SessionId::new(self.next_session_id.fetch_add(1, Ordering::Relaxed));

        tracing::debug!(session_id = %id, peer = %peer_addr, "New connection");

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::debug!(session_id = %id, error = %e, "Failed to set TCP_NODELAY");
            }
        }

        let config = self.config.clone();
        let registry = Arc::clone(&self.registry);
        let dispatcher = Arc::clone(&self.dispatcher);

        handlers.spawn(async move {
            let _permit = permit;
            let mut connection =
                Connection::new(id, socket, peer_addr, config, registry, dispatcher, shutdown_rx);

            if let Err(e) = connection.run().await {
                tracing::debug!(session_id = %id, error = %e, "Connection error");
            }

            tracing::debug!(session_id = %id, "Connection closed");
        });
    }

    /// Disconnect every session and drain handler tasks
    async fn stop_sessions(&self, shutdown_tx: &watch::Sender<bool>, handlers: &mut JoinSet<()>) {
        let _ = shutdown_tx.send(true);

        // Retire every tracked session up front; handlers that raced past
        // the signal find their session already retired and skip cleanup.
        let sessions = self.registry.drain_sessions().await;
        for session in &sessions {
            if session.retire() {
                session.close_outbound().await;
            }
        }

        let grace = self.config.shutdown_grace;
        let drain = async {
            while handlers.join_next().await.is_some() {}
        };
        if tokio::time::timeout(grace, drain).await.is_err() {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Grace period elapsed, aborting remaining handlers"
            );
            handlers.abort_all();
            while handlers.join_next().await.is_some() {}
        }

        tracing::info!("Server stopped");
    }
}
