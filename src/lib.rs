//! Topic-partitioned line-oriented pub/sub broadcast server and client.
//!
//! Clients connect over TCP, declare a role (`PUBLISHER` or `SUBSCRIBER`)
//! and a topic in a two-line handshake, and the server relays every line a
//! publisher sends to all subscribers currently registered on the same
//! topic. Topics are independent broadcast domains; a subscriber of one
//! topic never observes another topic's traffic.
//!
//! # Server
//!
//! ```no_run
//! use linecast_rs::{BroadcastServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> linecast_rs::Result<()> {
//!     let config = ServerConfig::with_addr("0.0.0.0:7878".parse().unwrap());
//!     let server = BroadcastServer::bind(config).await?;
//!     server.run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! # Clients
//!
//! ```no_run
//! use linecast_rs::client::{ClientConfig, Publisher, Subscriber, SubscriberEvent};
//!
//! # async fn example() -> linecast_rs::Result<()> {
//! let addr = "127.0.0.1:7878".parse().unwrap();
//!
//! let (sub, mut events) = Subscriber::connect(ClientConfig::new(addr, "sports")).await?;
//! let mut publisher = Publisher::connect(ClientConfig::new(addr, "sports")).await?;
//!
//! publisher.publish("goal!").await?;
//! while let Some(SubscriberEvent::Message(line)) = events.recv().await {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use protocol::{BroadcastMessage, Role, TopicName};
pub use registry::TopicRegistry;
pub use server::{BroadcastServer, ServerConfig};
pub use session::{Session, SessionId, SessionPhase};
