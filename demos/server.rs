//! Broadcast server demo
//!
//! Run with: cargo run --example server [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example server                    # binds to 0.0.0.0:7878
//!   cargo run --example server 7000               # binds to 0.0.0.0:7000
//!   cargo run --example server 127.0.0.1:7000     # binds to 127.0.0.1:7000
//!
//! Connect with the publisher/subscriber demos, or by hand:
//!   nc localhost 7878
//!   SUBSCRIBER
//!   sports
//!
//! Stop with Ctrl-C; connected sessions are disconnected gracefully.

use std::net::SocketAddr;

use linecast_rs::protocol::constants::DEFAULT_PORT;
use linecast_rs::{BroadcastServer, ServerConfig};

fn parse_bind_addr(arg: &str) -> Option<SocketAddr> {
    if let Ok(port) = arg.parse::<u16>() {
        return Some(SocketAddr::from(([0, 0, 0, 0], port)));
    }
    arg.parse().ok()
}

fn usage() -> ! {
    eprintln!("Usage: server [BIND_ADDR|PORT]");
    eprintln!("Examples:");
    eprintln!("  server");
    eprintln!("  server 7000");
    eprintln!("  server 127.0.0.1:7000");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> linecast_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let bind_addr = match args.len() {
        1 => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        2 => parse_bind_addr(&args[1]).unwrap_or_else(|| usage()),
        _ => usage(),
    };

    let server = BroadcastServer::bind(ServerConfig::with_addr(bind_addr)).await?;
    println!("Pub-sub broadcast server started on {}", server.local_addr());

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
