//! Publisher client demo
//!
//! Run with: cargo run --example publisher <SERVER_ADDR> <TOPIC>
//!
//! Examples:
//!   cargo run --example publisher 127.0.0.1:7878 SPORTS
//!   cargo run --example publisher 192.168.10.2:7000 "local news"
//!
//! Every line typed on stdin is broadcast to the subscribers of the topic.
//! Type `terminate` (or close stdin) to exit.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, BufReader};

use linecast_rs::client::{ClientConfig, Publisher};
use linecast_rs::protocol::constants::TERMINATE_LINE;

fn usage() -> ! {
    eprintln!("Usage: publisher <SERVER_ADDR> <TOPIC>");
    eprintln!("Example: publisher 127.0.0.1:7878 SPORTS");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> linecast_rs::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        usage();
    }
    let server_addr: SocketAddr = args[1].parse().unwrap_or_else(|_| usage());

    let mut publisher = Publisher::connect(ClientConfig::new(server_addr, &args[2])).await?;
    println!("Publishing to topic {} on {}", publisher.topic(), server_addr);
    println!("Type messages to broadcast; '{}' to exit.", TERMINATE_LINE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line == TERMINATE_LINE {
            break;
        }
        publisher.publish(&line).await?;
    }

    publisher.terminate().await?;
    println!("Disconnected.");
    Ok(())
}
