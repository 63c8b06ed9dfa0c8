//! Subscriber client demo
//!
//! Run with: cargo run --example subscriber <SERVER_ADDR> <TOPIC>
//!
//! Examples:
//!   cargo run --example subscriber 127.0.0.1:7878 SPORTS
//!   cargo run --example subscriber 192.168.10.2:7000 WEATHER
//!
//! Prints every line the server pushes for the topic. Ctrl-C to exit.

use std::net::SocketAddr;

use linecast_rs::client::{ClientConfig, Subscriber, SubscriberEvent};

fn usage() -> ! {
    eprintln!("Usage: subscriber <SERVER_ADDR> <TOPIC>");
    eprintln!("Example: subscriber 127.0.0.1:7878 SPORTS");
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

    let (subscriber, mut events) = Subscriber::connect(ClientConfig::new(server_addr, &args[2])).await?;
    println!("Listening on topic {} from {}", subscriber.topic(), server_addr);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Some(SubscriberEvent::Message(line)) => println!("{line}"),
                Some(SubscriberEvent::Disconnected) | None => {
                    println!("Server closed the connection.");
                    return Ok(());
                }
            }
        }
    }

    subscriber.terminate().await?;
    println!("Disconnected.");
    Ok(())
}
