//! Remote logging example
//!
//! Starts a tiny collector on localhost, streams records to it, then stops
//! the collector to show the fallback to stdout and the reconnect.
//!
//! Run with: cargo run --example remote_logging

use rust_remote_logger::prelude::*;
use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

fn spawn_collector(listener: TcpListener, connections: usize) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for stream in listener.incoming().take(connections).flatten() {
            for line in BufReader::new(stream).lines().map_while(|line| line.ok()) {
                println!("   [collector] {}", line);
                if line.contains("hang up") {
                    break;
                }
            }
        }
    })
}

fn main() -> Result<()> {
    println!("=== Rust Remote Logger - Remote Logging Example ===\n");

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let address = listener.local_addr()?.to_string();
    let collector = spawn_collector(listener.try_clone()?, 2);

    let logger = Logger::builder("AppName")
        .address(address.as_str())
        .flags(LogFlags::TIMESTAMP)
        .connect_timeout(Duration::from_secs(1))
        .write_timeout(Duration::from_secs(1))
        .build()?;
    logger.add_field("pid", std::process::id());

    println!("1. Streaming to {}:", address);
    logger.info("Connected to collector");
    logger.warn("Collector will hang up");
    thread::sleep(Duration::from_millis(200));

    println!("\n2. Collector dropped the connection, the next record redials:");
    logger.info("Written after a reconnect");
    logger.warn("Collector shutting down, hang up");
    collector.join().ok();
    drop(listener);
    thread::sleep(Duration::from_millis(200));

    println!("\n3. Collector gone, records fall back to stdout:");
    logger.error("Collector unreachable, writing locally");

    let metrics = logger.sink().metrics();
    println!(
        "\n   dials={} reconnects={} failed_reconnects={} remote_writes={} local_writes={}",
        metrics.dial_attempts(),
        metrics.reconnects(),
        metrics.failed_reconnects(),
        metrics.remote_writes(),
        metrics.local_writes()
    );

    println!("\n=== Example completed successfully ===");
    Ok(())
}
