//! Basic logger usage example
//!
//! Demonstrates local logging with attached fields and different log levels.
//!
//! Run with: cargo run --example basic_usage

use rust_remote_logger::prelude::*;
use rust_remote_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Remote Logger - Basic Usage Example ===\n");

    // No address: records go to stdout
    let logger = init_logger("AppName", "debug", "", LogFlags::TIMESTAMP)?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Raising the threshold to 'warning':");
    logger.set_log_level("warning")?;
    logger.info("This info message is filtered");
    logger.warn("This warning is shown");

    println!("\n3. Unknown level names are rejected:");
    if let Err(e) = logger.set_log_level("verbose") {
        println!("   {} (level is still '{}')", e, logger.log_level_name());
    }

    println!("\n4. Attached fields:");
    logger.set_level(LogLevel::Debug);
    logger.add_field("service", "checkout");
    logger.add_fields([("region", "eu-west"), ("version", "1.4.2")]);
    logger.info("Fields ride along with every record");

    println!("\n5. Per-call context and formatting macros:");
    logger.log_with_context(
        LogLevel::Info,
        "Order placed",
        LogContext::new()
            .with_field("order_id", 1042)
            .with_field("amount", 59.90),
    );
    let attempts = 3;
    warn!(logger, "Payment gateway slow, attempt {} of {}", attempts, 5);
    info!(logger, "Done");

    println!("\n6. JSON output to stderr:");
    let json = Logger::builder("AppName")
        .flags(LogFlags::JSON | LogFlags::TIMESTAMP)
        .timestamp_format(TimestampFormat::Rfc3339)
        .local(LocalStream::Stderr)
        .build()?;
    json.add_field("user_id", 7);
    json.info("Structured record");

    logger.flush()?;
    println!("\n=== Example completed successfully ===");
    Ok(())
}
