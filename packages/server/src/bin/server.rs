//! Tavern chat and dice coordinator.
//!
//! Run with:
//! ```not_rust
//! TAVERN_JWT_SECRET=change-me cargo run --bin tavern-server -- --port 8000
//! ```

use clap::Parser;
use tavern_server::ServerConfig;
use tavern_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = tavern_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
