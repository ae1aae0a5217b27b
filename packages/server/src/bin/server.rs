//! Chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatroom-server -- --config config/config.toml
//! ```

use std::path::PathBuf;

use chatroom_server::Config;
use chatroom_shared::logger::setup_logger;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about = "WebSocket chat relay with SQLite history")]
struct Args {
    /// Path of the TOML config file; created with defaults if missing
    #[arg(short, long, default_value = "config/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = match Config::load_or_init(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    // Run the server
    if let Err(e) = chatroom_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
