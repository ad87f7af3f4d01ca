//! Headless CLI client for the sokudo typing-race server.
//!
//! Connects to a typing-race server and drives a room with slash commands
//! from stdin. Automatically reconnects on disconnection (max 5 attempts
//! with 3 second interval); a reconnected session is a brand-new player.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sokudo-client -- --name Alice
//! cargo run --bin sokudo-client -- -n Bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use sokudo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sokudo-client")]
#[command(about = "CLI client for the sokudo multiplayer typing race", long_about = None)]
struct Args {
    /// Display name used when creating or joining a room
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = sokudo_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
