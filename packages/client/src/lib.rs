//! Headless CLI client for the sokudo typing-race server.
//!
//! Connects to the server over WebSocket, sends slash commands from stdin
//! and prints the events the room broadcasts. Used for manual testing and
//! by the process-based integration tests.

mod error;
mod runner;
mod session;

pub use error::ClientError;
pub use runner::run_client;
