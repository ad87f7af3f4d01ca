//! Client execution logic with reconnection support.

use std::time::Duration;

use super::session::{SessionEnd, run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 3;

/// Run the WebSocket client with reconnection logic
///
/// The transport is retried on a fixed 3-second delay up to 5 attempts;
/// after that the client gives up and surfaces the connectivity failure.
/// A fresh connection is a brand-new player to the server, so the user
/// has to create or join a room again after a reconnect.
pub async fn run_client(
    url: String,
    player_name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            player_name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &player_name).await {
            Ok(SessionEnd::UserExit) => {
                tracing::info!("Client session ended normally");
                // If the session ended normally (user exit), don't reconnect
                break;
            }
            Ok(SessionEnd::ConnectionClosed) => {
                tracing::warn!("Connection closed by the server");
                reconnect_count += 1;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;
            }
        }

        if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                MAX_RECONNECT_ATTEMPTS
            );
            std::process::exit(1);
        }

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }

    Ok(())
}
