//! Self-ping keeping free-tier hosting from idling the dyno out.

use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const STARTUP_DELAY: Duration = Duration::from_secs(2 * 60);
const PING_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Spawn the keep-alive loop against the server's own public URL.
pub fn spawn(server_url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = Client::new();
        let url = format!("{}/api/keep-alive", server_url.trim_end_matches('/'));

        tokio::time::sleep(STARTUP_DELAY).await;

        let mut ticker = tokio::time::interval(PING_INTERVAL);

        loop {
            ticker.tick().await;

            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("self-ping ok");
                }
                Ok(response) => {
                    warn!("self-ping returned {}", response.status());
                }
                Err(ping_error) => {
                    warn!("self-ping failed: {ping_error}");
                }
            }
        }
    })
}
