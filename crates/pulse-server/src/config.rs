//! Server configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the pulse server.
///
/// The daemon always runs on the defaults; the fields exist so embedders
/// and tests can bind an ephemeral port or shorten the tick cadence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `8765`; `0` auto-assigns, for tests).
    pub port: u16,
    /// Outbound tick interval in milliseconds (default `500`).
    pub tick_interval_ms: u64,
}

impl ServerConfig {
    /// The address string passed to the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Outbound tick interval, clamped to at least 1 ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8765,
            tick_interval_ms: 500,
        }
    }
}
