//! `PulseServer` — listener and accept loop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use pulse_core::sink::MessageSink;

use crate::config::ServerConfig;
use crate::connection::serve_connection;
use crate::errors::ServerError;
use crate::shutdown::ShutdownCoordinator;

/// The pulse `WebSocket` server.
///
/// Accepts connections and hands each one to its own task pair (inbound
/// loop + outbound ticker). Keeps no registry of active connections; the
/// per-connection id exists only to correlate log lines.
pub struct PulseServer {
    config: ServerConfig,
    sink: Arc<dyn MessageSink>,
    shutdown: Arc<ShutdownCoordinator>,
}

impl PulseServer {
    /// Create a new server emitting inbound messages to `sink`.
    pub fn new(config: ServerConfig, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            config,
            sink,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Bind the listener and start the accept loop.
    ///
    /// Returns the bound address (`port: 0` in the config auto-assigns)
    /// and the accept-loop handle, which completes after
    /// [`ShutdownCoordinator::shutdown`] fires.
    pub async fn listen(&self) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;
        info!(addr = %local_addr, "listening");

        let sink = Arc::clone(&self.sink);
        let cancel = self.shutdown.token();
        let tick_interval = self.config.tick_interval();

        let handle = tokio::spawn(async move {
            let mut next_conn_id: u64 = 1;
            loop {
                tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, peer)) => {
                            let conn_id = next_conn_id;
                            next_conn_id += 1;
                            debug!(conn_id, peer = %peer, "accepted connection");
                            let sink = Arc::clone(&sink);
                            let cancel = cancel.clone();
                            drop(tokio::spawn(async move {
                                if let Err(e) = serve_connection(
                                    stream,
                                    peer,
                                    conn_id,
                                    tick_interval,
                                    sink,
                                    cancel,
                                )
                                .await
                                {
                                    error!(conn_id, peer = %peer, error = %e, "connection failed");
                                }
                            }));
                        }
                        Err(e) => warn!(error = %e, "failed to accept connection"),
                    },
                    () = cancel.cancelled() => {
                        info!("listener stopping");
                        break;
                    }
                }
            }
        });

        Ok((local_addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
