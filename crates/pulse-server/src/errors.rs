//! Error types for the listener and per-connection handling.
//!
//! The error taxonomy is deliberately small: a clean peer close is not an
//! error at all (it travels as `RecvOutcome::Closed` / `TickExit::Closed`),
//! so everything here is the "anything else" case that terminates one
//! connection's processing.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Listener startup failure.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The TCP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Failure of one connection's handling.
///
/// Never crosses to other connections or to the listener; the accept loop
/// logs it at error level and keeps serving.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The `WebSocket` upgrade handshake failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    /// A read or write failed for any reason other than a clean close
    /// (abrupt disconnect, protocol violation, transport failure).
    #[error("connection transport error: {0}")]
    Transport(#[source] tungstenite::Error),
}
