//! # pulse-server
//!
//! `WebSocket` listener and per-connection loops.
//!
//! - Listener: raw `tokio-tungstenite` upgrade on every accepted TCP stream
//!   (no HTTP routing — every connection is handled identically)
//! - Per connection: an inbound loop emitting each text frame to the
//!   configured sink, and an outbound ticker streaming the constant `[]`
//!   payload on a fixed cadence
//! - Graceful shutdown via `CancellationToken`
//!
//! Connections are fully independent: no broadcast, no registry, no shared
//! state. One connection's failure never reaches the listener or its peers.

#![deny(unsafe_code)]

pub mod config;
pub mod connection;
pub mod errors;
pub mod server;
pub mod shutdown;
pub mod ticker;
