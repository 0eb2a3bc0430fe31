//! # pulse-core
//!
//! Domain vocabulary shared by the pulse server and daemon.
//!
//! - [`payload`]: the constant text payload sent on every outbound tick
//! - [`outcome`]: send/receive results for the two per-connection loops,
//!   represented by value so graceful closure is distinguished from failure
//! - [`sink`]: where inbound messages are emitted (stdout in production,
//!   an in-memory recorder in tests)

#![deny(unsafe_code)]

pub mod outcome;
pub mod payload;
pub mod sink;
