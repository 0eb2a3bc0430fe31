//! Per-frame outcomes for the two connection loops.
//!
//! Both loops distinguish exactly two terminal conditions: graceful
//! closure (silent exit) and everything else (an error that ends that
//! connection's handling). These enums carry the graceful cases by value;
//! the error cases travel separately as `ConnectionError` in
//! `pulse-server`.

/// Outcome of one receive attempt on the inbound loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecvOutcome {
    /// A text frame to emit, unmodified.
    Text(String),
    /// A non-text frame (binary, ping, pong). Skipped with a debug log.
    Ignored,
    /// The peer completed the closing handshake or the stream ended.
    Closed,
}

/// Outcome of one send attempt on the outbound loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was handed to the transport.
    Sent,
    /// The connection closed cleanly before or during the send.
    Closed,
}

/// Terminal state of the outbound loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickExit {
    /// The connection closed cleanly.
    Closed,
    /// Server shutdown cancelled the loop.
    Cancelled,
}
