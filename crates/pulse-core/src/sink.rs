//! Inbound message emission.
//!
//! The server's contract is line-oriented standard output: every inbound
//! text frame appears exactly once, unmodified, one line per message.
//! [`MessageSink`] is the seam between the inbound loop and that output;
//! tests swap in [`MemorySink`] to observe emissions without capturing
//! the process's stdout.

use std::sync::{Mutex, PoisonError};

/// Where the inbound loop emits received text messages.
pub trait MessageSink: Send + Sync {
    /// Emit one received message.
    fn emit(&self, text: &str);
}

/// Emits each message to standard output, one line per message.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn emit(&self, text: &str) {
        println!("{text}");
    }
}

/// Records emitted messages in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of messages emitted so far.
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for MemorySink {
    fn emit(&self, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
    }
}
