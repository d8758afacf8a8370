// SPDX-License-Identifier: MPL-2.0
//! Warning sinks.
//!
//! Every diagnostic the provider produces is handed to a [`LogSink`] as a
//! plain string. The sink decides where it goes; nothing in the resolution
//! flow depends on what the sink does with it.

use std::sync::Arc;

use parking_lot::Mutex;

use super::CircularBuffer;
use crate::domain::diagnostics::BufferCapacity;

/// Receiver of warning messages.
pub trait LogSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// Forwards warnings to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, message: &str) {
        tracing::warn!(target: "route_i18n", "{message}");
    }
}

/// Keeps the most recent warnings in memory.
///
/// Useful as a test double, or for surfacing configuration warnings in a
/// developer overlay. The oldest message is dropped once the buffer is full.
#[derive(Debug)]
pub struct RecordingSink {
    messages: Mutex<CircularBuffer<String>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            messages: Mutex::new(CircularBuffer::new(capacity)),
        }
    }

    /// Returns recorded messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().iter().cloned().collect()
    }

    /// Counts recorded messages equal to `message`.
    #[must_use]
    pub fn count(&self, message: &str) -> usize {
        self.messages.lock().iter().filter(|m| *m == message).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Forwards every warning to each of its sinks, in insertion order.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for FanoutSink {
    fn emit(&self, message: &str) {
        for sink in &self.sinks {
            sink.emit(message);
        }
    }
}

impl std::fmt::Debug for FanoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
