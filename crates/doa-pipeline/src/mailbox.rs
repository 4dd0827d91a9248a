//! Single-slot producer -> processor handoff.
//!
//! An audio capture thread produces blocks faster or slower than the
//! pipeline consumes them; rather than an unbounded queue, a single slot
//! is kept. A producer that outruns the processor silently drops the
//! previously queued (stale) block rather than blocking or growing
//! memory. A processor that outruns the producer sees an empty slot and
//! does nothing that tick rather than blocking.

use std::sync::Mutex;

/// A single-slot mailbox: `send` drops the oldest pending value if the
/// slot is full, `recv` takes whatever is present or returns `None`.
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Mailbox<T> {
    /// An empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Place a value in the slot, overwriting (dropping) any value
    /// already there.
    pub fn send(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(value);
    }

    /// Take the value in the slot, if any, leaving it empty.
    pub fn recv(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}
