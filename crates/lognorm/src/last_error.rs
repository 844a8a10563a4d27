use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Maximum number of message bytes retained by [`LastError`].
pub const LAST_ERROR_CAPACITY: usize = 511;

/// Per-context slot for the most recent engine error message.
///
/// The engine reports failures out of band through a callback. Each context
/// hands a clone of its own slot to its engine, so two contexts never observe
/// each other's messages. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct LastError {
    slot: Arc<Mutex<String>>,
}

impl LastError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored message with `message`, truncated to
    /// [`LAST_ERROR_CAPACITY`] bytes.
    pub fn record(&self, message: &[u8]) {
        let decoded = String::from_utf8_lossy(message);
        let mut end = decoded.len().min(LAST_ERROR_CAPACITY);
        while !decoded.is_char_boundary(end) {
            end -= 1;
        }
        let mut slot = self.lock();
        slot.clear();
        slot.push_str(&decoded[..end]);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// The pending message, or `None` when nothing was recorded since the last clear.
    pub fn message(&self) -> Option<String> {
        let slot = self.lock();
        if slot.is_empty() {
            None
        } else {
            Some(slot.clone())
        }
    }

    // Called from the engine callback; must not panic.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
