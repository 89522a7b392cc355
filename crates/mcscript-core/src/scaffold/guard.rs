//! Interrupt shielding for the write phase
//!
//! Once the project directory is being written a run must end in `Done` or
//! in a rollback. A Ctrl+C handler checks an [`InterruptGuard`] and leaves
//! the process alone while it is active.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag shared between the scaffolder and a signal handler
#[derive(Debug, Clone, Default)]
pub struct InterruptGuard {
    active: Arc<AtomicBool>,
}

impl InterruptGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an interrupt must be ignored right now
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned section is dropped
    pub(crate) fn enter(&self) -> ShieldedSection {
        self.active.store(true, Ordering::SeqCst);
        ShieldedSection {
            active: Arc::clone(&self.active),
        }
    }
}

/// Lowers the guard's flag on drop
pub(crate) struct ShieldedSection {
    active: Arc<AtomicBool>,
}

impl Drop for ShieldedSection {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
