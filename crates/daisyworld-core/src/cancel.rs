//! External cancellation for simulation runs.
//!
//! A [`CancelSignal`] is a cheap, cloneable handle around a shared atomic
//! flag. The runner checks it once per tick boundary; any clone (a signal
//! handler, another task, a test) can raise it without locks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag checked by the runner between ticks.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    /// Whether a stop has been requested.
    stop_requested: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a clean stop at the next tick boundary.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_starts_clear() {
        assert!(!CancelSignal::new().is_stop_requested());
    }

    #[test]
    fn clones_share_the_flag() {
        let signal = CancelSignal::new();
        let handle = signal.clone();
        handle.request_stop();
        assert!(signal.is_stop_requested());
    }

    #[test]
    fn signal_is_visible_across_threads() {
        let signal = CancelSignal::new();
        let handle = signal.clone();
        let joined = std::thread::spawn(move || handle.request_stop()).join();
        assert!(joined.is_ok());
        assert!(signal.is_stop_requested());
    }
}
