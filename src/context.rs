//! Cancellable execution context passed through command dispatch

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation signal shared by everything spawned from one execution
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    cancelled: Arc<AtomicBool>,
}

impl ExecutionContext {
    /// Fresh, uncancelled root context
    #[must_use]
    #[inline]
    pub fn background() -> Self {
        Self::default()
    }

    /// Request cancellation
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_not_cancelled() {
        assert!(!ExecutionContext::background().is_cancelled());
    }

    #[test]
    fn test_cancel_is_seen_by_clones() {
        let ctx = ExecutionContext::background();
        let child = ctx.clone();
        ctx.cancel();
        assert!(child.is_cancelled());
    }
}
