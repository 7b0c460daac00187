//! Timer-based coalescing for change notification
//!
//! The last call within the debounce window wins; earlier pending callbacks
//! in the same window are cancelled. This only delays when the recomputation
//! fires, it never introduces concurrent access: the callback runs on the
//! same runtime as everything else.

use std::time::Duration;
use tokio::task::JoinHandle;

/// Last-write-wins debouncer
///
/// Each `call` cancels any pending callback and schedules the new one to run
/// after the configured window. Dropping the debouncer cancels a pending
/// callback.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedule `callback` to run after the window, cancelling any
    /// previously scheduled callback that has not yet fired
    pub fn call<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            callback();
        }));
    }

    /// Cancel a pending callback without scheduling a new one
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
