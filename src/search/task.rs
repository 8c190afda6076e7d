//! Cancellable search tasks
//!
//! A [`SearchTask`] owns one debounced lookup: sleep, then request. It knows
//! whether the request has started so a superseding keystroke can choose
//! between aborting everything or only the pending timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a spawned debounce-then-search task
#[derive(Debug)]
pub struct SearchTask {
    generation: u64,
    started: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Marks the point where the debounce timer has elapsed
#[derive(Debug, Clone)]
pub struct StartFlag(Arc<AtomicBool>);

impl StartFlag {
    pub fn mark_started(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl SearchTask {
    /// Spawn `make(flag)` on the runtime
    ///
    /// The task body must call [`StartFlag::mark_started`] once its debounce
    /// timer has elapsed.
    pub fn spawn<F, Fut>(generation: u64, make: F) -> Self
    where
        F: FnOnce(StartFlag) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let started = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(make(StartFlag(Arc::clone(&started))));

        Self {
            generation,
            started,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the request has been issued
    pub fn in_flight(&self) -> bool {
        self.started.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Supersede this task
    ///
    /// A pending timer is always cancelled. An in-flight request is aborted
    /// only when `abort_in_flight` is set; otherwise it runs to completion and
    /// its result is dropped by the generation check. That task is detached:
    /// nothing holds its handle afterwards, so it can no longer be aborted.
    pub fn cancel(self, abort_in_flight: bool) {
        if self.handle.is_finished() {
            return;
        }

        if !self.started.load(Ordering::SeqCst) {
            debug!(generation = self.generation, "Cancelling pending debounce timer");
            self.handle.abort();
        } else if abort_in_flight {
            debug!(generation = self.generation, "Aborting in-flight search");
            self.handle.abort();
        } else {
            debug!(generation = self.generation, "Letting in-flight search finish");
        }
    }
}
