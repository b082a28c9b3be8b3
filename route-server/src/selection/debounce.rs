//! Single-slot delayed task.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one task at a time, each after a fixed delay.
///
/// Scheduling aborts whatever occupies the slot, whether it is still
/// waiting out the delay or already running. Dropping the debouncer aborts
/// it too.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// A zero delay runs tasks immediately.
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.slot = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }

    /// Whether a task is waiting or running.
    pub fn is_active(&self) -> bool {
        self.slot.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
