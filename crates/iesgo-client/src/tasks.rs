//! Delayed work owned by the session.
//!
//! Scripted replies and openers run as tokio tasks held in a [`JoinSet`], so
//! logout can abort whatever is still pending instead of letting timers
//! outlive the session.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

#[derive(Default)]
pub struct TaskScheduler {
    set: JoinSet<()>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`. Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        self.set.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }

    /// Abort every pending task. Returns how many were still tracked.
    pub fn cancel_all(&mut self) -> usize {
        self.reap();
        let pending = self.set.len();
        // dropping a JoinSet aborts its tasks
        drop(std::mem::take(&mut self.set));
        if pending > 0 {
            debug!(pending, "cancelled scheduled tasks");
        }
        pending
    }

    /// Tasks not yet observed as finished.
    pub fn pending(&mut self) -> usize {
        self.reap();
        self.set.len()
    }

    fn reap(&mut self) {
        while let Some(result) = self.set.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "scheduled task panicked");
                }
            }
        }
    }
}
