//! Cancellable repeating task used for auto-sync.
//!
//! # Invariants
//! - The first tick fires one full period after spawn, never immediately.
//! - Ticks run sequentially; a slow tick delays the next one.
//! - Cancellation stops future ticks but never interrupts a running one.

use log::debug;
use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a spawned periodic task. Dropping the handle stops the task.
pub struct AutoSyncTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl AutoSyncTask {
    /// Spawns `tick` every `period` on the current tokio runtime.
    ///
    /// The loop also ends when `tick` returns `ControlFlow::Break`.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {}
                }
                if tick().await.is_break() {
                    break;
                }
            }
            debug!("event=auto_sync_task module=sync status=stopped");
        });

        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Requests the loop to stop before its next tick.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoSyncTask {
    fn drop(&mut self) {
        self.stop();
    }
}
