use std::future::Future;
use std::sync::Arc;

use ellwatch_core::PollHandle;
use tokio::time::MissedTickBehavior;

use crate::Dashboard;

impl Dashboard {
    /// Run cycles until `shutdown` resolves.
    ///
    /// The first cycle starts immediately, later ones every `poll_interval`.
    /// Cycles run one after another in the calling task, so they never
    /// overlap; a tick that elapses while a cycle is still running is skipped
    /// rather than queued. `shutdown` is observed between cycles, so a cycle
    /// in progress always finishes.
    ///
    /// Returns the number of cycles run by this call.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.cfg.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown = std::pin::pin!(shutdown);
        let mut ran = 0u64;

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let _report = self.run_cycle().await;
                    ran += 1;
                }
            }
        }

        tracing::info!(cycles = ran, "poll loop stopped");
        ran
    }

    /// Start the poll loop on a background task.
    ///
    /// Behavior:
    /// - `PollHandle::stop()` lets the current cycle finish, then ends the loop.
    /// - Dropping the handle signals stop and aborts the task if it is still
    ///   running.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(self: &Arc<Self>) -> PollHandle {
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let me = Arc::clone(self);
        let join = tokio::spawn(async move {
            // A dropped sender also ends the loop
            let _ = me
                .run_until(async move {
                    let _ = stop_rx.await;
                })
                .await;
        });
        PollHandle::new(join, stop_tx)
    }
}
