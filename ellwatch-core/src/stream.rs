use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Owner of a background polling task.
///
/// `stop` requests a graceful shutdown and waits for the loop to finish its
/// current cycle. Dropping the handle signals stop and aborts the task if it
/// is still running.
#[derive(Debug)]
pub struct PollHandle {
    inner: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl PollHandle {
    /// Wrap a spawned loop and the sender half of its stop channel.
    #[must_use]
    pub const fn new(inner: JoinHandle<()>, stop_tx: oneshot::Sender<()>) -> Self {
        Self {
            inner: Some(inner),
            stop_tx: Some(stop_tx),
        }
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.inner.take() {
            let _ = h.await;
        }
    }

    /// Abort the loop immediately, possibly mid-cycle.
    pub fn abort(mut self) {
        if let Some(h) = self.inner.take() {
            h.abort();
        }
    }

    /// Return `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.inner.take()
            && !h.is_finished()
        {
            h.abort();
        }
    }
}
