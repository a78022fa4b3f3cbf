/*!
 * Cooperative cancellation signal.
 *
 * A [`CancelSignal`] is cloned into every concurrently running item so
 * that in-flight poll waits can observe a Ctrl-C (or any caller-driven
 * cancellation) promptly instead of sleeping out their full interval.
 */

use std::sync::Arc;
use tokio::sync::watch;

/// Clone-per-task cancellation flag backed by a watch channel
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Create a signal in the not-cancelled state
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Trip the signal. Idempotent; wakes every pending `cancelled()` wait.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Non-blocking check
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the signal has been tripped
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The Arc keeps the sender alive for as long as any clone exists,
        // so wait_for can only fail once nobody can cancel us anymore.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
