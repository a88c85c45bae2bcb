//! Debounced commits
//!
//! Rapid edits are coalesced: each [`Debouncer::schedule`] cancels the pending
//! flush and arms a new one, so only the latest value is ever delivered.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces scheduled values into one delayed flush
///
/// Flushed values arrive on the receiver returned by [`Debouncer::new`].
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    sender: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer and the receiving end of its flushes
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            pending: Mutex::new(None),
            sender,
        };
        (debouncer, receiver)
    }

    /// Configured delay
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending flush with one delivering `value`
    pub fn schedule(&self, value: T) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let sender = self.sender.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            if sender.send(value).is_err() {
                tracing::debug!("debounced value dropped, receiver closed");
            }
        }));
    }

    /// Drop the pending flush, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    /// Whether a flush is armed and has not run yet
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[tokio::test]
    async fn zero_delay_coalesces_within_a_tick() {
        let (debouncer, mut rx) = Debouncer::new(Duration::ZERO);
        debouncer.schedule(1);
        debouncer.schedule(2);
        debouncer.schedule(3);

        assert_eq!(rx.recv().await, Some(3));
        tokio::task::yield_now().await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_flush_restarts_on_schedule() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule("a");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule("b");
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert!(debouncer.is_pending());

        assert_eq!(rx.recv().await, Some("b"));
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_flush() {
        let (debouncer, mut rx) = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(7);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert!(!debouncer.is_pending());
    }
}
