//! Cancellable, restartable delay primitive.
//!
//! A [`Sleeper`] awaits calibrated movement durations and lets a concurrent
//! caller cut the wait short. Clones share the same cancellation slot, so an
//! entity can keep a clone around for lock-free cancellation while the
//! original sits inside the locked controller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

/// How a [`Sleeper::sleep`] call resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full delay elapsed.
    Completed,
    /// The delay was cut short by [`Sleeper::cancel`].
    Cancelled,
}

impl SleepOutcome {
    /// Whether the full delay elapsed.
    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A restartable, cancellable delay.
///
/// At most one delay is tracked at a time: starting a new sleep replaces the
/// stored cancellation handle, so [`cancel`](Self::cancel) only reaches the
/// most recent sleep. A superseded sleep keeps running and resolves on its
/// own — the sleeper merely forgets how to cancel it.
#[derive(Clone, Default)]
pub struct Sleeper {
    current: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl Sleeper {
    /// Create a sleeper with no delay outstanding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for `delay`, or until cancelled, whichever comes first.
    pub async fn sleep(&self, delay: Duration) -> SleepOutcome {
        let cancel = Arc::new(Notify::new());
        *self.lock() = Some(Arc::clone(&cancel));

        let outcome = tokio::select! {
            () = tokio::time::sleep(delay) => SleepOutcome::Completed,
            () = cancel.notified() => SleepOutcome::Cancelled,
        };

        // Clear the slot only if it still belongs to this sleep; a newer
        // sleep may have replaced it while we waited.
        let mut slot = self.lock();
        if slot.as_ref().is_some_and(|stored| Arc::ptr_eq(stored, &cancel)) {
            *slot = None;
        }

        outcome
    }

    /// Cancel the most recent outstanding sleep; no-op when none is pending.
    pub fn cancel(&self) {
        if let Some(cancel) = self.lock().take() {
            // notify_one stores a permit, so a cancel that races the start
            // of the select above is not lost.
            cancel.notify_one();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<Notify>>> {
        self.current.lock().expect("sleeper slot lock poisoned")
    }
}
