//! State-change notification fan-out.
//!
//! Entities do not push their state anywhere; they signal *that* something
//! changed and let subscribers re-read the accessors. [`StateNotifier`] is
//! the outbound port, [`StateBus`] the bundled broadcast implementation.

use std::sync::Arc;

use tokio::sync::broadcast;

/// Outbound port entities push state-change signals through.
pub trait StateNotifier: Send + Sync {
    /// Signal that the entity identified by `unique_id` has new state.
    fn state_changed(&self, unique_id: &str);
}

/// A state-change signal as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub unique_id: String,
}

/// Broadcast-backed notifier; every subscriber sees every change.
pub struct StateBus {
    sender: broadcast::Sender<StateChange>,
}

impl StateBus {
    /// Create a bus retaining up to `capacity` undelivered changes per
    /// subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity);
        Arc::new(Self { sender })
    }

    /// Open a new subscription; only changes sent after this call are seen.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.sender.subscribe()
    }
}

impl StateNotifier for StateBus {
    fn state_changed(&self, unique_id: &str) {
        // A bus without subscribers swallows the change; entities fire and
        // forget.
        let _ = self.sender.send(StateChange {
            unique_id: unique_id.to_owned(),
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::StateNotifier;

    /// Records every unique id it is notified about.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        ids: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub(crate) fn ids(&self) -> Vec<String> {
            self.ids.lock().unwrap().clone()
        }

        pub(crate) fn count(&self) -> usize {
            self.ids.lock().unwrap().len()
        }
    }

    impl StateNotifier for RecordingNotifier {
        fn state_changed(&self, unique_id: &str) {
            self.ids.lock().unwrap().push(unique_id.to_owned());
        }
    }
}
