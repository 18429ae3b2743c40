//! Input-event adapter — edge detection over a polled digital input.
//!
//! Instead of exposing the raw level, this entity turns sampled transitions
//! into begin/end events: a rising edge emits [`EdgeEvent::Begin`], the
//! matching falling edge emits [`EdgeEvent::End`] carrying how long the
//! input was held. Repeated samples at the same level emit nothing.

use std::sync::{Arc, Mutex};

use tokio::time::Instant;

use iopanel_domain::config::{EntityOptions, InputConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::InputHandle;

use crate::device_class;
use crate::notify::StateNotifier;

/// Device classes the host side understands for input events.
pub const EVENT_DEVICE_CLASSES: &[&str] = &["button", "doorbell", "motion"];

/// One detected input transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEvent {
    /// The input went active.
    Begin,
    /// The input went inactive after being held for `duration_ms`.
    End { duration_ms: u64 },
}

#[derive(Debug, Default)]
struct DetectorState {
    rose_at: Option<Instant>,
    last: Option<EdgeEvent>,
}

/// Turns level samples into edge events; shared with the poll callback.
struct EdgeDetector {
    unique_id: String,
    notifier: Arc<dyn StateNotifier>,
    state: Mutex<DetectorState>,
}

impl EdgeDetector {
    #[allow(clippy::cast_possible_truncation)]
    fn observe(&self, value: bool) {
        let event = {
            let mut state = self.state.lock().expect("detector state lock poisoned");
            if value {
                if state.rose_at.is_some() {
                    return;
                }
                state.rose_at = Some(Instant::now());
                state.last = Some(EdgeEvent::Begin);
                EdgeEvent::Begin
            } else {
                let Some(rose_at) = state.rose_at.take() else {
                    return;
                };
                let event = EdgeEvent::End {
                    duration_ms: rose_at.elapsed().as_millis() as u64,
                };
                state.last = Some(event);
                event
            }
        };
        tracing::debug!(unique_id = %self.unique_id, ?event, "input edge");
        self.notifier.state_changed(&self.unique_id);
    }
}

/// A digital input exposed as a begin/end event source.
pub struct InputEvent {
    device_class: Option<String>,
    detector: Arc<EdgeDetector>,
    input: InputHandle,
}

impl InputEvent {
    /// Claim the configured input, start its poller, and build the entity.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for invalid options or when the input is
    /// already leased by another entity.
    pub fn setup(
        hub: &Arc<Hub>,
        options: &EntityOptions,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let config = InputConfig::parse(options)?;
        let detector = Arc::new(EdgeDetector {
            unique_id: config.unique_id(),
            notifier,
            state: Mutex::new(DetectorState::default()),
        });

        let observer = Arc::clone(&detector);
        let input = hub.claim_input(&config, Arc::new(move |value| observer.observe(value)))?;

        Ok(Self {
            device_class: device_class::validate(
                "event",
                EVENT_DEVICE_CLASSES,
                options.device_class.as_deref(),
            ),
            detector,
            input,
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.detector.unique_id
    }

    #[must_use]
    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref()
    }

    /// The most recent detected edge, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<EdgeEvent> {
        self.detector
            .state
            .lock()
            .expect("detector state lock poisoned")
            .last
    }

    /// Stop the poller and return the lease.
    pub async fn shutdown(self) {
        self.input.release().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notify::testing::RecordingNotifier;

    use iopanel_hub::bus::PanelBus;
    use iopanel_hub::bus::testing::RecordingBus;
    use iopanel_hub::io::POLL_INTERVAL;

    fn options() -> EntityOptions {
        EntityOptions {
            address: Some("123".to_owned()),
            input: Some(1),
            device_class: Some("button".to_owned()),
            ..EntityOptions::default()
        }
    }

    fn setup() -> (Arc<RecordingBus>, Arc<RecordingNotifier>, InputEvent) {
        let bus = Arc::new(RecordingBus::default());
        let hub = Hub::new(Arc::clone(&bus) as Arc<dyn PanelBus>);
        let notifier = Arc::new(RecordingNotifier::default());
        let event = InputEvent::setup(&hub, &options(), Arc::clone(&notifier) as _).unwrap();
        (bus, notifier, event)
    }

    #[tokio::test(start_paused = true)]
    async fn should_emit_begin_on_rising_edge() {
        let (bus, notifier, event) = setup();

        bus.set_input(true);
        tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(100)).await;

        assert_eq!(event.last_event(), Some(EdgeEvent::Begin));
        assert_eq!(notifier.count(), 1);

        event.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_emit_end_with_held_duration() {
        let (bus, _notifier, event) = setup();

        bus.set_input(true);
        tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(100)).await;

        bus.set_input(false);
        tokio::time::sleep(POLL_INTERVAL).await;

        assert_eq!(
            event.last_event(),
            Some(EdgeEvent::End { duration_ms: 5000 })
        );

        event.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_repeated_samples_at_same_level() {
        let (bus, notifier, event) = setup();

        bus.set_input(true);
        tokio::time::sleep(POLL_INTERVAL * 3 + Duration::from_millis(100)).await;

        assert_eq!(notifier.count(), 1);
        assert_eq!(event.last_event(), Some(EdgeEvent::Begin));

        event.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_stay_silent_while_input_is_idle() {
        let (_bus, notifier, event) = setup();

        tokio::time::sleep(POLL_INTERVAL * 3 + Duration::from_millis(100)).await;

        assert_eq!(notifier.count(), 0);
        assert_eq!(event.last_event(), None);

        event.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_known_device_class() {
        let (_bus, _notifier, event) = setup();
        assert_eq!(event.device_class(), Some("button"));
        assert_eq!(event.unique_id(), "123.1");
        event.shutdown().await;
    }
}
