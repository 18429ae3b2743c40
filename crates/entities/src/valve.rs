//! Valve adapter — water and gas valves over a two-way mechanism.

use std::sync::Arc;

use iopanel_domain::config::{EntityOptions, TwoWayConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;

use crate::device_class;
use crate::motion::{MotionEntity, Travel};
use crate::notify::StateNotifier;

/// Device classes the host side understands for valves.
pub const VALVE_DEVICE_CLASSES: &[&str] = &["water", "gas"];

/// A valve over a two-way mechanism.
///
/// Same controller contract as a cover; positions run 0 (closed) to 100
/// (open). Valves on endpoint-only wiring do not report a position, only
/// open/closed.
pub struct Valve {
    motion: MotionEntity,
    device_class: Option<String>,
}

impl Valve {
    /// Claim the configured outputs and build the valve.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for invalid options or when an output is
    /// already leased by another entity.
    pub fn setup(
        hub: &Arc<Hub>,
        options: &EntityOptions,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let config = TwoWayConfig::parse(options)?;
        Ok(Self {
            motion: MotionEntity::new(hub, &config, notifier)?,
            device_class: device_class::validate(
                "valve",
                VALVE_DEVICE_CLASSES,
                options.device_class.as_deref(),
            ),
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.motion.unique_id()
    }

    #[must_use]
    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref()
    }

    /// Whether the valve reports intermediate positions at all.
    #[must_use]
    pub fn reports_position(&self) -> bool {
        self.motion.output_type().supports_intermediate()
    }

    /// Whether a movement can be stopped mid-travel.
    #[must_use]
    pub fn supports_stop(&self) -> bool {
        self.motion.output_type().supports_stop()
    }

    /// Last published position, truncated to a whole percent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn current_position(&self) -> u8 {
        self.motion.position() as u8
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.motion.is_closed()
    }

    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.motion.is_opening()
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.motion.is_closing()
    }

    /// Drive fully open, superseding any movement in flight.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the target is not reachable with the
    /// configured output type.
    pub async fn open(&self) -> Result<(), IoPanelError> {
        self.motion.move_to(100.0, Travel::Opening).await
    }

    /// Drive fully closed, superseding any movement in flight.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the target is not reachable with the
    /// configured output type.
    pub async fn close(&self) -> Result<(), IoPanelError> {
        self.motion.move_to(0.0, Travel::Closing).await
    }

    /// Drive to an intermediate position (0–100).
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for an out-of-range target or an output type
    /// that only supports the endpoints.
    pub async fn set_position(&self, position: f64) -> Result<(), IoPanelError> {
        self.motion.move_to(position, Travel::Auto).await
    }

    /// Halt movement where it is and publish the reconciled position.
    pub async fn stop(&self) {
        self.motion.stop().await;
    }

    /// Halt movement, de-energize the outputs, and return the leases.
    pub async fn shutdown(&self) {
        self.motion.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notify::testing::RecordingNotifier;

    use iopanel_domain::error::PositionError;
    use iopanel_domain::output_type::OutputType;
    use iopanel_hub::bus::PanelBus;
    use iopanel_hub::bus::testing::RecordingBus;

    fn pwm_options() -> EntityOptions {
        EntityOptions {
            address: Some("123".to_owned()),
            output: Some(2),
            pwm: true,
            output_type: Some(OutputType::Pwm),
            timeout: 10.0,
            timeout2: 10.0,
            ..EntityOptions::default()
        }
    }

    fn normally_closed_options() -> EntityOptions {
        EntityOptions {
            address: Some("123".to_owned()),
            output: Some(2),
            output_type: Some(OutputType::NormallyClosed),
            timeout: 4.0,
            timeout2: 4.0,
            ..EntityOptions::default()
        }
    }

    fn setup(options: &EntityOptions) -> (Arc<RecordingBus>, Valve) {
        let bus = Arc::new(RecordingBus::default());
        let hub = Hub::new(Arc::clone(&bus) as Arc<dyn PanelBus>);
        let notifier = Arc::new(RecordingNotifier::default());
        let valve = Valve::setup(&hub, options, notifier).unwrap();
        (bus, valve)
    }

    #[tokio::test(start_paused = true)]
    async fn should_start_closed_with_pwm_wiring() {
        let (_bus, valve) = setup(&pwm_options());
        assert!(valve.is_closed());
        assert!(valve.reports_position());
        assert!(!valve.supports_stop());
    }

    #[tokio::test(start_paused = true)]
    async fn should_hold_intermediate_position_with_pwm() {
        let (bus, valve) = setup(&pwm_options());
        let config = TwoWayConfig::parse(&pwm_options()).unwrap();
        let resource = config.open.resource().unwrap();

        let started = tokio::time::Instant::now();
        valve.set_position(40.0).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(4));
        assert_eq!(valve.current_position(), 40);
        assert_eq!(bus.last_level(resource), Some(102));
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_report_position_on_endpoint_wiring() {
        let (_bus, valve) = setup(&normally_closed_options());
        assert!(!valve.reports_position());

        let err = valve.set_position(30.0).await.unwrap_err();
        assert!(matches!(
            err,
            IoPanelError::Position(PositionError::Unsupported { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn should_open_and_close_endpoint_wiring() {
        let (_bus, valve) = setup(&normally_closed_options());

        valve.open().await.unwrap();
        assert_eq!(valve.current_position(), 100);

        valve.close().await.unwrap();
        assert!(valve.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_known_device_class() {
        let mut options = pwm_options();
        options.device_class = Some("water".to_owned());
        let (_bus, valve) = setup(&options);
        assert_eq!(valve.device_class(), Some("water"));
    }
}
