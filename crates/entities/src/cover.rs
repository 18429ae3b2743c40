//! Cover adapter — blinds, gates, garage doors over a two-way mechanism.

use std::sync::Arc;

use iopanel_domain::config::{EntityOptions, TwoWayConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;

use crate::device_class;
use crate::motion::{MotionEntity, Travel};
use crate::notify::StateNotifier;

/// Device classes the host side understands for covers.
pub const COVER_DEVICE_CLASSES: &[&str] = &[
    "awning", "blind", "curtain", "damper", "door", "garage", "gate", "shade", "shutter", "window",
];

/// A position-reporting cover over a two-way mechanism.
///
/// Position runs 0 (closed) to 100 (open). Which commands are meaningful
/// depends on the configured output type; see the capability accessors.
pub struct Cover {
    motion: MotionEntity,
    device_class: Option<String>,
}

impl Cover {
    /// Claim the configured outputs and build the cover.
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
                "cover",
                COVER_DEVICE_CLASSES,
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

    /// Whether intermediate positions can be commanded.
    #[must_use]
    pub fn supports_set_position(&self) -> bool {
        self.motion.output_type().supports_intermediate()
    }

    /// Whether a movement can be stopped mid-travel.
    #[must_use]
    pub fn supports_stop(&self) -> bool {
        self.motion.output_type().supports_stop()
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
