//! Binary-sensor adapter — a polled digital input channel.

use std::sync::Arc;

use iopanel_domain::config::{EntityOptions, InputConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::InputHandle;

use crate::device_class;
use crate::notify::StateNotifier;

/// Device classes the host side understands for binary sensors.
pub const BINARY_SENSOR_DEVICE_CLASSES: &[&str] = &[
    "battery",
    "cold",
    "connectivity",
    "door",
    "garage_door",
    "gas",
    "heat",
    "light",
    "lock",
    "moisture",
    "motion",
    "moving",
    "occupancy",
    "opening",
    "plug",
    "power",
    "presence",
    "problem",
    "running",
    "safety",
    "smoke",
    "sound",
    "tamper",
    "vibration",
    "window",
];

/// A digital input exposed as an on/off sensor.
///
/// The background poller signals a state change on every interval; reads go
/// straight through to the input.
pub struct BinarySensor {
    unique_id: String,
    device_class: Option<String>,
    input: InputHandle,
}

impl BinarySensor {
    /// Claim the configured input, start its poller, and build the sensor.
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
        let unique_id = config.unique_id();

        let id = unique_id.clone();
        let input = hub.claim_input(&config, Arc::new(move |_| notifier.state_changed(&id)))?;

        Ok(Self {
            unique_id,
            device_class: device_class::validate(
                "binary_sensor",
                BINARY_SENSOR_DEVICE_CLASSES,
                options.device_class.as_deref(),
            ),
            input,
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref()
    }

    /// Sample the input right now.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.input.read()
    }

    /// Stop the poller and return the lease.
    pub async fn shutdown(self) {
        self.input.release().await;
    }
}
