//! Temperature-sensor adapter — a polled 1-Wire port.

use std::sync::Arc;

use iopanel_domain::config::{EntityOptions, OneWireConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::OneWirePort;

use crate::notify::StateNotifier;

/// A 1-Wire temperature probe, in °C.
pub struct TemperatureSensor {
    unique_id: String,
    port: OneWirePort,
}

impl TemperatureSensor {
    /// Claim the configured port, start its poller, and build the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for invalid options or when the port is
    /// already leased by another entity.
    pub fn setup(
        hub: &Arc<Hub>,
        options: &EntityOptions,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let config = OneWireConfig::parse(options)?;
        let unique_id = config.unique_id();

        let id = unique_id.clone();
        let port = hub.claim_one_wire(&config, Arc::new(move |_| notifier.state_changed(&id)))?;

        Ok(Self { unique_id, port })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Sample the probe right now.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.port.read()
    }

    /// Stop the poller and return the lease.
    pub async fn shutdown(self) {
        self.port.release().await;
    }
}
