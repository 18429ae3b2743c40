//! Switch adapter — a plain on/off output channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use iopanel_domain::config::{EntityOptions, OutputConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::OutputHandle;

use crate::device_class;
use crate::notify::StateNotifier;

/// Device classes the host side understands for switches.
pub const SWITCH_DEVICE_CLASSES: &[&str] = &["outlet", "switch"];

/// An on/off output channel.
pub struct Switch {
    unique_id: String,
    device_class: Option<String>,
    output: OutputHandle,
    on: AtomicBool,
    notifier: Arc<dyn StateNotifier>,
}

impl Switch {
    /// Claim the configured output and build the switch.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for invalid options or when the output is
    /// already leased by another entity.
    pub fn setup(
        hub: &Arc<Hub>,
        options: &EntityOptions,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let config = OutputConfig::parse_on_off(options)?;
        let output = hub.claim_output(&config)?;
        // Known state before the first command.
        output.off();
        Ok(Self {
            unique_id: config.unique_id(),
            device_class: device_class::validate(
                "switch",
                SWITCH_DEVICE_CLASSES,
                options.device_class.as_deref(),
            ),
            output,
            on: AtomicBool::new(false),
            notifier,
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

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    /// Energize the output.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the output rejects the level.
    pub fn turn_on(&self) -> Result<(), IoPanelError> {
        self.output.on(255)?;
        self.on.store(true, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);
        Ok(())
    }

    /// De-energize the output.
    pub fn turn_off(&self) {
        self.output.off();
        self.on.store(false, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);
    }

    /// De-energize and return the lease.
    pub fn shutdown(self) {
        self.turn_off();
        self.output.release();
    }
}
