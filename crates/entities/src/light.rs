//! Light adapter — an output channel with optional PWM dimming.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use iopanel_domain::config::{EntityOptions, OutputConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::OutputHandle;

use crate::notify::StateNotifier;

/// A light on one output channel.
///
/// With PWM wiring the brightness maps straight onto the output level;
/// without it the light is on/off only and every `turn_on` drives the full
/// level.
pub struct Light {
    unique_id: String,
    pwm: bool,
    output: OutputHandle,
    brightness: AtomicU8,
    notifier: Arc<dyn StateNotifier>,
}

impl std::fmt::Debug for Light {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Light")
            .field("unique_id", &self.unique_id)
            .field("pwm", &self.pwm)
            .field("brightness", &self.brightness)
            .finish_non_exhaustive()
    }
}

impl Light {
    /// Claim the configured output and build the light.
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
        let config = OutputConfig::parse(options)?;
        Ok(Self {
            unique_id: config.unique_id(),
            pwm: config.pwm,
            output: hub.claim_output(&config)?,
            brightness: AtomicU8::new(0),
            notifier,
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn supports_brightness(&self) -> bool {
        self.pwm
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.brightness() > 0
    }

    /// Last commanded brightness (0–255).
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::SeqCst)
    }

    /// Energize the output, at `brightness` when the wiring supports it.
    ///
    /// Without PWM the brightness is ignored and the full level is driven.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for a zero brightness; turning on at zero is
    /// a contradiction, use [`turn_off`](Self::turn_off).
    pub fn turn_on(&self, brightness: Option<u8>) -> Result<(), IoPanelError> {
        let level = if self.pwm {
            brightness.unwrap_or(255)
        } else {
            255
        };
        self.output.on(level)?;
        self.brightness.store(level, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);
        Ok(())
    }

    /// De-energize the output.
    pub fn turn_off(&self) {
        self.output.off();
        self.brightness.store(0, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);
    }

    /// De-energize and return the lease.
    pub fn shutdown(self) {
        self.turn_off();
        self.output.release();
    }
}
