//! Siren adapter — an output channel with optional tone duration and
//! PWM-backed volume.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex as CommandLock;

use iopanel_domain::config::{EntityOptions, OutputConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_hub::hub::Hub;
use iopanel_hub::io::OutputHandle;
use iopanel_hub::sleeper::Sleeper;

use crate::notify::StateNotifier;

/// A siren on one output channel.
///
/// `turn_on` with a duration arms an auto-off timer; a newer command cancels
/// it, the same supersede discipline the motion entities use.
pub struct Siren {
    unique_id: String,
    pwm: bool,
    output: OutputHandle,
    on: AtomicBool,
    sleeper: Sleeper,
    lock: CommandLock<()>,
    notifier: Arc<dyn StateNotifier>,
}

impl Siren {
    /// Claim the configured output and build the siren.
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
            on: AtomicBool::new(false),
            sleeper: Sleeper::new(),
            lock: CommandLock::new(()),
            notifier,
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Whether the wiring supports volume levels below full.
    #[must_use]
    pub fn supports_volume(&self) -> bool {
        self.pwm
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    /// Sound the siren, optionally for a limited duration.
    ///
    /// `volume` runs 0.0–1.0 and defaults to full; values below full need
    /// PWM wiring. With a duration, the call returns when the siren has
    /// turned itself off again, or immediately after a newer command takes
    /// over.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for a volume the wiring cannot drive.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub async fn turn_on(
        &self,
        volume: Option<f64>,
        duration: Option<Duration>,
    ) -> Result<(), IoPanelError> {
        self.sleeper.cancel();
        let _commands = self.lock.lock().await;

        let level = (volume.unwrap_or(1.0).clamp(0.0, 1.0) * 255.0) as u8;
        self.output.on(level)?;
        self.on.store(true, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);

        if let Some(duration) = duration {
            if self.sleeper.sleep(duration).await.is_completed() {
                self.output.off();
                self.on.store(false, Ordering::SeqCst);
                self.notifier.state_changed(&self.unique_id);
            }
        }
        Ok(())
    }

    /// Silence the siren, cancelling any pending auto-off.
    pub async fn turn_off(&self) {
        self.sleeper.cancel();
        let _commands = self.lock.lock().await;

        self.output.off();
        self.on.store(false, Ordering::SeqCst);
        self.notifier.state_changed(&self.unique_id);
    }

    /// Silence and return the lease.
    pub async fn shutdown(self) {
        self.turn_off().await;
        self.output.release();
    }
}
