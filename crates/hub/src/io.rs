//! Lease-backed IO primitives: outputs, inputs, and 1-Wire ports.
//!
//! Inputs and 1-Wire ports carry a background poller that hands a fresh
//! sample to a caller-supplied callback on a fixed interval; polling
//! substitutes for interrupt-driven change detection at the transport
//! boundary. `release`
//! stops the poller and **awaits it** before returning the lease, so no
//! callback ever fires on a released handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use iopanel_domain::error::ValueError;
use iopanel_domain::resource::ResourceId;

use crate::hub::Hub;

/// Interval between change-notification polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Change-notification callback for inputs; receives the fresh (possibly
/// inverted) sample taken by the poller.
pub type InputCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Change-notification callback for 1-Wire ports; receives the fresh
/// temperature sample.
pub type TemperatureCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// One leased digital/PWM output channel.
pub struct OutputHandle {
    hub: Arc<Hub>,
    resource: ResourceId,
    pwm: bool,
    invert: bool,
}

impl std::fmt::Debug for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputHandle")
            .field("resource", &self.resource)
            .field("pwm", &self.pwm)
            .field("invert", &self.invert)
            .finish_non_exhaustive()
    }
}

impl OutputHandle {
    pub(crate) fn new(hub: Arc<Hub>, resource: ResourceId, pwm: bool, invert: bool) -> Self {
        Self {
            hub,
            resource,
            pwm,
            invert,
        }
    }

    /// The leased resource.
    #[must_use]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Drive the output to `level`.
    ///
    /// Without PWM capability only 0 and 255 are accepted. `invert`
    /// substitutes `255 - level` before transmission.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotBinary`] for intermediate levels on a
    /// non-PWM output.
    pub fn write(&self, level: u8) -> Result<(), ValueError> {
        if !self.pwm && level != 0 && level != 255 {
            return Err(ValueError::NotBinary { value: level });
        }

        let level = if self.invert { 255 - level } else { level };
        self.hub.bus().write_output(self.resource, level);
        Ok(())
    }

    /// Energize the output.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroOn`] for level 0, or the [`write`](Self::write)
    /// errors.
    pub fn on(&self, level: u8) -> Result<(), ValueError> {
        if level == 0 {
            return Err(ValueError::ZeroOn);
        }
        self.write(level)
    }

    /// De-energize the output. Level 0 is accepted in every mode, so this
    /// cannot fail.
    pub fn off(&self) {
        let level = if self.invert { 255 } else { 0 };
        self.hub.bus().write_output(self.resource, level);
    }

    /// Return the lease.
    pub fn release(self) {
        self.hub.release(self.resource);
    }
}

/// What the poller runs on every tick; sampling is composed in by the
/// owning handle.
type PollFn = Box<dyn Fn() + Send + Sync>;

/// Shutdown-aware background poll task shared by inputs and 1-Wire ports.
struct Poller {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Poller {
    fn spawn(callback: PollFn) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stopped.changed() => break,
                    () = tokio::time::sleep(POLL_INTERVAL) => callback(),
                }
            }
        });
        Self { shutdown, task }
    }

    /// Stop the task and wait for it to finish.
    async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// One leased digital input channel with a change-notification poller.
pub struct InputHandle {
    hub: Arc<Hub>,
    resource: ResourceId,
    invert: bool,
    poller: Poller,
}

impl InputHandle {
    pub(crate) fn new(
        hub: Arc<Hub>,
        resource: ResourceId,
        invert: bool,
        callback: InputCallback,
    ) -> Self {
        let sampler = Arc::clone(&hub);
        let poll = Box::new(move || {
            let value = sampler.bus().read_input(resource) != invert;
            callback(value);
        });
        Self {
            hub,
            resource,
            invert,
            poller: Poller::spawn(poll),
        }
    }

    /// The leased resource.
    #[must_use]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Sample the current (possibly inverted) input state.
    #[must_use]
    pub fn read(&self) -> bool {
        let value = self.hub.bus().read_input(self.resource);
        value != self.invert
    }

    /// Stop the poller, wait for it, then return the lease.
    ///
    /// After this returns, the callback is guaranteed not to fire again.
    pub async fn release(self) {
        tracing::info!(resource = %self.resource, "closing background poller");
        self.poller.stop().await;
        self.hub.release(self.resource);
    }
}

/// One leased 1-Wire sensor port with a poller.
pub struct OneWirePort {
    hub: Arc<Hub>,
    resource: ResourceId,
    poller: Poller,
}

impl OneWirePort {
    pub(crate) fn new(hub: Arc<Hub>, resource: ResourceId, callback: TemperatureCallback) -> Self {
        let sampler = Arc::clone(&hub);
        let poll = Box::new(move || callback(sampler.bus().read_temperature(resource)));
        Self {
            hub,
            resource,
            poller: Poller::spawn(poll),
        }
    }

    /// The leased resource.
    #[must_use]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Read the current temperature, in °C.
    #[must_use]
    pub fn read(&self) -> f64 {
        self.hub.bus().read_temperature(self.resource)
    }

    /// Stop the poller, wait for it, then return the lease.
    pub async fn release(self) {
        tracing::info!(resource = %self.resource, "closing background poller");
        self.poller.stop().await;
        self.hub.release(self.resource);
    }
}
