//! The hub — shared resource arbiter for one controller instance.
//!
//! Every physical port is a [`ResourceId`]; the hub hands out exclusive
//! leases so two entities can never drive the same port. Entities claim
//! ports through the `claim_*` constructors, which return lease-backed
//! handles; dropping a handle without calling its `release` keeps the lease
//! (teardown is explicit, mirroring the entity lifecycle).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use iopanel_domain::config::{InputConfig, OneWireConfig, OutputConfig};
use iopanel_domain::error::{ConflictError, IoPanelError};
use iopanel_domain::resource::ResourceId;

use crate::bus::PanelBus;
use crate::io::{InputCallback, InputHandle, OneWirePort, OutputHandle, TemperatureCallback};

/// Shared arbiter over one controller's physical resources.
pub struct Hub {
    bus: Arc<dyn PanelBus>,
    resources: Mutex<HashSet<ResourceId>>,
}

impl Hub {
    /// Create a hub over the given transport.
    #[must_use]
    pub fn new(bus: Arc<dyn PanelBus>) -> Arc<Self> {
        Arc::new(Self {
            bus,
            resources: Mutex::new(HashSet::new()),
        })
    }

    pub(crate) fn bus(&self) -> &dyn PanelBus {
        self.bus.as_ref()
    }

    /// Whether a resource is currently unleased.
    #[must_use]
    pub fn is_available(&self, resource: ResourceId) -> bool {
        !self.lock_resources().contains(&resource)
    }

    /// Take an exclusive lease on a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] when the resource is already leased.
    pub fn lease(&self, resource: ResourceId) -> Result<(), ConflictError> {
        let mut resources = self.lock_resources();
        if !resources.insert(resource) {
            return Err(ConflictError {
                resource: resource.to_string(),
            });
        }
        tracing::info!(%resource, "using resource");
        Ok(())
    }

    /// Return a lease.
    ///
    /// # Panics
    ///
    /// Panics when the resource is not leased — releasing something that was
    /// never claimed is a programming error, not a runtime condition.
    pub fn release(&self, resource: ResourceId) {
        tracing::info!(%resource, "releasing resource");
        let removed = self.lock_resources().remove(&resource);
        assert!(removed, "released resource {resource} was not leased");
    }

    /// Claim an output channel, producing a lease-backed handle.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Conflict`] naming the output when it is
    /// already leased, or a validation error for an invalid assignment.
    pub fn claim_output(self: &Arc<Self>, config: &OutputConfig) -> Result<OutputHandle, IoPanelError> {
        let resource = config.resource()?;
        self.lease(resource).map_err(|_| ConflictError {
            resource: config.describe(),
        })?;
        Ok(OutputHandle::new(
            Arc::clone(self),
            resource,
            config.pwm,
            config.invert,
        ))
    }

    /// Claim an input channel and start its change-notification poller.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Conflict`] naming the input when it is
    /// already leased, or a validation error for an invalid assignment.
    pub fn claim_input(
        self: &Arc<Self>,
        config: &InputConfig,
        callback: InputCallback,
    ) -> Result<InputHandle, IoPanelError> {
        let resource = config.resource()?;
        self.lease(resource).map_err(|_| ConflictError {
            resource: config.describe(),
        })?;
        Ok(InputHandle::new(
            Arc::clone(self),
            resource,
            config.invert,
            callback,
        ))
    }

    /// Claim a 1-Wire port and start its poller.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Conflict`] naming the port when it is already
    /// leased, or a validation error for an invalid assignment.
    pub fn claim_one_wire(
        self: &Arc<Self>,
        config: &OneWireConfig,
        callback: TemperatureCallback,
    ) -> Result<OneWirePort, IoPanelError> {
        let resource = config.resource()?;
        self.lease(resource).map_err(|_| ConflictError {
            resource: config.describe(),
        })?;
        Ok(OneWirePort::new(Arc::clone(self), resource, callback))
    }

    fn lock_resources(&self) -> std::sync::MutexGuard<'_, HashSet<ResourceId>> {
        self.resources.lock().expect("resource set lock poisoned")
    }
}
