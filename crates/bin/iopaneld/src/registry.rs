//! Platform dispatch — builds the right adapter for each configured entry.

use std::sync::Arc;

use iopanel_domain::error::IoPanelError;
use iopanel_entities::binary_sensor::BinarySensor;
use iopanel_entities::cover::Cover;
use iopanel_entities::event::InputEvent;
use iopanel_entities::light::Light;
use iopanel_entities::notify::StateNotifier;
use iopanel_entities::sensor::TemperatureSensor;
use iopanel_entities::siren::Siren;
use iopanel_entities::switch::Switch;
use iopanel_entities::valve::Valve;
use iopanel_hub::hub::Hub;

use crate::config::{EntityEntry, Platform};

/// A running entity of any platform.
pub enum AnyEntity {
    BinarySensor(BinarySensor),
    Cover(Cover),
    Event(InputEvent),
    Light(Light),
    Sensor(TemperatureSensor),
    Siren(Siren),
    Switch(Switch),
    Valve(Valve),
}

impl std::fmt::Debug for AnyEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let variant = match self {
            Self::BinarySensor(_) => "BinarySensor",
            Self::Cover(_) => "Cover",
            Self::Event(_) => "Event",
            Self::Light(_) => "Light",
            Self::Sensor(_) => "Sensor",
            Self::Siren(_) => "Siren",
            Self::Switch(_) => "Switch",
            Self::Valve(_) => "Valve",
        };
        f.debug_struct(variant).finish_non_exhaustive()
    }
}

impl AnyEntity {
    /// Build the adapter the entry's platform asks for.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for invalid options or resource conflicts;
    /// the caller decides whether to skip the entry or abort.
    pub fn setup(
        hub: &Arc<Hub>,
        entry: &EntityEntry,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let options = &entry.options;
        Ok(match entry.platform {
            Platform::BinarySensor => {
                Self::BinarySensor(BinarySensor::setup(hub, options, notifier)?)
            }
            Platform::Cover => Self::Cover(Cover::setup(hub, options, notifier)?),
            Platform::Event => Self::Event(InputEvent::setup(hub, options, notifier)?),
            Platform::Light => Self::Light(Light::setup(hub, options, notifier)?),
            Platform::Sensor => Self::Sensor(TemperatureSensor::setup(hub, options, notifier)?),
            Platform::Siren => Self::Siren(Siren::setup(hub, options, notifier)?),
            Platform::Switch => Self::Switch(Switch::setup(hub, options, notifier)?),
            Platform::Valve => Self::Valve(Valve::setup(hub, options, notifier)?),
        })
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::BinarySensor(entity) => entity.unique_id(),
            Self::Cover(entity) => entity.unique_id(),
            Self::Event(entity) => entity.unique_id(),
            Self::Light(entity) => entity.unique_id(),
            Self::Sensor(entity) => entity.unique_id(),
            Self::Siren(entity) => entity.unique_id(),
            Self::Switch(entity) => entity.unique_id(),
            Self::Valve(entity) => entity.unique_id(),
        }
    }

    /// Tear the entity down and return its hub leases.
    pub async fn shutdown(self) {
        match self {
            Self::BinarySensor(entity) => entity.shutdown().await,
            Self::Cover(entity) => entity.shutdown().await,
            Self::Event(entity) => entity.shutdown().await,
            Self::Light(entity) => entity.shutdown(),
            Self::Sensor(entity) => entity.shutdown().await,
            Self::Siren(entity) => entity.shutdown().await,
            Self::Switch(entity) => entity.shutdown(),
            Self::Valve(entity) => entity.shutdown().await,
        }
    }
}
