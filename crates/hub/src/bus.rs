//! The raw bus transport boundary.
//!
//! [`PanelBus`] is a **port** — the hub and the IO handles talk to the
//! physical controller boards exclusively through it. The bundled
//! [`StubBus`] stands in for the real bus driver: writes are log-only and
//! reads are randomized, matching the reference behavior. Tests substitute
//! recording or scripted implementations.

use rand::Rng as _;
use rand::seq::SliceRandom as _;

use iopanel_domain::resource::ResourceId;

/// Raw transport to the physical panel boards.
///
/// Implementations must be cheap to call — IO handles invoke these
/// synchronously from async contexts.
pub trait PanelBus: Send + Sync {
    /// Drive an output channel to the given level (0–255).
    fn write_output(&self, resource: ResourceId, level: u8);

    /// Sample a digital input channel.
    fn read_input(&self, resource: ResourceId) -> bool;

    /// Read a temperature from a 1-Wire port, in °C.
    fn read_temperature(&self, resource: ResourceId) -> f64;
}

/// Stand-in transport: log-only writes, randomized reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubBus;

impl PanelBus for StubBus {
    fn write_output(&self, resource: ResourceId, level: u8) {
        tracing::info!(%resource, level, "changing resource");
    }

    fn read_input(&self, resource: ResourceId) -> bool {
        tracing::info!(%resource, "reading resource");
        rand::thread_rng().r#gen()
    }

    fn read_temperature(&self, resource: ResourceId) -> f64 {
        tracing::info!(%resource, "reading resource");
        *[22.0, 22.5, 23.0]
            .choose(&mut rand::thread_rng())
            .unwrap_or(&22.0)
    }
}

pub mod testing {
    //! Deterministic [`PanelBus`] implementations for tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::{PanelBus, ResourceId};

    /// Records every output write and serves a scripted input level.
    #[derive(Debug, Default)]
    pub struct RecordingBus {
        writes: Mutex<Vec<(ResourceId, u8)>>,
        input: AtomicBool,
        temperature: Mutex<f64>,
    }

    impl RecordingBus {
        pub fn set_input(&self, value: bool) {
            self.input.store(value, Ordering::SeqCst);
        }

        pub fn set_temperature(&self, value: f64) {
            *self.temperature.lock().unwrap() = value;
        }

        /// All writes observed so far, in order.
        pub fn writes(&self) -> Vec<(ResourceId, u8)> {
            self.writes.lock().unwrap().clone()
        }

        /// The last level written to `resource`, if any.
        pub fn last_level(&self, resource: ResourceId) -> Option<u8> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(r, _)| *r == resource)
                .map(|(_, level)| *level)
        }
    }

    impl PanelBus for RecordingBus {
        fn write_output(&self, resource: ResourceId, level: u8) {
            self.writes.lock().unwrap().push((resource, level));
        }

        fn read_input(&self, _resource: ResourceId) -> bool {
            self.input.load(Ordering::SeqCst)
        }

        fn read_temperature(&self, _resource: ResourceId) -> f64 {
            *self.temperature.lock().unwrap()
        }
    }
}
