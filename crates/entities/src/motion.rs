//! Shared motion machinery behind the cover and valve adapters.
//!
//! Both adapters wrap a [`TwoWayOutput`] with the same command discipline:
//! cancel whatever movement is in flight, queue on the command lock, run the
//! new movement, then mirror the controller's position into a plain snapshot
//! so accessors never touch the lock. Every command boundary emits a
//! state-change notification.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Mutex as CommandLock;

use iopanel_domain::config::TwoWayConfig;
use iopanel_domain::error::IoPanelError;
use iopanel_domain::output_type::OutputType;
use iopanel_hub::hub::Hub;
use iopanel_hub::two_way::{MoveCanceller, MoveOutcome, TwoWayOutput};

use crate::notify::StateNotifier;

/// Which travel flag a command raises while it holds the lock.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Travel {
    Opening,
    Closing,
    /// Compare the target against the current position.
    Auto,
}

#[derive(Debug, Clone, Copy)]
struct MotionState {
    position: f64,
    opening: bool,
    closing: bool,
}

/// One two-way mechanism with host-visible motion state.
///
/// The controller sits behind an `Option` so `shutdown` can take it out and
/// return its leases while later commands degrade to no-ops.
pub(crate) struct MotionEntity {
    unique_id: String,
    output_type: OutputType,
    notifier: Arc<dyn StateNotifier>,
    canceller: MoveCanceller,
    controller: CommandLock<Option<TwoWayOutput>>,
    state: Mutex<MotionState>,
}

impl MotionEntity {
    pub(crate) fn new(
        hub: &Arc<Hub>,
        config: &TwoWayConfig,
        notifier: Arc<dyn StateNotifier>,
    ) -> Result<Self, IoPanelError> {
        let controller = TwoWayOutput::open(hub, config)?;
        let canceller = controller.canceller();
        let state = MotionState {
            position: controller.position(),
            opening: false,
            closing: false,
        };
        Ok(Self {
            unique_id: config.unique_id(),
            output_type: config.output_type,
            notifier,
            canceller,
            controller: CommandLock::new(Some(controller)),
            state: Mutex::new(state),
        })
    }

    pub(crate) fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub(crate) fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub(crate) fn position(&self) -> f64 {
        self.lock_state().position
    }

    pub(crate) fn is_opening(&self) -> bool {
        self.lock_state().opening
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.lock_state().closing
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock_state().position == 0.0
    }

    /// Run a movement command to `target`.
    ///
    /// Cancels any in-flight movement first, so the lock is held only as
    /// long as the previous command needs to unwind. After shutdown this is
    /// a no-op.
    pub(crate) async fn move_to(&self, target: f64, travel: Travel) -> Result<(), IoPanelError> {
        self.canceller.cancel();
        let mut guard = self.controller.lock().await;
        let Some(controller) = guard.as_mut() else {
            return Ok(());
        };

        {
            let mut state = self.lock_state();
            let (opening, closing) = match travel {
                Travel::Opening => (true, false),
                Travel::Closing => (false, true),
                Travel::Auto => {
                    let current = controller.position();
                    (target > current, target < current)
                }
            };
            state.opening = opening;
            state.closing = closing;
        }
        self.notifier.state_changed(&self.unique_id);

        let result = controller.move_to(target).await;
        if matches!(result, Ok(MoveOutcome::Settled)) {
            tracing::info!(
                unique_id = %self.unique_id,
                position = controller.position(),
                "movement finished"
            );
        }

        {
            let mut state = self.lock_state();
            state.position = controller.position();
            state.opening = false;
            state.closing = false;
        }
        self.notifier.state_changed(&self.unique_id);
        result.map(|_| ())
    }

    /// Halt any in-flight movement and publish the reconciled position.
    pub(crate) async fn stop(&self) {
        self.canceller.cancel();
        let guard = self.controller.lock().await;
        if let Some(controller) = guard.as_ref() {
            let mut state = self.lock_state();
            state.position = controller.position();
            state.opening = false;
            state.closing = false;
        }
        drop(guard);
        self.notifier.state_changed(&self.unique_id);
    }

    /// Halt movement, de-energize the outputs, and return the leases.
    pub(crate) async fn shutdown(&self) {
        self.canceller.cancel();
        let mut guard = self.controller.lock().await;
        if let Some(controller) = guard.take() {
            {
                let mut state = self.lock_state();
                state.position = controller.position();
                state.opening = false;
                state.closing = false;
            }
            controller.release();
        }
        drop(guard);
        self.notifier.state_changed(&self.unique_id);
    }

    fn lock_state(&self) -> MutexGuard<'_, MotionState> {
        self.state.lock().expect("motion state lock poisoned")
    }
}
