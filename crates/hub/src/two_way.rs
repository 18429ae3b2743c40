//! Two-way motion controller for covers and valves.
//!
//! A [`TwoWayOutput`] tracks a continuous 0–100 position for a mechanism
//! driven through one of four wiring strategies ([`OutputType`]) and computes
//! timed movement from the calibrated full-traverse timeouts. Moves suspend
//! on a [`Sleeper`] and can be interrupted at any point through a
//! [`MoveCanceller`].
//!
//! Position semantics differ by strategy:
//!
//! - **Normally open / normally closed / PWM** commit `position = target`
//!   after initiating a move, even when the wait is interrupted — these
//!   strategies have no feedback and no meaningful intermediate state, so an
//!   interrupted move is reported as if it arrived. This mirrors the
//!   controller's historical behavior and is covered by tests as a known
//!   quirk.
//! - **Two direction** reconciles from actual elapsed time after every move,
//!   completed or interrupted, so a truncated wait reports where the
//!   mechanism really stopped.
//!
//! Callers must serialize moves per mechanism (the entity adapters hold a
//! `tokio::sync::Mutex` around the controller); `cancel` is lock-free.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use iopanel_domain::config::TwoWayConfig;
use iopanel_domain::error::{ConfigError, IoPanelError, PositionError};
use iopanel_domain::output_type::OutputType;

use crate::hub::Hub;
use crate::io::OutputHandle;
use crate::sleeper::{SleepOutcome, Sleeper};

/// How a move resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mechanism ran for its full computed duration.
    Settled,
    /// A newer command (or teardown) cut the move short.
    Interrupted,
}

impl MoveOutcome {
    /// Whether the move ran to completion.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl From<SleepOutcome> for MoveOutcome {
    fn from(outcome: SleepOutcome) -> Self {
        match outcome {
            SleepOutcome::Completed => Self::Settled,
            SleepOutcome::Cancelled => Self::Interrupted,
        }
    }
}

/// Lock-free cancellation handle for a [`TwoWayOutput`].
///
/// May be invoked at any time, including while another task holds the
/// mechanism's mutation lock awaiting the movement timer.
#[derive(Clone)]
pub struct MoveCanceller {
    sleeper: Sleeper,
}

impl MoveCanceller {
    /// Interrupt the in-flight move, if any.
    pub fn cancel(&self) {
        self.sleeper.cancel();
    }
}

/// Direction of travel for a two-direction drive.
#[derive(Clone, Copy)]
enum Direction {
    Opening,
    Closing,
}

/// The four physical-output strategies, selected once at construction.
enum Drive {
    /// One output; de-energized = open (100), energized = closed (0).
    NormallyOpen { output: OutputHandle },
    /// One output; de-energized = closed (0), energized = open (100).
    NormallyClosed { output: OutputHandle },
    /// One PWM output; the written level encodes the position directly.
    Pwm { output: OutputHandle },
    /// Independent open/close drivers, energized exclusively.
    TwoDirection {
        open: OutputHandle,
        close: OutputHandle,
    },
}

/// Timed, cancellable motion controller for one bidirectional mechanism.
pub struct TwoWayOutput {
    position: f64,
    timeout_open: f64,
    timeout_close: f64,
    sleeper: Sleeper,
    drive: Drive,
}

impl std::fmt::Debug for TwoWayOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoWayOutput")
            .field("position", &self.position)
            .field("timeout_open", &self.timeout_open)
            .field("timeout_close", &self.timeout_close)
            .finish_non_exhaustive()
    }
}

impl TwoWayOutput {
    /// Claim the configured output(s), force them to the de-energized safe
    /// state, and start at the strategy's resting position.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Conflict`] when an output is already leased,
    /// or a validation error for an invalid assignment.
    pub fn open(hub: &Arc<Hub>, config: &TwoWayConfig) -> Result<Self, IoPanelError> {
        let drive = match config.output_type {
            OutputType::NormallyOpen => Drive::NormallyOpen {
                output: hub.claim_output(&config.open)?,
            },
            OutputType::NormallyClosed => Drive::NormallyClosed {
                output: hub.claim_output(&config.open)?,
            },
            OutputType::Pwm => {
                let mut assignment = config.open;
                assignment.pwm = true;
                Drive::Pwm {
                    output: hub.claim_output(&assignment)?,
                }
            }
            OutputType::TwoDirection => {
                let close_config = config
                    .close
                    .as_ref()
                    .ok_or(ConfigError::MissingOption { key: "output2" })?;
                let open = hub.claim_output(&config.open)?;
                let close = match hub.claim_output(close_config) {
                    Ok(close) => close,
                    Err(err) => {
                        open.release();
                        return Err(err);
                    }
                };
                Drive::TwoDirection { open, close }
            }
        };

        match &drive {
            Drive::NormallyOpen { output }
            | Drive::NormallyClosed { output }
            | Drive::Pwm { output } => output.off(),
            Drive::TwoDirection { open, close } => {
                open.off();
                close.off();
            }
        }

        Ok(Self {
            position: config.output_type.initial_position(),
            timeout_open: config.timeout_open,
            timeout_close: config.timeout_close,
            sleeper: Sleeper::new(),
            drive,
        })
    }

    /// Current position in `[0, 100]`.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// A lock-free handle for interrupting in-flight moves.
    #[must_use]
    pub fn canceller(&self) -> MoveCanceller {
        MoveCanceller {
            sleeper: self.sleeper.clone(),
        }
    }

    /// Interrupt the in-flight move, if any.
    pub fn cancel(&self) {
        self.sleeper.cancel();
    }

    /// Drive the mechanism toward `target` and wait out the computed
    /// movement duration.
    ///
    /// Suspends for the calibrated (proportional) travel time; a concurrent
    /// [`cancel`](Self::cancel) makes it resolve early with
    /// [`MoveOutcome::Interrupted`]. See the module docs for how each
    /// strategy commits `position`.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Position`] for targets outside `[0, 100]` or
    /// intermediate targets on an endpoint-only strategy.
    pub async fn move_to(&mut self, target: f64) -> Result<MoveOutcome, IoPanelError> {
        if !(0.0..=100.0).contains(&target) {
            return Err(PositionError::OutOfRange { position: target }.into());
        }

        match &self.drive {
            Drive::NormallyOpen { output } => {
                let outcome = if target == 0.0 {
                    output.on(255)?;
                    self.sleeper.sleep(secs(self.timeout_close)).await
                } else if target == 100.0 {
                    output.off();
                    self.sleeper.sleep(secs(self.timeout_open)).await
                } else {
                    return Err(PositionError::Unsupported {
                        strategy: "Normally open",
                        position: target,
                    }
                    .into());
                };

                self.position = target;
                Ok(outcome.into())
            }
            Drive::NormallyClosed { output } => {
                let outcome = if target == 0.0 {
                    output.off();
                    self.sleeper.sleep(secs(self.timeout_close)).await
                } else if target == 100.0 {
                    output.on(255)?;
                    self.sleeper.sleep(secs(self.timeout_open)).await
                } else {
                    return Err(PositionError::Unsupported {
                        strategy: "Normally closed",
                        position: target,
                    }
                    .into());
                };

                self.position = target;
                Ok(outcome.into())
            }
            Drive::Pwm { output } => {
                // The physical output jumps immediately; the wait only models
                // the mechanism settling.
                output.write(level_for(target))?;

                let delta = target - self.position;
                if delta == 0.0 {
                    return Ok(MoveOutcome::Settled);
                }

                let wait = if delta > 0.0 {
                    delta / 100.0 * self.timeout_open
                } else {
                    -delta / 100.0 * self.timeout_close
                };
                let outcome = self.sleeper.sleep(secs(wait)).await;

                self.position = target;
                Ok(outcome.into())
            }
            Drive::TwoDirection { open, close } => {
                // Endpoint targets run the full traverse timeout; anything
                // else runs proportionally against that direction's base.
                let (direction, wait, full) = if target == 0.0 {
                    (Direction::Closing, self.timeout_close, self.timeout_close)
                } else if target == 100.0 {
                    (Direction::Opening, self.timeout_open, self.timeout_open)
                } else if target < self.position {
                    (
                        Direction::Closing,
                        (self.position - target) / 100.0 * self.timeout_close,
                        self.timeout_close,
                    )
                } else if target > self.position {
                    (
                        Direction::Opening,
                        (target - self.position) / 100.0 * self.timeout_open,
                        self.timeout_open,
                    )
                } else {
                    return Ok(MoveOutcome::Settled);
                };

                match direction {
                    Direction::Opening => {
                        close.off();
                        open.on(255)?;
                    }
                    Direction::Closing => {
                        open.off();
                        close.on(255)?;
                    }
                }

                let started = Instant::now();
                let outcome = self.sleeper.sleep(secs(wait)).await;
                let elapsed = started.elapsed().as_secs_f64();

                open.off();
                close.off();

                // Reconcile from wall-clock time: a cancelled wait stopped
                // the mechanism wherever it actually was.
                self.position = if full == 0.0 {
                    // Uncalibrated mechanism, treated as instant.
                    target
                } else {
                    let travelled = elapsed / full * 100.0;
                    let moved = match direction {
                        Direction::Opening => self.position + travelled,
                        Direction::Closing => self.position - travelled,
                    };
                    moved.clamp(0.0, 100.0)
                };

                Ok(outcome.into())
            }
        }
    }

    /// Return the mechanism to its safe resting state and release all
    /// output leases.
    ///
    /// Must only be called with the owning entity's mutation lock held, so a
    /// mid-move mechanism is never released.
    pub fn release(self) {
        match self.drive {
            Drive::NormallyOpen { output }
            | Drive::NormallyClosed { output }
            | Drive::Pwm { output } => {
                output.off();
                output.release();
            }
            Drive::TwoDirection { open, close } => {
                open.off();
                close.off();
                open.release();
                close.release();
            }
        }
    }
}

fn secs(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn level_for(position: f64) -> u8 {
    (position * 255.0 / 100.0).round() as u8
}
