//! # iopanel-entities
//!
//! Host-facing entity adapters over the controller hub.
//!
//! ## Responsibilities
//!
//! - Translate host commands (open, turn on, set position) into hub
//!   primitives and publish state changes back through [`notify::StateNotifier`].
//! - Own the per-entity lifecycle: claim hub resources at setup, return them
//!   on shutdown.
//! - Validate platform-specific options (device classes) at setup time.
//!
//! ## Dependency rule
//!
//! This crate depends on `iopanel-domain` and `iopanel-hub` only. It knows
//! nothing about configuration files or process wiring; the binary composes
//! entities from parsed options.

pub mod binary_sensor;
pub mod cover;
mod device_class;
pub mod event;
pub mod light;
mod motion;
pub mod notify;
pub mod sensor;
pub mod siren;
pub mod switch;
pub mod valve;
