//! # iopanel-hub
//!
//! The controller hub: resource arbitration, typed IO primitives, and the
//! timed two-way motion controller that drives covers and valves.
//!
//! ## Responsibilities
//! - [`Hub`](hub::Hub) — per-hub set of leased [`ResourceId`]s; grants and
//!   revokes exclusive leases so no two entities claim the same physical port
//! - [`PanelBus`](bus::PanelBus) — the raw transport boundary (a trait; the
//!   production implementation would talk to the physical bus, the bundled
//!   [`StubBus`](bus::StubBus) logs writes and randomizes reads)
//! - [`OutputHandle`](io::OutputHandle) / [`InputHandle`](io::InputHandle) /
//!   [`OneWirePort`](io::OneWirePort) — lease-backed wrappers around single
//!   physical ports
//! - [`Sleeper`](sleeper::Sleeper) — restartable, cancellable delay used to
//!   await calibrated movement durations
//! - [`TwoWayOutput`](two_way::TwoWayOutput) — the four-strategy motion
//!   controller state machine
//!
//! ## Dependency rule
//! Depends on `iopanel-domain` only (plus tokio for timing/concurrency).
//! Entity adapters depend on *this* crate, not the reverse.
//!
//! [`ResourceId`]: iopanel_domain::resource::ResourceId

pub mod bus;
pub mod hub;
pub mod io;
pub mod sleeper;
pub mod two_way;
