//! # iopanel-domain
//!
//! Pure domain model for the iopanel I/O panel controller.
//!
//! ## Responsibilities
//! - Panel **addresses** (`bus << 8 | device`) with bus/device-range validation
//! - **Resource identifiers** — one integer per physical input, output, or
//!   1-Wire port, used for exclusive-lease arbitration
//! - The **output type** enumeration for two-way mechanisms (covers, valves)
//! - Flat **entity options** records and their typed, validated parse targets
//! - The workspace-wide error taxonomy
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! It must never import anything from `iopanel-hub`, the entity adapters, or
//! external IO crates.

pub mod address;
pub mod config;
pub mod error;
pub mod output_type;
pub mod resource;
