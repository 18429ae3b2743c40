//! Resource identifiers — one integer per leasable physical port.
//!
//! A resource combines a panel [`Address`] with a channel:
//!
//! | Resource   | Encoding                     | Channel range |
//! |------------|------------------------------|---------------|
//! | IO input   | `address << 4 \| channel`        | 0–5 |
//! | IO output  | `address << 4 \| 0x08 \| channel` | 0–5 |
//! | 1-Wire port| `address << 4 \| port`           | 0–9 |
//!
//! The hub leases resources exclusively; the `describe` strings below are
//! what conflict errors show to the user.

use std::fmt;

use crate::address::{Address, PanelKind};
use crate::error::{ConfigError, IoPanelError};

const MAX_IO_CHANNEL: u8 = 5;
const MAX_ONE_WIRE_PORT: u8 = 9;

/// Uniquely identifies one physical input, output, or 1-Wire port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(u16);

impl ResourceId {
    /// Resource id for a digital input channel.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Address`] when the address is not an I/O
    /// panel, or [`IoPanelError::Config`] when the channel is out of range.
    pub fn io_input(address: Address, input: u8) -> Result<Self, IoPanelError> {
        let address = address.expect_kind(PanelKind::Io)?;
        check_channel("input", input, MAX_IO_CHANNEL)?;
        Ok(Self(address.raw() << 4 | u16::from(input)))
    }

    /// Resource id for a digital/PWM output channel.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Address`] when the address is not an I/O
    /// panel, or [`IoPanelError::Config`] when the channel is out of range.
    pub fn io_output(address: Address, output: u8) -> Result<Self, IoPanelError> {
        let address = address.expect_kind(PanelKind::Io)?;
        check_channel("output", output, MAX_IO_CHANNEL)?;
        Ok(Self(address.raw() << 4 | 0x08 | u16::from(output)))
    }

    /// Resource id for a 1-Wire sensor port.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError::Address`] when the address is not a 1-Wire
    /// panel, or [`IoPanelError::Config`] when the port is out of range.
    pub fn one_wire_port(address: Address, port: u8) -> Result<Self, IoPanelError> {
        let address = address.expect_kind(PanelKind::OneWire)?;
        check_channel("port", port, MAX_ONE_WIRE_PORT)?;
        Ok(Self(address.raw() << 4 | u16::from(port)))
    }

    /// The raw encoded value.
    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

fn check_channel(kind: &'static str, channel: u8, max: u8) -> Result<(), ConfigError> {
    if channel > max {
        return Err(ConfigError::InvalidChannel { kind, channel, max });
    }
    Ok(())
}

fn address_port_string(address: Address, channel: u8) -> String {
    format!("{address}/{channel}")
}

/// Human-readable string for an IO input, e.g. `IO Input=0x123/0`.
#[must_use]
pub fn describe_io_input(address: Address, input: u8) -> String {
    format!("IO Input={}", address_port_string(address, input))
}

/// Human-readable string for an IO output, e.g. `IO Output=0x123/4`.
#[must_use]
pub fn describe_io_output(address: Address, output: u8) -> String {
    format!("IO Output={}", address_port_string(address, output))
}

/// Human-readable string for a 1-Wire port, e.g. `1W Port=0x225/3`.
#[must_use]
pub fn describe_one_wire_port(address: Address, port: u8) -> String {
    format!("1W Port={}", address_port_string(address, port))
}

/// Deterministic entity identifier: `hex(address).channel[.channel2…]`.
///
/// Used for duplicate detection and display, e.g. `123.4` or `123.4.5`.
#[must_use]
pub fn unique_id(address: Address, channels: &[u8]) -> String {
    let mut id = format!("{:03X}", address.raw());
    for channel in channels {
        id.push('.');
        id.push_str(&channel.to_string());
    }
    id
}
