//! Panel addresses — `bus << 8 | device`.
//!
//! Users enter addresses as three hex digits (`0xBAA`): `B` is the bus
//! (0 or 1), `AA` the device address (`0x10..=0x6F`). The high nibble of the
//! device byte encodes the panel kind (I/O panel or 1-Wire panel).

use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Kind of panel board an address points at, taken from the high nibble of
/// the device byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Digital input/output panel (six inputs, six outputs).
    Io,
    /// 1-Wire sensor panel (ten ports).
    OneWire,
}

impl PanelKind {
    fn nibble(self) -> u16 {
        match self {
            Self::Io => 0x1,
            Self::OneWire => 0x2,
        }
    }

    /// Human-readable kind name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Io => "IO",
            Self::OneWire => "1-Wire",
        }
    }
}

/// A validated panel address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(u16);

impl Address {
    /// Build an address from a raw `bus << 8 | device` value.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] when the bus is not 0 or 1, or the device
    /// byte is outside `0x10..=0x6F`.
    pub fn new(raw: u16) -> Result<Self, AddressError> {
        let address = Self(raw);

        if address.bus() > 1 {
            return Err(AddressError::InvalidBus {
                address: address.to_string(),
            });
        }
        let device = address.device();
        if !(0x10..=0x6F).contains(&device) {
            return Err(AddressError::InvalidDevice {
                address: address.to_string(),
            });
        }

        Ok(address)
    }

    /// Parse a user-entered address string (exactly three hex digits).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Malformed`] for anything that is not three hex
    /// digits, or the validation errors from [`Address::new`].
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        if text.len() != 3 {
            return Err(AddressError::Malformed {
                address: text.to_string(),
            });
        }

        let raw = u16::from_str_radix(text, 16).map_err(|_| AddressError::Malformed {
            address: text.to_string(),
        })?;

        Self::new(raw)
    }

    /// The raw `bus << 8 | device` value.
    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Bus number (0 or 1).
    #[must_use]
    pub fn bus(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Device byte on the bus.
    #[must_use]
    pub fn device(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Panel kind encoded in the device byte, if recognized.
    #[must_use]
    pub fn kind(self) -> Option<PanelKind> {
        match self.0 >> 4 & 0xF {
            0x1 => Some(PanelKind::Io),
            0x2 => Some(PanelKind::OneWire),
            _ => None,
        }
    }

    /// Require the address to point at a panel of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::KindMismatch`] otherwise.
    pub fn expect_kind(self, expected: PanelKind) -> Result<Self, AddressError> {
        if self.0 >> 4 & 0xF == expected.nibble() {
            Ok(self)
        } else {
            Err(AddressError::KindMismatch {
                address: self.to_string(),
                expected: expected.name(),
            })
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_three_hex_digits() {
        let address = Address::parse("123").unwrap();
        assert_eq!(address.raw(), 0x123);
        assert_eq!(address.bus(), 1);
        assert_eq!(address.device(), 0x23);
    }

    #[test]
    fn should_reject_short_and_long_strings() {
        assert!(matches!(
            Address::parse("12"),
            Err(AddressError::Malformed { .. })
        ));
        assert!(matches!(
            Address::parse("0123"),
            Err(AddressError::Malformed { .. })
        ));
    }

    #[test]
    fn should_reject_non_hex_input() {
        assert!(matches!(
            Address::parse("1g3"),
            Err(AddressError::Malformed { .. })
        ));
    }

    #[test]
    fn should_reject_bus_greater_than_one() {
        assert!(matches!(
            Address::parse("223"),
            Err(AddressError::InvalidBus { .. })
        ));
    }

    #[test]
    fn should_reject_device_outside_range() {
        assert!(matches!(
            Address::parse("00F"),
            Err(AddressError::InvalidDevice { .. })
        ));
        assert!(matches!(
            Address::parse("170"),
            Err(AddressError::InvalidDevice { .. })
        ));
    }

    #[test]
    fn should_recognize_io_panel_kind() {
        let address = Address::parse("015").unwrap();
        assert_eq!(address.kind(), Some(PanelKind::Io));
        assert!(address.expect_kind(PanelKind::Io).is_ok());
    }

    #[test]
    fn should_recognize_one_wire_panel_kind() {
        let address = Address::parse("125").unwrap();
        assert_eq!(address.kind(), Some(PanelKind::OneWire));
        assert!(address.expect_kind(PanelKind::OneWire).is_ok());
    }

    #[test]
    fn should_reject_kind_mismatch() {
        let address = Address::parse("023").unwrap();
        assert!(matches!(
            address.expect_kind(PanelKind::Io),
            Err(AddressError::KindMismatch { .. })
        ));
    }

    #[test]
    fn should_display_as_three_hex_digits() {
        let address = Address::parse("023").unwrap();
        assert_eq!(address.to_string(), "0x023");
    }
}
