//! Entity options — the flat configuration record entities are set up from,
//! and its typed, validated parse targets.
//!
//! The host side hands every entity the same flat key set (`address`,
//! `output`, `invert`, …); each entity kind picks the keys it understands via
//! the `parse` constructors below. All validation happens here, at
//! configuration time — the running controller never sees malformed input.

use serde::Deserialize;

use crate::address::Address;
use crate::error::{ConfigError, IoPanelError};
use crate::output_type::OutputType;
use crate::resource::{
    self, ResourceId, describe_io_input, describe_io_output, describe_one_wire_port,
};

/// Flat per-entity configuration record.
///
/// Every key is optional; entity parsers report what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntityOptions {
    /// Panel address as three hex digits (`bus << 8 | device`).
    pub address: Option<String>,
    /// Second panel address (two-direction close output).
    pub address2: Option<String>,
    /// Output channel (0–5).
    pub output: Option<u8>,
    /// Second output channel (two-direction close output).
    pub output2: Option<u8>,
    /// Input channel (0–5).
    pub input: Option<u8>,
    /// 1-Wire port (0–9).
    pub port: Option<u8>,
    /// Invert the signal of the primary input/output.
    pub invert: bool,
    /// Invert the signal of the secondary output.
    pub invert2: bool,
    /// Primary output is PWM-capable.
    pub pwm: bool,
    /// Secondary output is PWM-capable.
    pub pwm2: bool,
    /// Platform-specific device class (optional, free-form).
    pub device_class: Option<String>,
    /// Output wiring of a two-way mechanism.
    pub output_type: Option<OutputType>,
    /// Seconds for a full close→open traverse.
    pub timeout: f64,
    /// Seconds for a full open→close traverse.
    pub timeout2: f64,
}

fn require<T: Copy>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingOption { key })
}

fn parse_address(value: Option<&String>, key: &'static str) -> Result<Address, IoPanelError> {
    let text = value.ok_or(ConfigError::MissingOption { key })?;
    Ok(Address::parse(text)?)
}

fn check_timeout(timeout: f64) -> Result<f64, ConfigError> {
    if timeout < 0.0 {
        return Err(ConfigError::NegativeTimeout { timeout });
    }
    Ok(timeout)
}

/// A validated digital-input assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub address: Address,
    pub input: u8,
    pub invert: bool,
}

impl InputConfig {
    /// Parse and validate the input keys of an options record.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for a missing/malformed address, a wrong
    /// panel kind, or an input channel out of range.
    pub fn parse(options: &EntityOptions) -> Result<Self, IoPanelError> {
        let config = Self {
            address: parse_address(options.address.as_ref(), "address")?,
            input: require(options.input, "input")?,
            invert: options.invert,
        };
        config.resource()?;
        Ok(config)
    }

    /// The resource this input occupies.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the address/channel combination is invalid.
    pub fn resource(&self) -> Result<ResourceId, IoPanelError> {
        ResourceId::io_input(self.address, self.input)
    }

    /// Human-readable resource string for conflict messages.
    #[must_use]
    pub fn describe(&self) -> String {
        describe_io_input(self.address, self.input)
    }

    /// Deterministic entity identifier.
    #[must_use]
    pub fn unique_id(&self) -> String {
        resource::unique_id(self.address, &[self.input])
    }
}

/// A validated digital/PWM-output assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub address: Address,
    pub output: u8,
    pub pwm: bool,
    pub invert: bool,
}

impl OutputConfig {
    /// Parse the primary output keys, honoring the `pwm` flag.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for a missing/malformed address, a wrong
    /// panel kind, or an output channel out of range.
    pub fn parse(options: &EntityOptions) -> Result<Self, IoPanelError> {
        Self::build(
            parse_address(options.address.as_ref(), "address")?,
            require(options.output, "output")?,
            options.pwm,
            options.invert,
        )
    }

    /// Parse the primary output keys for a plain on/off output (`pwm`
    /// ignored).
    ///
    /// # Errors
    ///
    /// Same as [`OutputConfig::parse`].
    pub fn parse_on_off(options: &EntityOptions) -> Result<Self, IoPanelError> {
        Self::build(
            parse_address(options.address.as_ref(), "address")?,
            require(options.output, "output")?,
            false,
            options.invert,
        )
    }

    /// Parse the secondary (`*2`) output keys as a plain on/off output.
    ///
    /// # Errors
    ///
    /// Same as [`OutputConfig::parse`], with the `*2` key names in errors.
    pub fn parse_secondary(options: &EntityOptions) -> Result<Self, IoPanelError> {
        Self::build(
            parse_address(options.address2.as_ref(), "address2")?,
            require(options.output2, "output2")?,
            false,
            options.invert2,
        )
    }

    fn build(address: Address, output: u8, pwm: bool, invert: bool) -> Result<Self, IoPanelError> {
        let config = Self {
            address,
            output,
            pwm,
            invert,
        };
        config.resource()?;
        Ok(config)
    }

    /// The resource this output occupies.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the address/channel combination is invalid.
    pub fn resource(&self) -> Result<ResourceId, IoPanelError> {
        ResourceId::io_output(self.address, self.output)
    }

    /// Human-readable resource string for conflict messages.
    #[must_use]
    pub fn describe(&self) -> String {
        describe_io_output(self.address, self.output)
    }

    /// Deterministic entity identifier.
    #[must_use]
    pub fn unique_id(&self) -> String {
        resource::unique_id(self.address, &[self.output])
    }
}

/// A validated 1-Wire port assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneWireConfig {
    pub address: Address,
    pub port: u8,
}

impl OneWireConfig {
    /// Parse and validate the 1-Wire keys of an options record.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for a missing/malformed address, a wrong
    /// panel kind, or a port out of range.
    pub fn parse(options: &EntityOptions) -> Result<Self, IoPanelError> {
        let config = Self {
            address: parse_address(options.address.as_ref(), "address")?,
            port: require(options.port, "port")?,
        };
        config.resource()?;
        Ok(config)
    }

    /// The resource this port occupies.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] when the address/port combination is invalid.
    pub fn resource(&self) -> Result<ResourceId, IoPanelError> {
        ResourceId::one_wire_port(self.address, self.port)
    }

    /// Human-readable resource string for conflict messages.
    #[must_use]
    pub fn describe(&self) -> String {
        describe_one_wire_port(self.address, self.port)
    }

    /// Deterministic entity identifier.
    #[must_use]
    pub fn unique_id(&self) -> String {
        resource::unique_id(self.address, &[self.port])
    }
}

/// A validated two-way mechanism assignment (cover or valve).
#[derive(Debug, Clone, PartialEq)]
pub struct TwoWayConfig {
    pub output_type: OutputType,
    /// Primary output — the open driver for two-direction wiring.
    pub open: OutputConfig,
    /// Close driver; present only for two-direction wiring.
    pub close: Option<OutputConfig>,
    /// Seconds for a full 0→100 traverse.
    pub timeout_open: f64,
    /// Seconds for a full 100→0 traverse.
    pub timeout_close: f64,
}

impl TwoWayConfig {
    /// Parse and validate the two-way keys of an options record.
    ///
    /// # Errors
    ///
    /// Returns [`IoPanelError`] for missing/invalid outputs, identical open
    /// and close outputs, or negative timeouts.
    pub fn parse(options: &EntityOptions) -> Result<Self, IoPanelError> {
        let output_type = require(options.output_type, "output_type")?;
        let open = OutputConfig::parse_on_off(options)?;

        let close = if output_type == OutputType::TwoDirection {
            let close = OutputConfig::parse_secondary(options)?;
            if close.resource()? == open.resource()? {
                return Err(ConfigError::SameOutput.into());
            }
            Some(close)
        } else {
            None
        };

        Ok(Self {
            output_type,
            open,
            close,
            timeout_open: check_timeout(options.timeout)?,
            timeout_close: check_timeout(options.timeout2)?,
        })
    }

    /// Deterministic entity identifier (`hex(address).output[.output2]`).
    #[must_use]
    pub fn unique_id(&self) -> String {
        match &self.close {
            Some(close) => {
                resource::unique_id(self.open.address, &[self.open.output, close.output])
            }
            None => self.open.unique_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_options() -> EntityOptions {
        EntityOptions {
            address: Some("123".to_string()),
            ..EntityOptions::default()
        }
    }

    #[test]
    fn should_deserialize_flat_record_from_toml() {
        let options: EntityOptions = toml::from_str(
            "
            address = '123'
            output = 4
            invert = true
            output_type = 'Two direction'
            address2 = '124'
            output2 = 5
            timeout = 10.0
            timeout2 = 5.0
            ",
        )
        .unwrap();
        assert_eq!(options.address.as_deref(), Some("123"));
        assert_eq!(options.output, Some(4));
        assert!(options.invert);
        assert_eq!(options.output_type, Some(OutputType::TwoDirection));
        assert_eq!(options.timeout, 10.0);
    }

    #[test]
    fn should_default_all_optional_keys() {
        let options: EntityOptions = toml::from_str("").unwrap();
        assert!(options.address.is_none());
        assert!(!options.invert);
        assert!(!options.pwm);
        assert_eq!(options.timeout, 0.0);
    }

    #[test]
    fn should_parse_input_config() {
        let mut options = base_options();
        options.input = Some(2);
        options.invert = true;

        let config = InputConfig::parse(&options).unwrap();
        assert_eq!(config.input, 2);
        assert!(config.invert);
        assert_eq!(config.unique_id(), "123.2");
    }

    #[test]
    fn should_report_missing_input_key() {
        let options = base_options();
        assert!(matches!(
            InputConfig::parse(&options),
            Err(IoPanelError::Config(ConfigError::MissingOption { key: "input" }))
        ));
    }

    #[test]
    fn should_report_missing_address() {
        let mut options = EntityOptions::default();
        options.output = Some(0);
        assert!(matches!(
            OutputConfig::parse(&options),
            Err(IoPanelError::Config(ConfigError::MissingOption { key: "address" }))
        ));
    }

    #[test]
    fn should_reject_out_of_range_output_channel() {
        let mut options = base_options();
        options.output = Some(6);
        assert!(matches!(
            OutputConfig::parse(&options),
            Err(IoPanelError::Config(ConfigError::InvalidChannel { .. }))
        ));
    }

    #[test]
    fn should_capture_pwm_flag_only_when_asked() {
        let mut options = base_options();
        options.output = Some(1);
        options.pwm = true;

        assert!(OutputConfig::parse(&options).unwrap().pwm);
        assert!(!OutputConfig::parse_on_off(&options).unwrap().pwm);
    }

    #[test]
    fn should_parse_one_wire_config() {
        let options = EntityOptions {
            address: Some("225".to_string()),
            port: Some(7),
            ..EntityOptions::default()
        };
        let config = OneWireConfig::parse(&options).unwrap();
        assert_eq!(config.port, 7);
        assert_eq!(config.describe(), "1W Port=0x225/7");
    }

    #[test]
    fn should_reject_io_address_for_one_wire_port() {
        let options = EntityOptions {
            address: Some("123".to_string()),
            port: Some(0),
            ..EntityOptions::default()
        };
        assert!(matches!(
            OneWireConfig::parse(&options),
            Err(IoPanelError::Address(_))
        ));
    }

    fn two_direction_options() -> EntityOptions {
        EntityOptions {
            address: Some("123".to_string()),
            output: Some(0),
            address2: Some("123".to_string()),
            output2: Some(1),
            output_type: Some(OutputType::TwoDirection),
            timeout: 10.0,
            timeout2: 5.0,
            ..EntityOptions::default()
        }
    }

    #[test]
    fn should_parse_two_direction_config() {
        let config = TwoWayConfig::parse(&two_direction_options()).unwrap();
        assert_eq!(config.output_type, OutputType::TwoDirection);
        assert_eq!(config.close.unwrap().output, 1);
        assert_eq!(config.timeout_open, 10.0);
        assert_eq!(config.timeout_close, 5.0);
        assert_eq!(config.unique_id(), "123.0.1");
    }

    #[test]
    fn should_reject_identical_open_and_close_outputs() {
        let mut options = two_direction_options();
        options.output2 = Some(0);
        assert!(matches!(
            TwoWayConfig::parse(&options),
            Err(IoPanelError::Config(ConfigError::SameOutput))
        ));
    }

    #[test]
    fn should_not_require_secondary_output_for_single_output_types() {
        let options = EntityOptions {
            address: Some("123".to_string()),
            output: Some(3),
            output_type: Some(OutputType::NormallyOpen),
            timeout: 2.0,
            timeout2: 2.0,
            ..EntityOptions::default()
        };
        let config = TwoWayConfig::parse(&options).unwrap();
        assert!(config.close.is_none());
        assert_eq!(config.unique_id(), "123.3");
    }

    #[test]
    fn should_reject_negative_timeout() {
        let mut options = two_direction_options();
        options.timeout2 = -1.0;
        assert!(matches!(
            TwoWayConfig::parse(&options),
            Err(IoPanelError::Config(ConfigError::NegativeTimeout { .. }))
        ));
    }
}
