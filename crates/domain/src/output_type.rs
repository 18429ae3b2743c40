//! Output control type for two-way mechanisms (covers and valves).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a two-way mechanism is wired to its physical output(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputType {
    /// One output; de-energized = open.
    #[serde(rename = "Normally open")]
    NormallyOpen,
    /// One output; de-energized = closed.
    #[serde(rename = "Normally closed")]
    NormallyClosed,
    /// One PWM-capable output; the level itself encodes the position.
    #[serde(rename = "PWM")]
    Pwm,
    /// Two outputs, one per direction, energized exclusively.
    #[serde(rename = "Two direction")]
    TwoDirection,
}

impl OutputType {
    /// Position the mechanism rests at when all outputs are de-energized.
    #[must_use]
    pub fn initial_position(self) -> f64 {
        match self {
            Self::NormallyOpen | Self::TwoDirection => 100.0,
            Self::NormallyClosed | Self::Pwm => 0.0,
        }
    }

    /// Whether the type can hold positions other than the two endpoints.
    #[must_use]
    pub fn supports_intermediate(self) -> bool {
        matches!(self, Self::Pwm | Self::TwoDirection)
    }

    /// Whether an in-flight move can be stopped mid-travel meaningfully.
    ///
    /// Only two-direction mechanisms reconcile their position from elapsed
    /// time, so only they expose a stop command.
    #[must_use]
    pub fn supports_stop(self) -> bool {
        matches!(self, Self::TwoDirection)
    }

    /// The user-facing name, as entered in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormallyOpen => "Normally open",
            Self::NormallyClosed => "Normally closed",
            Self::Pwm => "PWM",
            Self::TwoDirection => "Two direction",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normally open" => Ok(Self::NormallyOpen),
            "Normally closed" => Ok(Self::NormallyClosed),
            "PWM" => Ok(Self::Pwm),
            "Two direction" => Ok(Self::TwoDirection),
            other => Err(ConfigError::UnknownValue {
                key: "output_type",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_user_facing_names() {
        assert_eq!(
            "Normally open".parse::<OutputType>().unwrap(),
            OutputType::NormallyOpen
        );
        assert_eq!("PWM".parse::<OutputType>().unwrap(), OutputType::Pwm);
        assert_eq!(
            "Two direction".parse::<OutputType>().unwrap(),
            OutputType::TwoDirection
        );
    }

    #[test]
    fn should_reject_unknown_name() {
        assert!(matches!(
            "Sideways".parse::<OutputType>(),
            Err(ConfigError::UnknownValue { key: "output_type", .. })
        ));
    }

    #[test]
    fn should_roundtrip_through_serde() {
        let json = serde_json::to_string(&OutputType::NormallyClosed).unwrap();
        assert_eq!(json, "\"Normally closed\"");
        let parsed: OutputType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OutputType::NormallyClosed);
    }

    #[test]
    fn should_rest_open_for_normally_open_and_two_direction() {
        assert_eq!(OutputType::NormallyOpen.initial_position(), 100.0);
        assert_eq!(OutputType::TwoDirection.initial_position(), 100.0);
    }

    #[test]
    fn should_rest_closed_for_normally_closed_and_pwm() {
        assert_eq!(OutputType::NormallyClosed.initial_position(), 0.0);
        assert_eq!(OutputType::Pwm.initial_position(), 0.0);
    }

    #[test]
    fn should_expose_stop_only_for_two_direction() {
        assert!(OutputType::TwoDirection.supports_stop());
        assert!(!OutputType::Pwm.supports_stop());
        assert!(!OutputType::NormallyOpen.supports_stop());
    }
}
