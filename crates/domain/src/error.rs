//! Common error types used across the workspace.
//!
//! One top-level [`IoPanelError`] wraps typed sub-errors via `#[from]`.
//! Configuration-time failures (`Address`, `Config`, `Conflict`) surface at
//! the setup/validation boundary; `Value` and `Position` are programming or
//! wiring errors that fail the triggering call and are never retried.
//!
//! An interrupted move is **not** an error — it is the
//! `MoveOutcome::Interrupted` value returned by the motion controller.

/// Top-level error for the iopanel workspace.
#[derive(Debug, thiserror::Error)]
pub enum IoPanelError {
    /// Malformed or out-of-range panel address.
    #[error("invalid address")]
    Address(#[from] AddressError),

    /// Invalid or inconsistent entity options.
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    /// A physical resource is already leased by another entity.
    #[error("resource conflict")]
    Conflict(#[from] ConflictError),

    /// An output level outside its accepted domain.
    #[error("invalid output value")]
    Value(#[from] ValueError),

    /// A move target the selected strategy cannot reach.
    #[error("unsupported position")]
    Position(#[from] PositionError),
}

/// Address parse and validation failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The address string is not exactly three hex digits.
    #[error(
        "invalid address '0x{address}', it must be 0xBAA where B is the bus (0, 1) \
         and AA is the device address (10 - 6F)"
    )]
    Malformed { address: String },

    /// The bus nibble is outside `{0, 1}`.
    #[error("invalid address '{address}', bus must be 0 or 1")]
    InvalidBus { address: String },

    /// The device byte is outside `0x10..=0x6F`.
    #[error("invalid address '{address}', device must be between 0x10 and 0x6F")]
    InvalidDevice { address: String },

    /// The address does not belong to the expected panel kind.
    #[error("invalid address '{address}', expected a {expected} panel")]
    KindMismatch {
        address: String,
        expected: &'static str,
    },
}

/// Entity-options validation failures.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required option key is absent.
    #[error("missing option '{key}'")]
    MissingOption { key: &'static str },

    /// A channel number outside its valid range.
    #[error("wrong {kind} '{channel}', it must be between 0 and {max}")]
    InvalidChannel {
        kind: &'static str,
        channel: u8,
        max: u8,
    },

    /// The open and close outputs of a two-direction mechanism are identical.
    #[error("open and close output is the same")]
    SameOutput,

    /// A traverse timeout below zero.
    #[error("wrong timeout '{timeout}', it must not be negative")]
    NegativeTimeout { timeout: f64 },

    /// A value outside a fixed set of accepted strings.
    #[error("unknown value '{value}' for option '{key}'")]
    UnknownValue { key: &'static str, value: String },
}

/// A resource is already leased by another entity.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("resource '{resource}' is already used by another entity")]
pub struct ConflictError {
    /// Human-readable resource string, e.g. `IO Output=0x123/4`.
    pub resource: String,
}

/// Output level outside its accepted domain.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A non-PWM output only accepts 0 or 255.
    #[error("wrong value '{value}', it must be 0 or 255 if PWM is not enabled")]
    NotBinary { value: u8 },

    /// `on` called with level 0.
    #[error("wrong value '0', it must be greater than 0")]
    ZeroOn,
}

/// Move target the selected strategy cannot reach.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PositionError {
    /// Target outside `0..=100`.
    #[error("wrong position '{position}', it must be between 0 and 100")]
    OutOfRange { position: f64 },

    /// An endpoint-only strategy was asked for an intermediate position.
    #[error("{strategy} does not support position '{position}'")]
    Unsupported {
        strategy: &'static str,
        position: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_conflict_with_resource_string() {
        let err = ConflictError {
            resource: "IO Output=0x123/4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "resource 'IO Output=0x123/4' is already used by another entity"
        );
    }

    #[test]
    fn should_wrap_conflict_into_top_level_error() {
        let err: IoPanelError = ConflictError {
            resource: "IO Input=0x123/0".to_string(),
        }
        .into();
        assert!(matches!(err, IoPanelError::Conflict(_)));
    }

    #[test]
    fn should_display_non_binary_value_error() {
        let err = ValueError::NotBinary { value: 17 };
        assert_eq!(
            err.to_string(),
            "wrong value '17', it must be 0 or 255 if PWM is not enabled"
        );
    }

    #[test]
    fn should_display_unsupported_position_with_strategy_name() {
        let err = PositionError::Unsupported {
            strategy: "Normally open",
            position: 50.0,
        };
        assert_eq!(err.to_string(), "Normally open does not support position '50'");
    }
}
