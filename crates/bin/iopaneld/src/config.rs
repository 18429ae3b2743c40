//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `iopanel.toml` in the working directory. The file is optional;
//! without it the daemon starts with no entities and default logging.
//! Environment variables take precedence over file values.

use serde::Deserialize;

use iopanel_domain::config::EntityOptions;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Entities to run, one `[[entities]]` table each.
    pub entities: Vec<EntityEntry>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// One configured entity: a platform plus the flat option record.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityEntry {
    /// Which adapter to build.
    pub platform: Platform,
    /// Display name for logs.
    pub name: Option<String>,
    /// Platform options (`address`, `output`, `timeout`, …).
    #[serde(flatten)]
    pub options: EntityOptions,
}

/// The supported entity platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    BinarySensor,
    Cover,
    Event,
    Light,
    Sensor,
    Siren,
    Switch,
    Valve,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Cover => "cover",
            Self::Event => "event",
            Self::Light => "light",
            Self::Sensor => "sensor",
            Self::Siren => "siren",
            Self::Switch => "switch",
            Self::Valve => "valve",
        }
    }
}

impl Config {
    /// Load configuration from `iopanel.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("iopanel.toml")?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("IOPANEL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "iopaneld=info,iopanel=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
}
