//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `minirelay.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device configuration tree location.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Pin assignment of the relay board.
    pub board: BoardConfig,
    /// Simulated power metering.
    pub power_meter: PowerMeterConfig,
}

/// Where the device configuration tree lives.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON file.
    pub path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Both channels of the board.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub sw1: ChannelConfig,
    pub sw2: ChannelConfig,
}

/// Pins of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    pub input_pin: u8,
    #[serde(default)]
    pub input_inverted: bool,
    pub output_pin: u8,
    #[serde(default)]
    pub output_inverted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PowerMeterConfig {
    pub enabled: bool,
    /// Power drawn by the simulated load while its relay is on, in watts.
    pub load_w: f64,
    /// Sampling period, in seconds.
    pub interval_secs: u64,
}

impl Config {
    /// Load configuration from `minirelay.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("minirelay.toml")?;
        config.apply_env_overrides();
        config.validate()?;
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
        if let Ok(val) = std::env::var("MINIRELAY_STATE_PATH") {
            self.storage.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("MINIRELAY_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pins = [
            self.board.sw1.input_pin,
            self.board.sw1.output_pin,
            self.board.sw2.input_pin,
            self.board.sw2.output_pin,
        ];
        for (idx, pin) in pins.iter().enumerate() {
            if pins[idx + 1..].contains(pin) {
                return Err(ConfigError::Validation(format!("pin {pin} assigned twice")));
            }
        }
        if self.power_meter.enabled {
            if self.power_meter.interval_secs == 0 {
                return Err(ConfigError::Validation(
                    "power meter interval must be non-zero".to_string(),
                ));
            }
            if !self.power_meter.load_w.is_finite() || self.power_meter.load_w < 0.0 {
                return Err(ConfigError::Validation(
                    "power meter load must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl PowerMeterConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("minirelay.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "minirelayd=info,minirelay_app=info,minirelay_adapter_storage_json=info"
                .to_string(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            sw1: ChannelConfig {
                input_pin: 13,
                input_inverted: false,
                output_pin: 4,
                output_inverted: false,
            },
            sw2: ChannelConfig {
                input_pin: 5,
                input_inverted: false,
                output_pin: 15,
                output_inverted: false,
            },
        }
    }
}

impl Default for PowerMeterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            load_w: 60.0,
            interval_secs: 1,
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
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.path, PathBuf::from("minirelay.json"));
        assert_eq!(config.board.sw1.output_pin, 4);
        assert_eq!(config.board.sw2.input_pin, 5);
        assert!(!config.power_meter.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.board.sw1.input_pin, 13);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [storage]
            path = '/var/lib/minirelay/state.json'

            [logging]
            filter = 'debug'

            [board.sw1]
            input_pin = 1
            input_inverted = true
            output_pin = 2

            [board.sw2]
            input_pin = 3
            output_pin = 4
            output_inverted = true

            [power_meter]
            enabled = true
            load_w = 1500.0
            interval_secs = 5
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.storage.path,
            PathBuf::from("/var/lib/minirelay/state.json")
        );
        assert_eq!(config.logging.filter, "debug");
        assert!(config.board.sw1.input_inverted);
        assert!(!config.board.sw1.output_inverted);
        assert!(config.board.sw2.output_inverted);
        assert!(config.power_meter.enabled);
        assert_eq!(config.power_meter.interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.board.sw2.output_pin, 15);
    }

    #[test]
    fn should_reject_shared_pin() {
        let mut config = Config::default();
        config.board.sw2.output_pin = config.board.sw1.output_pin;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_interval_when_metering() {
        let mut config = Config::default();
        config.power_meter.enabled = true;
        config.power_meter.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_ignore_meter_settings_when_disabled() {
        let mut config = Config::default();
        config.power_meter.interval_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
