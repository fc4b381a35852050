//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock device behavior: factory axis bounds, a `-15..=15` deadzone and a
//! 50 Hz acquisition loop.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::acquisition::{LOG_INTERVAL_CYCLES, POLL_INTERVAL_MS};
use crate::error::{BridgeError, Result};
use crate::joystick::tracker::{
    AxisTracker, Deadzone, ADC_MAX, DEADZONE_CEIL, DEADZONE_FLOOR, OUTPUT_MAX, OUTPUT_MIN,
    ROTATION_DEFAULT_BOUNDS, STICK_DEFAULT_BOUNDS,
};

/// Supported serial baud rates.
const SUPPORTED_BAUD_RATES: &[u32] = &[9600, 57600, 115200, 230400, 460800, 921600];

/// Supported log levels.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub axes: AxesConfig,
    pub mapping: MappingConfig,
    pub acquisition: AcquisitionConfig,
    pub input: InputConfig,
    pub transport: TransportConfig,
    pub logging: LoggingConfig,
}

/// Initial bounds estimate for one axis
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AxisBounds {
    pub min: u16,
    pub max: u16,
}

impl AxisBounds {
    /// Creates a tracker starting from these bounds.
    #[must_use]
    pub fn tracker(&self) -> AxisTracker {
        AxisTracker::new(self.min, self.max)
    }
}

/// Initial bounds for all three axes
#[derive(Debug, Deserialize, Clone)]
#[serde(from = "AxesSection")]
pub struct AxesConfig {
    pub horizontal: AxisBounds,
    pub vertical: AxisBounds,
    pub rotation: AxisBounds,
}

/// One `[axes.*]` table as written. Either bound may be left out.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct PartialAxisBounds {
    pub min: Option<u16>,
    pub max: Option<u16>,
}

impl PartialAxisBounds {
    /// Fills missing bounds from `fallback`.
    #[must_use]
    pub fn resolve(self, fallback: AxisBounds) -> AxisBounds {
        AxisBounds {
            min: self.min.unwrap_or(fallback.min),
            max: self.max.unwrap_or(fallback.max),
        }
    }
}

/// The `[axes]` section as written, before factory bounds fill the gaps.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AxesSection {
    pub horizontal: PartialAxisBounds,
    pub vertical: PartialAxisBounds,
    pub rotation: PartialAxisBounds,
}

impl From<AxesSection> for AxesConfig {
    fn from(section: AxesSection) -> Self {
        Self {
            horizontal: section.horizontal.resolve(default_stick_bounds()),
            vertical: section.vertical.resolve(default_stick_bounds()),
            rotation: section.rotation.resolve(default_rotation_bounds()),
        }
    }
}

/// Output mapping configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    #[serde(default = "default_deadzone_floor")]
    pub deadzone_floor: i16,

    #[serde(default = "default_deadzone_ceil")]
    pub deadzone_ceil: i16,
}

impl MappingConfig {
    /// Deadzone described by this configuration.
    #[must_use]
    pub fn deadzone(&self) -> Deadzone {
        Deadzone::new(self.deadzone_floor, self.deadzone_ceil)
    }
}

/// Acquisition loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AcquisitionConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_log_interval_cycles")]
    pub log_interval_cycles: u64,
}

/// Bench feed serial configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_input_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Host link serial configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    /// Empty means auto-detect.
    #[serde(default)]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

// Default value functions
fn default_stick_bounds() -> AxisBounds {
    AxisBounds { min: STICK_DEFAULT_BOUNDS.0, max: STICK_DEFAULT_BOUNDS.1 }
}
fn default_rotation_bounds() -> AxisBounds {
    AxisBounds { min: ROTATION_DEFAULT_BOUNDS.0, max: ROTATION_DEFAULT_BOUNDS.1 }
}

fn default_deadzone_floor() -> i16 { DEADZONE_FLOOR }
fn default_deadzone_ceil() -> i16 { DEADZONE_CEIL }

fn default_poll_interval_ms() -> u64 { POLL_INTERVAL_MS }
fn default_log_interval_cycles() -> u64 { LOG_INTERVAL_CYCLES }

fn default_input_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 115200 }

fn default_log_level() -> String { "info".to_string() }

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            horizontal: default_stick_bounds(),
            vertical: default_stick_bounds(),
            rotation: default_rotation_bounds(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            deadzone_floor: default_deadzone_floor(),
            deadzone_ceil: default_deadzone_ceil(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            log_interval_cycles: default_log_interval_cycles(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            port: default_input_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamepad_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `Config` if parsing or validation fails.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate axis bounds
        for (name, bounds) in [
            ("horizontal", self.axes.horizontal),
            ("vertical", self.axes.vertical),
            ("rotation", self.axes.rotation),
        ] {
            if bounds.min > bounds.max {
                return Err(invalid(format!("axes.{} min must not exceed max", name)));
            }
            if bounds.max > ADC_MAX {
                return Err(invalid(format!("axes.{} max must be at most {}", name, ADC_MAX)));
            }
        }

        // Validate deadzone
        if self.mapping.deadzone_floor < OUTPUT_MIN || self.mapping.deadzone_floor > 0 {
            return Err(invalid(format!(
                "deadzone_floor must be between {} and 0",
                OUTPUT_MIN
            )));
        }

        if self.mapping.deadzone_ceil < 0 || self.mapping.deadzone_ceil > OUTPUT_MAX {
            return Err(invalid(format!(
                "deadzone_ceil must be between 0 and {}",
                OUTPUT_MAX
            )));
        }

        // Validate timing fields
        if self.acquisition.poll_interval_ms == 0 || self.acquisition.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        if self.acquisition.log_interval_cycles == 0 {
            return Err(invalid("log_interval_cycles must be greater than 0"));
        }

        // Validate serial ports (transport port may be empty: auto-detect)
        if self.input.port.is_empty() {
            return Err(invalid("input port cannot be empty"));
        }

        for (name, rate) in [
            ("input", self.input.baud_rate),
            ("transport", self.transport.baud_rate),
        ] {
            if !SUPPORTED_BAUD_RATES.contains(&rate) {
                return Err(invalid(format!(
                    "{} baud_rate must be one of: {:?}",
                    name, SUPPORTED_BAUD_RATES
                )));
            }
        }

        // Validate logging
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "logging level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        if matches!(&self.logging.directory, Some(dir) if dir.is_empty()) {
            return Err(invalid("logging directory cannot be empty when set"));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> BridgeError {
    BridgeError::Config(toml::de::Error::custom(msg))
}
