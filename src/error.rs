//! # Error Types
//!
//! Custom error types for Gamepad Bridge using `thiserror`.
//!
//! The joystick core never fails: degenerate calibration and out-of-range
//! mappings resolve to numeric fallbacks. Errors only come from the
//! host-side shell (configuration, serial ports, the bench feed).

use thiserror::Error;

/// Main error type for Gamepad Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// None of the candidate serial devices could be opened
    #[error("No serial device found (tried: {0})")]
    SerialPortNotFound(String),

    /// A bench feed line could not be parsed into a sample frame
    #[error("Malformed sample line: {0}")]
    SampleParse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gamepad Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
