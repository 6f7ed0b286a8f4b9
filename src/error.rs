//! Unified error types for the intruder alarm.
//!
//! Two very different kinds of failure exist:
//!
//! - **Startup faults** ([`Error`]): hardware unavailable, log file
//!   unopenable, configuration rejected.  These abort the process before
//!   the polling loop is entered.
//! - **Sensor faults** ([`SensorFault`]): echo timeouts and implausible
//!   distances.  These are routine under electrical noise and never leave
//!   the polling cycle; the caller only sees an invalid reading.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fatal (startup-time) failure funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(String),
    /// The detection log could not be opened or written.
    Sink(io::Error),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "hardware init: {msg}"),
            Self::Sink(e) => write!(f, "detection log: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink(e) => Some(e),
            Self::Init(_) | Self::Config(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Sink(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Why a single range measurement was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorFault {
    /// Echo never went high within the timeout.
    EchoRiseTimeout,
    /// Echo stayed high past the timeout.
    EchoFallTimeout,
    /// Computed distance lies outside the sensor's usable range.
    OutOfRange(f32),
    /// Trigger write or echo read failed at the pin driver.
    PinFault,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoRiseTimeout => write!(f, "timeout waiting for echo rise"),
            Self::EchoFallTimeout => write!(f, "timeout waiting for echo fall"),
            Self::OutOfRange(cm) => write!(f, "invalid distance measurement: {cm:.2} cm"),
            Self::PinFault => write!(f, "GPIO access failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating [`AlertConfig`](crate::config::AlertConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Io(io::Error),
    /// Config file is not valid JSON for the expected shape.
    Corrupted(serde_json::Error),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Corrupted(e) => write!(f, "config corrupted: {e}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
