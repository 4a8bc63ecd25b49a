//! Error taxonomy for telemetry polling

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of everything that can go wrong while polling the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TelemetryFault {
    /// Timeout, refused connection, DNS failure
    Transport,
    /// The device answered with a status other than 200
    Protocol,
    /// Body was not JSON or fields were not numeric
    Payload,
    /// The payload carried an explicit `error` field
    DeviceReported,
}

impl TelemetryFault {
    /// Whether the fault is shown to the user. Everything else is log-only.
    pub fn is_surfaced(&self) -> bool {
        matches!(self, TelemetryFault::DeviceReported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TelemetryFault::Transport => "transport",
            TelemetryFault::Protocol => "protocol",
            TelemetryFault::Payload => "payload",
            TelemetryFault::DeviceReported => "device",
        }
    }
}

impl fmt::Display for TelemetryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a 200 response body could not be turned into a reading
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// Body is not valid JSON
    InvalidJson { details: String },
    /// Body is JSON but not an object
    NotAnObject,
    /// A coordinate is missing or not numeric
    MissingCoordinate { field: &'static str },
    /// A coordinate parsed but is not a usable value
    CoordinateOutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::InvalidJson { details } => write!(f, "Invalid JSON payload: {}", details),
            PayloadError::NotAnObject => write!(f, "Payload is not a JSON object"),
            PayloadError::MissingCoordinate { field } => {
                write!(f, "Missing or non-numeric field '{}'", field)
            }
            PayloadError::CoordinateOutOfRange { field, value } => {
                write!(f, "Field '{}' out of range: {}", field, value)
            }
        }
    }
}

impl std::error::Error for PayloadError {}
