//! Core data types for device tracking

use crate::validation::error::TelemetryFault;
use serde::{Deserialize, Serialize};

/// Geodetic position reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when either axis moved strictly more than `threshold_deg`.
    pub fn differs_from(&self, other: &Position, threshold_deg: f64) -> bool {
        (self.latitude - other.latitude).abs() > threshold_deg
            || (self.longitude - other.longitude).abs() > threshold_deg
    }
}

/// Outcome of a single location poll
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetryReading {
    pub position: Option<Position>,
    pub satellite_count: Option<u32>,
    pub hdop: Option<f64>,
    pub error_message: Option<String>,
    /// Where the error came from, when there is one
    pub fault: Option<TelemetryFault>,
}

impl TelemetryReading {
    /// A valid fix
    pub fn fix(position: Position, satellite_count: Option<u32>, hdop: Option<f64>) -> Self {
        Self {
            position: Some(position),
            satellite_count,
            hdop,
            ..Default::default()
        }
    }

    /// The device answered but reported an error of its own
    pub fn device_error(message: impl Into<String>, satellite_count: Option<u32>) -> Self {
        Self {
            satellite_count,
            error_message: Some(message.into()),
            fault: Some(TelemetryFault::DeviceReported),
            ..Default::default()
        }
    }

    /// The poll failed before a usable payload arrived. Numeric fields stay empty.
    pub fn failed(fault: TelemetryFault, message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            fault: Some(fault),
            ..Default::default()
        }
    }

    /// A 200 response without a usable position or error
    pub fn invalid() -> Self {
        Self {
            fault: Some(TelemetryFault::Payload),
            ..Default::default()
        }
    }

    /// An error the user should see; only these reach `last_error`
    pub fn is_device_error(&self) -> bool {
        self.error_message.is_some() && self.fault.is_some_and(|f| f.is_surfaced())
    }
}

/// Everything the client knows about the device.
///
/// Values are never mutated in place; each transition produces a new state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerState {
    pub last_good_position: Option<Position>,
    pub satellite_count: Option<u32>,
    pub hdop: Option<f64>,
    pub last_error: Option<String>,
    pub has_followed_device: bool,
    pub buzzer_on: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fix(&self) -> bool {
        self.last_good_position.is_some()
    }
}
