//! Common API types and data structures

use crate::core::Position;
use crate::validation::TelemetryFault;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the map camera should animate to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTarget {
    pub position: Position,
    pub zoom: f64,
}

impl CameraTarget {
    pub fn new(position: Position, zoom: f64) -> Self {
        Self { position, zoom }
    }
}

impl fmt::Display for CameraTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}, {:.6} @ zoom {:.2}",
            self.position.latitude, self.position.longitude, self.zoom
        )
    }
}

/// Polling counters kept for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerStats {
    /// Polls issued, scheduled or manual
    pub polls: u32,
    /// Readings that replaced the stored position
    pub position_updates: u32,
    /// Readings with a device-reported error
    pub device_errors: u32,
    /// Polls that failed in transport, protocol or payload
    pub link_failures: u32,
    /// Failed polls since the last successful one
    pub consecutive_failures: u32,
    /// Buzzer commands the device did not acknowledge
    pub buzzer_failures: u32,
}

impl TrackerStats {
    /// Count a poll outcome. `fault` is the reading's fault, if any.
    pub fn record_poll(&mut self, fault: Option<TelemetryFault>) {
        self.polls += 1;
        match fault {
            Some(TelemetryFault::DeviceReported) => {
                self.device_errors += 1;
                self.consecutive_failures = 0;
            }
            Some(_) => {
                self.link_failures += 1;
                self.consecutive_failures += 1;
            }
            None => self.consecutive_failures = 0,
        }
    }
}
