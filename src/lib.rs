//! Device Tracker
//!
//! Client for a GPS tracking device on the local network. Polls the device's
//! location, filters out errors and receiver jitter, decides when the map
//! camera should move, and switches the device buzzer.

pub mod core;
pub mod link;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{Position, TelemetryReading, TrackerState};
pub use link::{DeviceLink, HttpDeviceLink, LinkConfig, LinkError, LinkReply, MockDeviceLink};
pub use processing::{CameraIntent, ReconciliationEngine, StateChange, TelemetryClient, Transition};
pub use validation::{PayloadError, TelemetryFault};
pub use utils::{ConfigError, LogLevel, TrackerConfig};
pub use api::{
    CameraController, CameraTarget, CommandDispatcher, PollScheduler, StatusFormatter, Tracker,
    TrackerHandle, TrackerStats,
};
