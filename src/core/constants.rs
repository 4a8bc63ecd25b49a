//! Device endpoint and tracking parameters

use crate::core::Position;

/// Address of the tracked device on the local network
pub const DEVICE_ADDRESS: &str = "192.168.4.1";

/// Path polled for the device's GPS report
pub const LOCATION_PATH: &str = "/location";

/// Path that switches the device buzzer
pub const BUZZER_PATH: &str = "/buzzer";

/// Timeout applied to every request sent to the device (milliseconds)
pub const REQUEST_TIMEOUT_MS: u64 = 3_000;

/// Interval between scheduled location polls (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 15_000;

/// Per-axis movement (degrees) a fix must exceed to replace the stored one.
/// Roughly 10 m; it suppresses receiver jitter, it is not an accuracy figure.
pub const JITTER_THRESHOLD_DEG: f64 = 0.0001;

/// Zoom used when the camera follows the device
pub const DEVICE_ZOOM: f64 = 18.0;

/// Zoom of the default preview
pub const DEFAULT_ZOOM: f64 = 14.4746;

/// Default preview location shown before the first fix and on recenter
pub const DEFAULT_LOCATION: Position = Position {
    latitude: 37.42796133580664,
    longitude: -122.085749655962,
};
