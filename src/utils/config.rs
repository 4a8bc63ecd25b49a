use crate::api::types::CameraTarget;
use crate::core::{
    Position, DEFAULT_LOCATION, DEFAULT_ZOOM, DEVICE_ZOOM, JITTER_THRESHOLD_DEG, POLL_INTERVAL_MS,
};
use crate::link::{LinkConfig, LinkError};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Tracker configuration. Defaults come from [`crate::core::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Device address and request timeout
    pub link: LinkConfig,
    /// Interval between scheduled polls (milliseconds)
    pub poll_interval_ms: u64,
    /// Per-axis movement a fix must exceed to be shown (degrees)
    pub jitter_threshold_deg: f64,
    /// Zoom used when following the device
    pub device_zoom: f64,
    /// View shown before the first fix and on recenter
    pub default_location: Position,
    pub default_zoom: f64,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LogLevel,
}

/// Logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and info messages
    Info,
    /// All messages including debug
    Debug,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::None => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Device link settings rejected
    Link(LinkError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid {} = {}: {}", parameter, value, reason)
            }
            ConfigError::Link(e) => write!(f, "Invalid link settings: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<LinkError> for ConfigError {
    fn from(error: LinkError) -> Self {
        ConfigError::Link(error)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            poll_interval_ms: POLL_INTERVAL_MS,
            jitter_threshold_deg: JITTER_THRESHOLD_DEG,
            device_zoom: DEVICE_ZOOM,
            default_location: DEFAULT_LOCATION,
            default_zoom: DEFAULT_ZOOM,
            log_level: LogLevel::Info,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_address(mut self, address: impl Into<String>) -> Self {
        self.link.device_address = address.into();
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.link.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    pub fn with_jitter_threshold(mut self, threshold_deg: f64) -> Self {
        self.jitter_threshold_deg = threshold_deg;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn default_target(&self) -> CameraTarget {
        CameraTarget::new(self.default_location, self.default_zoom)
    }

    /// Check every parameter; the first problem found is returned
    pub fn validate(&self) -> ConfigResult<()> {
        self.link.validate()?;

        // Polls must not overlap under normal latency
        if self.poll_interval_ms <= self.link.request_timeout_ms {
            return Err(ConfigError::InvalidParameter {
                parameter: "poll_interval_ms".to_string(),
                value: self.poll_interval_ms.to_string(),
                reason: format!(
                    "must exceed the request timeout of {}ms",
                    self.link.request_timeout_ms
                ),
            });
        }

        if !self.jitter_threshold_deg.is_finite() || self.jitter_threshold_deg < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "jitter_threshold_deg".to_string(),
                value: self.jitter_threshold_deg.to_string(),
                reason: "must be a non-negative number of degrees".to_string(),
            });
        }

        for (parameter, zoom) in [("device_zoom", self.device_zoom), ("default_zoom", self.default_zoom)] {
            if !(0.0..=22.0).contains(&zoom) {
                return Err(ConfigError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value: zoom.to_string(),
                    reason: "zoom must be between 0 and 22".to_string(),
                });
            }
        }

        let Position { latitude, longitude } = self.default_location;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidParameter {
                parameter: "default_location".to_string(),
                value: format!("({}, {})", latitude, longitude),
                reason: "outside WGS84 coordinate ranges".to_string(),
            });
        }

        Ok(())
    }
}
