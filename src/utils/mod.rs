//! Configuration

pub mod config;

pub use config::{ConfigError, ConfigResult, LogLevel, TrackerConfig};
