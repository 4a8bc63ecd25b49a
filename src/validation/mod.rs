//! Payload validation and the telemetry error taxonomy

pub mod data;
pub mod error;

pub use data::CoordinateValidator;
pub use error::{PayloadError, TelemetryFault};
