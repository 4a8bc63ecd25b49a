use crate::core::Position;
use crate::validation::error::PayloadError;

/// Range checks applied to coordinates before they become a [`Position`]
#[derive(Debug, Clone)]
pub struct CoordinateValidator {
    /// Reject coordinates outside the WGS84 ranges
    pub enforce_ranges: bool,
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self { enforce_ranges: true }
    }
}

impl CoordinateValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, latitude: f64, longitude: f64) -> Result<Position, PayloadError> {
        Self::check_axis("lat", latitude, 90.0, self.enforce_ranges)?;
        Self::check_axis("lon", longitude, 180.0, self.enforce_ranges)?;
        Ok(Position::new(latitude, longitude))
    }

    fn check_axis(field: &'static str, value: f64, limit: f64, enforce: bool) -> Result<(), PayloadError> {
        if !value.is_finite() || (enforce && value.abs() > limit) {
            return Err(PayloadError::CoordinateOutOfRange { field, value });
        }
        Ok(())
    }
}
