//! Parsing of the device's `/location` payload
//!
//! The firmware is loose about types: numbers sometimes arrive as strings.
//! Every field is coerced tolerantly; anything that still does not parse is
//! treated as unknown.

use crate::core::TelemetryReading;
use crate::validation::{CoordinateValidator, PayloadError};
use serde_json::{Map, Value};

/// Parser for location payloads
pub struct PayloadParser {
    validator: CoordinateValidator,
}

impl Default for PayloadParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadParser {
    pub fn new() -> Self {
        Self {
            validator: CoordinateValidator::new(),
        }
    }

    /// Parse the body of a 200 response.
    ///
    /// A non-null `error` field wins over everything else, and the position is
    /// not read in that case. Otherwise both `lat` and `lon` must parse.
    pub fn parse(&self, body: &str) -> Result<TelemetryReading, PayloadError> {
        let value: Value = serde_json::from_str(body).map_err(|e| PayloadError::InvalidJson {
            details: e.to_string(),
        })?;
        let fields = value.as_object().ok_or(PayloadError::NotAnObject)?;

        if let Some(error) = fields.get("error").filter(|v| !v.is_null()) {
            return Ok(TelemetryReading::device_error(
                stringify(error),
                coerce_u32(fields.get("satellites")),
            ));
        }

        let latitude = required_f64(fields, "lat")?;
        let longitude = required_f64(fields, "lon")?;
        let position = self.validator.validate(latitude, longitude)?;

        Ok(TelemetryReading::fix(
            position,
            coerce_u32(fields.get("satellites")),
            coerce_f64(fields.get("hdop")).filter(|h| h.is_finite()),
        ))
    }
}

fn required_f64(fields: &Map<String, Value>, field: &'static str) -> Result<f64, PayloadError> {
    coerce_f64(fields.get(field)).ok_or(PayloadError::MissingCoordinate { field })
}

/// Strings are used verbatim; any other value uses its JSON text
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Number or numeric string as `f64`
pub fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Non-negative integer, or numeric string holding one, as `u32`
pub fn coerce_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => match n.as_u64() {
            Some(v) => u32::try_from(v).ok(),
            None => n.as_f64().and_then(whole_count),
        },
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    }
}

// 7.0 is still a count; 7.5 is not
fn whole_count(v: f64) -> Option<u32> {
    (v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64).then_some(v as u32)
}
