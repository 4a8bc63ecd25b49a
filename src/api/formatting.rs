//! Status text for the presentation shell
//!
//! Renders a [`TrackerState`] into the lines the client shows under the map,
//! and into a JSON snapshot for diagnostics.

use crate::core::TrackerState;
use serde::Serialize;
use std::fmt;

/// Rendered status lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLines {
    pub position: String,
    pub satellites: String,
    pub hdop: String,
    /// Present only while the device reports an error
    pub error_banner: Option<String>,
    pub buzzer_label: String,
}

impl fmt::Display for StatusLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position)?;
        write!(f, "{} | {}", self.satellites, self.hdop)?;
        if let Some(banner) = &self.error_banner {
            write!(f, "\n{}", banner)?;
        }
        write!(f, "\n[{}]", self.buzzer_label)
    }
}

/// Formats tracker state for display
#[derive(Debug, Clone)]
pub struct StatusFormatter {
    /// Decimal places for coordinates
    pub coordinate_precision: usize,
}

impl Default for StatusFormatter {
    fn default() -> Self {
        Self { coordinate_precision: 6 }
    }
}

impl StatusFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.coordinate_precision = precision;
        self
    }

    pub fn render(&self, state: &TrackerState) -> StatusLines {
        StatusLines {
            position: self.position_line(state),
            satellites: self.satellites_line(state),
            hdop: self.hdop_line(state),
            error_banner: self.error_banner(state),
            buzzer_label: self.buzzer_label(state).to_string(),
        }
    }

    pub fn position_line(&self, state: &TrackerState) -> String {
        match state.last_good_position {
            Some(p) => format!(
                "Lat: {:.prec$}, Lon: {:.prec$}",
                p.latitude,
                p.longitude,
                prec = self.coordinate_precision
            ),
            None => "Waiting for GPS fix...".to_string(),
        }
    }

    pub fn satellites_line(&self, state: &TrackerState) -> String {
        match state.satellite_count {
            Some(n) => format!("Satellites: {}", n),
            None => "Satellites: --".to_string(),
        }
    }

    pub fn hdop_line(&self, state: &TrackerState) -> String {
        match state.hdop {
            Some(h) => format!("HDOP: {:.1}", h),
            None => "HDOP: --".to_string(),
        }
    }

    pub fn error_banner(&self, state: &TrackerState) -> Option<String> {
        state.last_error.as_ref().map(|e| format!("GPS error: {}", e))
    }

    /// Label of the button, describing what pressing it will do
    pub fn buzzer_label(&self, state: &TrackerState) -> &'static str {
        if state.buzzer_on {
            "Turn buzzer off"
        } else {
            "Turn buzzer on"
        }
    }

    /// JSON snapshot of the full state
    pub fn snapshot_json(&self, state: &TrackerState) -> serde_json::Result<String> {
        serde_json::to_string(state)
    }
}
