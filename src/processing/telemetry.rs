//! Location polling client

use crate::core::{TelemetryReading, LOCATION_PATH};
use crate::link::DeviceLink;
use crate::processing::parser::PayloadParser;
use crate::validation::TelemetryFault;
use log::{debug, warn};

/// Fetches one reading from the device per call
pub struct TelemetryClient<L> {
    link: L,
    parser: PayloadParser,
}

impl<L: DeviceLink> TelemetryClient<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            parser: PayloadParser::new(),
        }
    }

    /// Poll `/location` once. Never fails: every failure becomes a reading.
    ///
    /// Transport and status details go to the log only; the reading carries a
    /// short message and the fault class.
    pub async fn fetch_reading(&self) -> TelemetryReading {
        let reply = match self.link.get(LOCATION_PATH).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Location poll failed: {}", e);
                let message = if e.is_timeout() {
                    "Device did not respond"
                } else {
                    "Device unreachable"
                };
                return TelemetryReading::failed(TelemetryFault::Transport, message);
            }
        };

        if !reply.is_ok() {
            warn!("Location poll returned HTTP {}", reply.status);
            return TelemetryReading::failed(
                TelemetryFault::Protocol,
                format!("Device returned HTTP {}", reply.status),
            );
        }

        match self.parser.parse(&reply.body) {
            Ok(reading) => {
                debug!(
                    "Location reading: position={:?} satellites={:?} hdop={:?} error={:?}",
                    reading.position, reading.satellite_count, reading.hdop, reading.error_message
                );
                reading
            }
            Err(e) => {
                warn!("Discarding location payload: {}", e);
                TelemetryReading::invalid()
            }
        }
    }
}
