//! Buzzer command dispatch

use crate::core::BUZZER_PATH;
use crate::link::DeviceLink;
use log::{info, warn};

/// Path and query for a buzzer command
pub fn buzzer_path(on: bool) -> String {
    format!("{}?state={}", BUZZER_PATH, if on { "on" } else { "off" })
}

/// Sends buzzer commands to the device.
///
/// Commands are idempotent on the device, so repeats are not suppressed.
/// Callers should derive the next command from the last confirmed state.
pub struct CommandDispatcher<L> {
    link: L,
}

impl<L: DeviceLink> CommandDispatcher<L> {
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Switch the buzzer. True only when the device answered 200.
    pub async fn set_buzzer(&self, on: bool) -> bool {
        match self.link.post(&buzzer_path(on)).await {
            Ok(reply) if reply.is_ok() => {
                info!("Buzzer switched {}", if on { "on" } else { "off" });
                true
            }
            Ok(reply) => {
                warn!("Buzzer command rejected with HTTP {}", reply.status);
                false
            }
            Err(e) => {
                warn!("Buzzer command failed: {}", e);
                false
            }
        }
    }
}
