//! Device link trait and configuration

use crate::core::{DEVICE_ADDRESS, REQUEST_TIMEOUT_MS};
use crate::link::{LinkError, LinkReply, LinkResult};
use serde::{Deserialize, Serialize};

/// Request/response channel to the tracked device.
///
/// A reply with a non-200 status is still `Ok`: the round-trip completed and
/// interpreting the status is up to the caller.
#[allow(async_fn_in_trait)]
pub trait DeviceLink {
    /// Issue a GET for `path` (e.g. `/location`)
    async fn get(&self, path: &str) -> LinkResult<LinkReply>;

    /// Issue a POST for `path`, query string included
    async fn post(&self, path: &str) -> LinkResult<LinkReply>;
}

/// Where the device lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Host or host:port of the device, without scheme
    pub device_address: String,
    /// Timeout applied to each request (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device_address: DEVICE_ADDRESS.to_string(),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    pub fn new(device_address: impl Into<String>) -> Self {
        Self {
            device_address: device_address.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Base URL every request path is appended to
    pub fn base_url(&self) -> String {
        format!("http://{}", self.device_address)
    }

    pub fn validate(&self) -> LinkResult<()> {
        let address = self.device_address.trim();
        if address.is_empty()
            || address.contains("://")
            || address.contains('/')
            || address.chars().any(char::is_whitespace)
        {
            return Err(LinkError::ConfigurationError {
                parameter: "device_address".to_string(),
                value: self.device_address.clone(),
            });
        }

        if self.request_timeout_ms == 0 {
            return Err(LinkError::ConfigurationError {
                parameter: "request_timeout_ms".to_string(),
                value: self.request_timeout_ms.to_string(),
            });
        }

        Ok(())
    }
}
