//! Transport layer between the client and the tracked device
//!
//! The [`DeviceLink`] trait hides how requests reach the device. The HTTP
//! implementation is used at runtime; the mock drives tests and demos.

pub mod device;
pub mod error;
pub mod http;
pub mod mock;

pub use device::{DeviceLink, LinkConfig};
pub use error::{LinkError, LinkResult};
pub use http::HttpDeviceLink;
pub use mock::{LinkMethod, LinkRequest, MockDeviceLink};

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq)]
pub struct LinkReply {
    pub status: u16,
    pub body: String,
}

impl LinkReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}
