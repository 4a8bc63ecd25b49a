//! HTTP implementation of the device link

use crate::link::{DeviceLink, LinkConfig, LinkError, LinkReply, LinkResult};
use log::trace;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Talks plain HTTP to the device with a bounded per-request timeout
#[derive(Clone)]
pub struct HttpDeviceLink {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpDeviceLink {
    pub fn new(config: &LinkConfig) -> LinkResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| LinkError::ConfigurationError {
                parameter: "http_client".to_string(),
                value: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            timeout_ms: config.request_timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> LinkResult<LinkReply> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        Ok(LinkReply { status, body })
    }

    fn classify(&self, error: reqwest::Error) -> LinkError {
        if error.is_timeout() {
            LinkError::Timeout { timeout_ms: self.timeout_ms }
        } else if error.is_connect() {
            LinkError::ConnectionFailed { details: error.to_string() }
        } else {
            LinkError::Transport { details: error.to_string() }
        }
    }
}

impl DeviceLink for HttpDeviceLink {
    async fn get(&self, path: &str) -> LinkResult<LinkReply> {
        let url = self.url(path);
        trace!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn post(&self, path: &str) -> LinkResult<LinkReply> {
        let url = self.url(path);
        trace!("POST {}", url);
        self.send(self.client.post(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_config() {
        assert!(HttpDeviceLink::new(&LinkConfig::new("")).is_err());

        let link = HttpDeviceLink::new(&LinkConfig::new("10.0.0.7").with_timeout_ms(500)).unwrap();
        assert_eq!(link.base_url(), "http://10.0.0.7");
        assert_eq!(link.timeout_ms, 500);
        assert_eq!(link.url("/location"), "http://10.0.0.7/location");
    }
}
