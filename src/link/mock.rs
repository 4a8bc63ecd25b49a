//! Mock device link for testing and development

use crate::core::REQUEST_TIMEOUT_MS;
use crate::link::{DeviceLink, LinkError, LinkReply, LinkResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// HTTP method of a recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMethod {
    Get,
    Post,
}

/// A request the mock has seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub method: LinkMethod,
    pub path: String,
}

#[derive(Debug, Default)]
struct MockState {
    get_replies: VecDeque<LinkResult<LinkReply>>,
    post_replies: VecDeque<LinkResult<LinkReply>>,
    requests: Vec<LinkRequest>,
    disconnected: bool,
}

/// Scripted device: replies are served in the order they were queued.
///
/// Clones share the same script, so a test can keep one clone for inspection
/// while the tracker owns another. An empty queue answers with
/// [`LinkError::ConnectionFailed`].
#[derive(Debug, Clone, Default)]
pub struct MockDeviceLink {
    state: Arc<Mutex<MockState>>,
}

impl MockDeviceLink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue the outcome of the next GET
    pub fn queue_get(&self, reply: LinkResult<LinkReply>) {
        self.lock().get_replies.push_back(reply);
    }

    /// Queue the outcome of the next POST
    pub fn queue_post(&self, reply: LinkResult<LinkReply>) {
        self.lock().post_replies.push_back(reply);
    }

    /// Queue a 200 location response with the given JSON body
    pub fn queue_location(&self, body: &str) {
        self.queue_get(Ok(LinkReply::ok(body)));
    }

    /// Queue a 200 location response carrying a fix
    pub fn queue_fix(&self, lat: f64, lon: f64, satellites: u32, hdop: f64) {
        let body = serde_json::json!({
            "lat": lat,
            "lon": lon,
            "satellites": satellites,
            "hdop": hdop,
        });
        self.queue_location(&body.to_string());
    }

    /// Queue a GET that times out
    pub fn queue_get_timeout(&self) {
        self.queue_get(Err(LinkError::Timeout { timeout_ms: REQUEST_TIMEOUT_MS }));
    }

    /// Queue a POST answered with `status`
    pub fn queue_post_status(&self, status: u16) {
        self.queue_post(Ok(LinkReply::new(status, "")));
    }

    /// Queue a POST that times out
    pub fn queue_post_timeout(&self) {
        self.queue_post(Err(LinkError::Timeout { timeout_ms: REQUEST_TIMEOUT_MS }));
    }

    /// Simulate the device dropping off the network
    pub fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    /// Restore the connection
    pub fn reconnect(&self) {
        self.lock().disconnected = false;
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<LinkRequest> {
        self.lock().requests.clone()
    }

    /// Number of GETs received
    pub fn get_count(&self) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == LinkMethod::Get)
            .count()
    }

    /// Replies still waiting to be served (GET, POST)
    pub fn queued_reply_count(&self) -> (usize, usize) {
        let state = self.lock();
        (state.get_replies.len(), state.post_replies.len())
    }

    fn serve(&self, method: LinkMethod, path: &str) -> LinkResult<LinkReply> {
        let mut state = self.lock();
        state.requests.push(LinkRequest {
            method,
            path: path.to_string(),
        });

        if state.disconnected {
            return Err(LinkError::ConnectionFailed {
                details: "mock device disconnected".to_string(),
            });
        }

        let queue = match method {
            LinkMethod::Get => &mut state.get_replies,
            LinkMethod::Post => &mut state.post_replies,
        };
        queue.pop_front().unwrap_or_else(|| {
            Err(LinkError::ConnectionFailed {
                details: format!("no scripted reply for {}", path),
            })
        })
    }
}

impl DeviceLink for MockDeviceLink {
    async fn get(&self, path: &str) -> LinkResult<LinkReply> {
        self.serve(LinkMethod::Get, path)
    }

    async fn post(&self, path: &str) -> LinkResult<LinkReply> {
        self.serve(LinkMethod::Post, path)
    }
}
