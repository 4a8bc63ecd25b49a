//! Callback-based tracker API
//!
//! [`Tracker`] composes polling, reconciliation, camera control and buzzer
//! commands over a single device link. The presentation shell observes it by
//! registering callbacks and drives it through the operations below, usually
//! via [`crate::api::PollScheduler`].

use crate::api::camera::CameraController;
use crate::api::command::CommandDispatcher;
use crate::api::types::{CameraTarget, TrackerStats};
use crate::core::{TelemetryReading, TrackerState};
use crate::link::DeviceLink;
use crate::processing::{ReconciliationEngine, StateChange, TelemetryClient, Transition};
use crate::utils::TrackerConfig;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Callback invoked with the new state after every state change
pub type StateCallback = Box<dyn Fn(&TrackerState) + Send>;

/// Callback invoked for every camera movement handed to the map surface
pub type CameraCallback = Box<dyn Fn(CameraTarget) + Send>;

/// Consecutive failed polls after which a warning is logged
const FAILURE_WARN_THRESHOLD: u32 = 4;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Device tracker
pub struct Tracker<L> {
    telemetry: TelemetryClient<L>,
    dispatcher: CommandDispatcher<L>,
    engine: ReconciliationEngine,
    camera: CameraController,
    stats: TrackerStats,
    callback_counter: u32,
    state_callbacks: HashMap<CallbackHandle, StateCallback>,
    camera_callbacks: HashMap<CallbackHandle, CameraCallback>,
}

impl<L: DeviceLink + Clone> Tracker<L> {
    pub fn new(link: L, config: &TrackerConfig) -> Self {
        Self {
            telemetry: TelemetryClient::new(link.clone()),
            dispatcher: CommandDispatcher::new(link),
            engine: ReconciliationEngine::new(config.jitter_threshold_deg),
            camera: CameraController::new(config.default_target(), config.device_zoom),
            stats: TrackerStats::default(),
            callback_counter: 0,
            state_callbacks: HashMap::new(),
            camera_callbacks: HashMap::new(),
        }
    }
}

impl<L: DeviceLink> Tracker<L> {
    /// Register a state observer
    pub fn register_state_callback(&mut self, callback: StateCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.state_callbacks.insert(handle, callback);
        handle
    }

    /// Register a camera observer (the map surface)
    pub fn register_camera_callback(&mut self, callback: CameraCallback) -> CallbackHandle {
        let handle = self.next_handle();
        self.camera_callbacks.insert(handle, callback);
        handle
    }

    /// Remove a callback. Returns false for unknown handles.
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.state_callbacks.remove(&handle).is_some()
            || self.camera_callbacks.remove(&handle).is_some()
    }

    fn next_handle(&mut self) -> CallbackHandle {
        self.callback_counter += 1;
        CallbackHandle(self.callback_counter)
    }

    pub fn state(&self) -> &TrackerState {
        self.engine.state()
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Run one fetch and reconcile cycle
    pub async fn poll(&mut self) -> Transition {
        let reading = self.fetch().await;
        self.apply_reading(&reading)
    }

    async fn fetch(&mut self) -> TelemetryReading {
        let reading = self.telemetry.fetch_reading().await;
        self.stats.record_poll(reading.fault);
        if self.stats.consecutive_failures == FAILURE_WARN_THRESHOLD {
            warn!(
                "{} consecutive polls failed, still polling",
                self.stats.consecutive_failures
            );
        }
        reading
    }

    /// Reconcile a reading and notify observers. Safe to call with readings in any order.
    pub fn apply_reading(&mut self, reading: &TelemetryReading) -> Transition {
        let transition = self.update_state(reading);
        if let Some(target) = transition.intent.and_then(|i| self.camera.resolve(i)) {
            self.move_camera(target);
        }
        transition
    }

    /// Reconcile without acting on the camera intent
    fn update_state(&mut self, reading: &TelemetryReading) -> Transition {
        let previous = self.engine.state().clone();
        let transition = self.engine.apply(reading);

        if transition.change == StateChange::PositionUpdated {
            self.stats.position_updates += 1;
        }
        if transition.state != previous {
            self.notify_state();
        }
        transition
    }

    /// The map surface finished loading; flush any deferred camera request
    pub fn surface_ready(&mut self) {
        match self.camera.mark_surface_ready() {
            Some(target) => {
                debug!("Surface ready, flushing deferred camera request");
                self.dispatch_camera(target);
            }
            None => debug!("Surface ready"),
        }
    }

    /// Return to the default view and re-arm following for the next fix
    pub fn recenter_default(&mut self) -> CameraTarget {
        info!("Recentering to default view");
        if self.engine.reset_follow() {
            self.notify_state();
        }
        let target = self.camera.default_target();
        self.move_camera(target);
        target
    }

    /// Poll immediately, then center on the device if it has a fix, else on the default view
    pub async fn manual_refresh(&mut self) -> CameraTarget {
        info!("Manual refresh requested");
        let reading = self.fetch().await;
        // the refresh target replaces any follow move from this reading
        self.update_state(&reading);
        let target = self.camera.resolve_refresh(self.engine.state());
        self.move_camera(target);
        target
    }

    /// Switch the buzzer; state follows only an acknowledged command
    pub async fn set_buzzer(&mut self, on: bool) -> bool {
        let acknowledged = self.dispatcher.set_buzzer(on).await;
        if acknowledged {
            if self.engine.confirm_buzzer(on) {
                self.notify_state();
            }
        } else {
            self.stats.buzzer_failures += 1;
        }
        acknowledged
    }

    /// Flip the buzzer relative to the last confirmed state
    pub async fn toggle_buzzer(&mut self) -> bool {
        let on = !self.engine.state().buzzer_on;
        self.set_buzzer(on).await
    }

    fn move_camera(&mut self, target: CameraTarget) {
        if let Some(target) = self.camera.request(target) {
            self.dispatch_camera(target);
        }
    }

    fn dispatch_camera(&self, target: CameraTarget) {
        for callback in self.camera_callbacks.values() {
            callback(target);
        }
    }

    fn notify_state(&self) {
        let state = self.engine.state();
        for callback in self.state_callbacks.values() {
            callback(state);
        }
    }
}
