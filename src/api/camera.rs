//! Camera intent resolution
//!
//! Turns camera intents into concrete targets for the map surface and holds
//! back requests made before the surface exists.

use crate::api::types::CameraTarget;
use crate::core::{Position, TrackerState, DEFAULT_LOCATION, DEFAULT_ZOOM, DEVICE_ZOOM};
use crate::processing::CameraIntent;
use log::debug;

/// Resolves intents into targets and defers them until the surface is ready
#[derive(Debug, Clone)]
pub struct CameraController {
    default_target: CameraTarget,
    device_zoom: f64,
    surface_ready: bool,
    /// Latest request made before the surface was ready
    pending: Option<CameraTarget>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraTarget::new(DEFAULT_LOCATION, DEFAULT_ZOOM), DEVICE_ZOOM)
    }
}

impl CameraController {
    pub fn new(default_target: CameraTarget, device_zoom: f64) -> Self {
        Self {
            default_target,
            device_zoom,
            surface_ready: false,
            pending: None,
        }
    }

    pub fn default_target(&self) -> CameraTarget {
        self.default_target
    }

    pub fn follow_target(&self, position: Position) -> CameraTarget {
        CameraTarget::new(position, self.device_zoom)
    }

    /// Target for an engine intent; marker-only updates never move the camera
    pub fn resolve(&self, intent: CameraIntent) -> Option<CameraTarget> {
        match intent {
            CameraIntent::Follow(position) => Some(self.follow_target(position)),
            CameraIntent::MarkerUpdateOnly(_) => None,
        }
    }

    /// Target after a manual refresh: the device if we have a fix, else the default view
    pub fn resolve_refresh(&self, state: &TrackerState) -> CameraTarget {
        match state.last_good_position {
            Some(position) => self.follow_target(position),
            None => self.default_target,
        }
    }

    /// Submit a target. Returns it if it can be shown now; otherwise it is
    /// held, replacing any earlier pending request.
    pub fn request(&mut self, target: CameraTarget) -> Option<CameraTarget> {
        if self.surface_ready {
            return Some(target);
        }
        if let Some(replaced) = self.pending.replace(target) {
            debug!("Surface not ready, dropping older camera request {:?}", replaced);
        }
        None
    }

    /// Mark the surface ready and hand back the deferred request, if any.
    /// Only the first call can return something.
    pub fn mark_surface_ready(&mut self) -> Option<CameraTarget> {
        if self.surface_ready {
            return None;
        }
        self.surface_ready = true;
        self.pending.take()
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready
    }

    pub fn pending(&self) -> Option<CameraTarget> {
        self.pending
    }
}
