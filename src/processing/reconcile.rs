//! Reconciliation of telemetry readings into tracker state
//!
//! Decides which readings are worth showing. The rules, in priority order:
//!
//! 1. A device-reported error sets `last_error` (and the satellite count when
//!    one was parsed). The stored position and follow flag are untouched.
//! 2. A position that moved more than the jitter threshold on either axis
//!    replaces position, satellites and HDOP and clears `last_error`. The first
//!    such fix of a session emits [`CameraIntent::Follow`], later ones
//!    [`CameraIntent::MarkerUpdateOnly`].
//! 3. Anything else (jitter, malformed payloads, transport or protocol
//!    faults) leaves the state as it was.
//!
//! Readings carry no sequence number; whichever is applied last wins.

use crate::core::{Position, TelemetryReading, TrackerState, JITTER_THRESHOLD_DEG};
use log::{debug, info};

/// Camera reaction requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraIntent {
    /// First fix of the session: move the camera onto the device
    Follow(Position),
    /// Move the marker, leave the camera where the user put it
    MarkerUpdateOnly(Position),
}

impl CameraIntent {
    pub fn position(&self) -> Position {
        match self {
            CameraIntent::Follow(p) | CameraIntent::MarkerUpdateOnly(p) => *p,
        }
    }
}

/// What a transition did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Unchanged,
    DeviceError,
    PositionUpdated,
}

/// Result of applying one reading
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TrackerState,
    pub change: StateChange,
    pub intent: Option<CameraIntent>,
}

impl Transition {
    fn unchanged(state: &TrackerState) -> Self {
        Self {
            state: state.clone(),
            change: StateChange::Unchanged,
            intent: None,
        }
    }
}

/// Apply `reading` to `state`, producing the next state.
pub fn reconcile(state: &TrackerState, reading: &TelemetryReading, threshold_deg: f64) -> Transition {
    if reading.is_device_error() {
        let next = TrackerState {
            last_error: reading.error_message.clone(),
            satellite_count: reading.satellite_count.or(state.satellite_count),
            ..state.clone()
        };
        return Transition {
            state: next,
            change: StateChange::DeviceError,
            intent: None,
        };
    }

    let Some(position) = reading.position else {
        return Transition::unchanged(state);
    };

    let moved = match &state.last_good_position {
        None => true,
        Some(previous) => position.differs_from(previous, threshold_deg),
    };
    if !moved {
        return Transition::unchanged(state);
    }

    let intent = if state.has_followed_device {
        CameraIntent::MarkerUpdateOnly(position)
    } else {
        CameraIntent::Follow(position)
    };

    Transition {
        state: TrackerState {
            last_good_position: Some(position),
            satellite_count: reading.satellite_count,
            hdop: reading.hdop,
            last_error: None,
            has_followed_device: true,
            buzzer_on: state.buzzer_on,
        },
        change: StateChange::PositionUpdated,
        intent: Some(intent),
    }
}

/// Owner of the current [`TrackerState`]
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    state: TrackerState,
    threshold_deg: f64,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new(JITTER_THRESHOLD_DEG)
    }
}

impl ReconciliationEngine {
    pub fn new(threshold_deg: f64) -> Self {
        Self {
            state: TrackerState::new(),
            threshold_deg,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Apply a reading and keep the resulting state
    pub fn apply(&mut self, reading: &TelemetryReading) -> Transition {
        let transition = reconcile(&self.state, reading, self.threshold_deg);
        match transition.intent {
            Some(CameraIntent::Follow(p)) => {
                info!("First fix at ({:.6}, {:.6}), following device", p.latitude, p.longitude)
            }
            Some(CameraIntent::MarkerUpdateOnly(p)) => {
                debug!("Device moved to ({:.6}, {:.6})", p.latitude, p.longitude)
            }
            None if transition.change == StateChange::Unchanged => {
                debug!("Reading ignored")
            }
            None => {}
        }
        self.state = transition.state.clone();
        transition
    }

    /// Forget that the camera followed the device, so the next fix follows again.
    /// Returns whether the state changed.
    pub fn reset_follow(&mut self) -> bool {
        if !self.state.has_followed_device {
            return false;
        }
        self.state = TrackerState {
            has_followed_device: false,
            ..self.state.clone()
        };
        true
    }

    /// Record a buzzer state the device acknowledged. Returns whether the state changed.
    pub fn confirm_buzzer(&mut self, on: bool) -> bool {
        if self.state.buzzer_on == on {
            return false;
        }
        self.state = TrackerState {
            buzzer_on: on,
            ..self.state.clone()
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::TelemetryFault;
    use proptest::prelude::*;

    fn fix(lat: f64, lon: f64, satellites: u32, hdop: f64) -> TelemetryReading {
        TelemetryReading::fix(Position::new(lat, lon), Some(satellites), Some(hdop))
    }

    #[test]
    fn test_first_fix_follows() {
        let mut engine = ReconciliationEngine::default();
        let transition = engine.apply(&fix(26.05, -98.26, 7, 1.1));

        assert_eq!(transition.change, StateChange::PositionUpdated);
        assert_eq!(transition.intent, Some(CameraIntent::Follow(Position::new(26.05, -98.26))));
        assert!(engine.state().has_followed_device);
        assert_eq!(engine.state().satellite_count, Some(7));
        assert_eq!(engine.state().hdop, Some(1.1));
    }

    #[test]
    fn test_jitter_scenario() {
        let mut engine = ReconciliationEngine::default();
        engine.apply(&fix(26.0500, -98.2600, 7, 1.1));
        let before = engine.state().clone();

        let jitter = engine.apply(&fix(26.05005, -98.25995, 7, 1.1));
        assert_eq!(jitter.change, StateChange::Unchanged);
        assert_eq!(jitter.intent, None);
        assert_eq!(engine.state(), &before);

        let moved = engine.apply(&fix(26.10, -98.30, 5, 2.0));
        assert_eq!(moved.change, StateChange::PositionUpdated);
        assert_eq!(
            moved.intent,
            Some(CameraIntent::MarkerUpdateOnly(Position::new(26.10, -98.30)))
        );
        assert_eq!(engine.state().satellite_count, Some(5));
        assert_eq!(engine.state().hdop, Some(2.0));
    }

    #[test]
    fn test_within_threshold_never_changes() {
        let deltas = [0.0, 0.00001, 0.00005, 0.00009, -0.00009, 0.0000999];
        for &dlat in &deltas {
            for &dlon in &deltas {
                let mut engine = ReconciliationEngine::default();
                engine.apply(&fix(45.0, 15.0, 6, 1.0));
                let transition = engine.apply(&fix(45.0 + dlat, 15.0 + dlon, 9, 0.7));
                assert_eq!(transition.change, StateChange::Unchanged, "dlat={} dlon={}", dlat, dlon);
                assert_eq!(engine.state().last_good_position, Some(Position::new(45.0, 15.0)));
                assert_eq!(engine.state().satellite_count, Some(6));
            }
        }
    }

    #[test]
    fn test_beyond_threshold_changes_and_clears_error() {
        let deltas = [(0.00011, 0.0), (0.0, -0.00011), (0.5, 0.5), (-0.0002, 0.00002)];
        for &(dlat, dlon) in &deltas {
            let mut engine = ReconciliationEngine::default();
            engine.apply(&fix(45.0, 15.0, 6, 1.0));
            engine.apply(&TelemetryReading::device_error("no fix", Some(0)));
            assert!(engine.state().last_error.is_some());

            let transition = engine.apply(&fix(45.0 + dlat, 15.0 + dlon, 6, 1.0));
            assert_eq!(transition.change, StateChange::PositionUpdated, "dlat={} dlon={}", dlat, dlon);
            assert!(engine.state().last_error.is_none());
        }
    }

    #[test]
    fn test_threshold_boundary() {
        // exactly representable delta equal to the threshold is not a move
        let mut engine = ReconciliationEngine::new(0.25);
        engine.apply(&fix(45.0, 15.0, 6, 1.0));
        assert_eq!(engine.apply(&fix(45.25, 15.0, 6, 1.0)).change, StateChange::Unchanged);
        assert_eq!(engine.apply(&fix(45.0, 14.75, 6, 1.0)).change, StateChange::Unchanged);

        // decimal 0.0001 is not exact: 45.0001 - 45.0 comes out slightly above 1e-4
        assert!(45.0001_f64 - 45.0 > JITTER_THRESHOLD_DEG);
        let mut engine = ReconciliationEngine::default();
        engine.apply(&fix(45.0, 15.0, 6, 1.0));
        let transition = engine.apply(&fix(45.0001, 15.0, 6, 1.0));
        assert_eq!(transition.change, StateChange::PositionUpdated);
    }

    fn prior_state() -> impl Strategy<Value = TrackerState> {
        (
            proptest::option::of((-80.0f64..80.0, -170.0f64..170.0)),
            proptest::option::of(0u32..40),
            proptest::option::of(0.5f64..20.0),
            proptest::option::of("[a-z ]{1,12}"),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(position, satellites, hdop, error, followed, buzzer)| TrackerState {
                last_good_position: position.map(|(lat, lon)| Position::new(lat, lon)),
                satellite_count: satellites,
                hdop,
                last_error: error,
                has_followed_device: followed && position.is_some(),
                buzzer_on: buzzer,
            })
    }

    proptest! {
        #[test]
        fn jitter_threshold_decides_replacement(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            dlat in -0.0005f64..0.0005,
            dlon in -0.0005f64..0.0005
        ) {
            let mut engine = ReconciliationEngine::default();
            engine.apply(&fix(lat, lon, 6, 1.0));
            engine.apply(&TelemetryReading::device_error("no fix", Some(0)));
            let before = engine.state().clone();

            let next = Position::new(lat + dlat, lon + dlon);
            let moved = (next.latitude - lat).abs().max((next.longitude - lon).abs());
            let transition = engine.apply(&fix(next.latitude, next.longitude, 9, 0.7));

            if moved > JITTER_THRESHOLD_DEG {
                prop_assert_eq!(transition.change, StateChange::PositionUpdated);
                prop_assert_eq!(engine.state().last_good_position, Some(next));
                prop_assert!(engine.state().last_error.is_none());
                prop_assert_eq!(transition.intent, Some(CameraIntent::MarkerUpdateOnly(next)));
            } else {
                prop_assert_eq!(transition.change, StateChange::Unchanged);
                prop_assert_eq!(transition.intent, None);
                prop_assert_eq!(engine.state(), &before);
            }
        }

        #[test]
        fn device_error_never_clears_position_or_moves_camera(
            state in prior_state(),
            message in "[a-zA-Z ]{1,20}",
            satellites in proptest::option::of(0u32..40)
        ) {
            let reading = TelemetryReading::device_error(message.clone(), satellites);
            let transition = reconcile(&state, &reading, JITTER_THRESHOLD_DEG);

            prop_assert_eq!(transition.change, StateChange::DeviceError);
            prop_assert_eq!(transition.intent, None);
            prop_assert_eq!(transition.state.last_good_position, state.last_good_position);
            prop_assert_eq!(transition.state.hdop, state.hdop);
            prop_assert_eq!(transition.state.has_followed_device, state.has_followed_device);
            prop_assert_eq!(transition.state.buzzer_on, state.buzzer_on);
            prop_assert_eq!(transition.state.last_error, Some(message));
            prop_assert_eq!(transition.state.satellite_count, satellites.or(state.satellite_count));
        }

        #[test]
        fn link_faults_never_change_state(
            state in prior_state(),
            fault in prop_oneof![
                Just(TelemetryFault::Transport),
                Just(TelemetryFault::Protocol),
                Just(TelemetryFault::Payload),
            ]
        ) {
            let transition = reconcile(&state, &TelemetryReading::failed(fault, "unreachable"), JITTER_THRESHOLD_DEG);
            prop_assert_eq!(transition.change, StateChange::Unchanged);
            prop_assert_eq!(transition.intent, None);
            prop_assert_eq!(transition.state, state);
        }
    }

    #[test]
    fn test_follow_emitted_once_until_reset() {
        let mut engine = ReconciliationEngine::default();
        let follows = |t: &Transition| matches!(t.intent, Some(CameraIntent::Follow(_)));

        assert!(follows(&engine.apply(&fix(10.0, 10.0, 5, 1.0))));
        assert!(!follows(&engine.apply(&fix(10.1, 10.0, 5, 1.0))));
        assert!(!follows(&engine.apply(&fix(10.2, 10.0, 5, 1.0))));

        assert!(engine.reset_follow());
        assert!(!engine.reset_follow());
        assert!(engine.state().has_fix());

        // jitter after a reset does not re-follow; a real move does
        assert!(engine.apply(&fix(10.20001, 10.0, 5, 1.0)).intent.is_none());
        assert!(follows(&engine.apply(&fix(10.3, 10.0, 5, 1.0))));
    }

    #[test]
    fn test_device_error_keeps_position() {
        let mut engine = ReconciliationEngine::default();
        engine.apply(&fix(26.05, -98.26, 7, 1.1));

        let transition = engine.apply(&TelemetryReading::device_error("no fix", Some(0)));
        assert_eq!(transition.change, StateChange::DeviceError);
        assert_eq!(transition.intent, None);
        assert_eq!(engine.state().last_good_position, Some(Position::new(26.05, -98.26)));
        assert_eq!(engine.state().last_error.as_deref(), Some("no fix"));
        assert_eq!(engine.state().satellite_count, Some(0));
        assert_eq!(engine.state().hdop, Some(1.1));
        assert!(engine.state().has_followed_device);
    }

    #[test]
    fn test_device_error_without_fix() {
        let mut engine = ReconciliationEngine::default();
        engine.apply(&TelemetryReading::device_error("no fix", Some(0)));
        assert_eq!(engine.state().last_good_position, None);
        assert_eq!(engine.state().last_error.as_deref(), Some("no fix"));
        assert!(!engine.state().has_followed_device);
    }

    #[test]
    fn test_device_error_keeps_satellites_when_unparseable() {
        let mut engine = ReconciliationEngine::default();
        engine.apply(&fix(1.0, 1.0, 8, 0.9));
        engine.apply(&TelemetryReading::device_error("antenna", None));
        assert_eq!(engine.state().satellite_count, Some(8));
    }

    #[test]
    fn test_link_faults_leave_state_alone() {
        let mut engine = ReconciliationEngine::default();
        engine.apply(&fix(1.0, 1.0, 8, 0.9));
        let before = engine.state().clone();

        for reading in [
            TelemetryReading::failed(TelemetryFault::Transport, "Device unreachable"),
            TelemetryReading::failed(TelemetryFault::Protocol, "Device returned HTTP 500"),
            TelemetryReading::invalid(),
        ] {
            let transition = engine.apply(&reading);
            assert_eq!(transition.change, StateChange::Unchanged);
            assert_eq!(transition.intent, None);
        }
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_buzzer_confirmation_survives_readings() {
        let mut engine = ReconciliationEngine::default();
        assert!(engine.confirm_buzzer(true));
        assert!(!engine.confirm_buzzer(true));
        engine.apply(&fix(3.0, 4.0, 4, 3.0));
        assert!(engine.state().buzzer_on);
    }

    #[test]
    fn test_reconcile_is_pure() {
        let state = TrackerState::new();
        let reading = fix(5.0, 6.0, 4, 1.5);
        let a = reconcile(&state, &reading, JITTER_THRESHOLD_DEG);
        let b = reconcile(&state, &reading, JITTER_THRESHOLD_DEG);
        assert_eq!(a, b);
        assert_eq!(state, TrackerState::new());
    }
}
