//! Tracker API for the presentation shell
//!
//! The shell registers callbacks on a [`Tracker`] and drives it through a
//! [`TrackerHandle`] while the [`PollScheduler`] runs.

pub mod camera;
pub mod command;
pub mod formatting;
pub mod scheduler;
pub mod tracker;
pub mod types;

pub use camera::CameraController;
pub use command::CommandDispatcher;
pub use formatting::{StatusFormatter, StatusLines};
pub use scheduler::{PollScheduler, TrackerCommand, TrackerHandle};
pub use tracker::{CallbackHandle, CameraCallback, StateCallback, Tracker};
pub use types::{CameraTarget, TrackerStats};
