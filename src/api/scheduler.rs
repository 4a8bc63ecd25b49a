//! Poll scheduling and intent serialization
//!
//! Everything runs on one cooperative task: scheduled polls and user intents
//! are handled one at a time, suspending only at device requests. User
//! intents reach the task as [`TrackerCommand`] messages sent through a
//! [`TrackerHandle`].

use crate::api::tracker::Tracker;
use crate::api::types::CameraTarget;
use crate::link::DeviceLink;
use log::{debug, info};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};

/// Capacity of the command queue
const COMMAND_QUEUE_SIZE: usize = 16;

/// User intents delivered to the scheduler task
#[derive(Debug)]
pub enum TrackerCommand {
    /// Map surface finished loading
    SurfaceReady,
    /// Return to the default view
    RecenterDefault,
    /// Poll now and recenter
    Refresh { reply: oneshot::Sender<CameraTarget> },
    /// Switch the buzzer to a given state
    SetBuzzer { on: bool, reply: oneshot::Sender<bool> },
    /// Flip the buzzer from its last confirmed state
    ToggleBuzzer { reply: oneshot::Sender<bool> },
    /// Stop polling
    Shutdown,
}

/// Cloneable sender side used by the presentation shell
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<TrackerCommand>,
}

impl TrackerHandle {
    async fn send(&self, command: TrackerCommand) -> bool {
        if self.commands.send(command).await.is_err() {
            debug!("Scheduler stopped, command dropped");
            return false;
        }
        true
    }

    pub async fn surface_ready(&self) {
        self.send(TrackerCommand::SurfaceReady).await;
    }

    pub async fn recenter_default(&self) {
        self.send(TrackerCommand::RecenterDefault).await;
    }

    /// Returns the resolved camera target, or None if the scheduler is gone
    pub async fn refresh(&self) -> Option<CameraTarget> {
        let (reply, response) = oneshot::channel();
        if !self.send(TrackerCommand::Refresh { reply }).await {
            return None;
        }
        response.await.ok()
    }

    /// Returns whether the device acknowledged; false if the scheduler is gone
    pub async fn set_buzzer(&self, on: bool) -> bool {
        let (reply, response) = oneshot::channel();
        if !self.send(TrackerCommand::SetBuzzer { on, reply }).await {
            return false;
        }
        response.await.unwrap_or(false)
    }

    pub async fn toggle_buzzer(&self) -> bool {
        let (reply, response) = oneshot::channel();
        if !self.send(TrackerCommand::ToggleBuzzer { reply }).await {
            return false;
        }
        response.await.unwrap_or(false)
    }

    pub async fn shutdown(&self) {
        self.send(TrackerCommand::Shutdown).await;
    }
}

/// Drives a [`Tracker`] on a fixed cadence and on demand
pub struct PollScheduler<L> {
    tracker: Tracker<L>,
    interval: Duration,
    commands: mpsc::Receiver<TrackerCommand>,
}

impl<L: DeviceLink> PollScheduler<L> {
    pub fn new(tracker: Tracker<L>, interval: Duration) -> (Self, TrackerHandle) {
        let (sender, commands) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let scheduler = Self {
            tracker,
            interval,
            commands,
        };
        (scheduler, TrackerHandle { commands: sender })
    }

    /// Poll immediately, then every interval, until shut down or every
    /// handle is dropped. Failed polls never stop the loop.
    /// Returns the tracker so its final state can be inspected.
    pub async fn run(mut self) -> Tracker<L> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Polling every {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tracker.poll().await;
                }
                command = self.commands.recv() => match command {
                    Some(TrackerCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command).await,
                },
            }
        }

        info!("Polling stopped");
        self.tracker
    }

    async fn handle(&mut self, command: TrackerCommand) {
        match command {
            TrackerCommand::SurfaceReady => self.tracker.surface_ready(),
            TrackerCommand::RecenterDefault => {
                self.tracker.recenter_default();
            }
            TrackerCommand::Refresh { reply } => {
                let target = self.tracker.manual_refresh().await;
                let _ = reply.send(target);
            }
            TrackerCommand::SetBuzzer { on, reply } => {
                let acknowledged = self.tracker.set_buzzer(on).await;
                let _ = reply.send(acknowledged);
            }
            TrackerCommand::ToggleBuzzer { reply } => {
                let acknowledged = self.tracker.toggle_buzzer().await;
                let _ = reply.send(acknowledged);
            }
            TrackerCommand::Shutdown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Position, DEVICE_ZOOM};
    use crate::link::MockDeviceLink;
    use crate::utils::TrackerConfig;

    fn scheduler(link: &MockDeviceLink) -> (PollScheduler<MockDeviceLink>, TrackerHandle) {
        let config = TrackerConfig::default();
        let tracker = Tracker::new(link.clone(), &config);
        PollScheduler::new(tracker, config.poll_interval())
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_cadence_and_survives_failures() {
        let link = MockDeviceLink::new();
        link.queue_get_timeout();
        link.queue_get_timeout();
        link.queue_fix(26.05, -98.26, 7, 1.1);
        let (scheduler, handle) = scheduler(&link);

        let driver = async {
            // t=0, 15s, 30s, 45s
            time::sleep(Duration::from_secs(46)).await;
            handle.shutdown().await;
        };
        let (tracker, _) = tokio::join!(scheduler.run(), driver);

        assert_eq!(link.get_count(), 4);
        assert_eq!(tracker.state().last_good_position, Some(Position::new(26.05, -98.26)));
        assert_eq!(tracker.stats().polls, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_bypasses_cadence() {
        let link = MockDeviceLink::new();
        link.queue_get_timeout();
        link.queue_fix(1.0, 2.0, 5, 1.5);
        let (scheduler, handle) = scheduler(&link);

        let driver = async {
            time::sleep(Duration::from_secs(1)).await;
            let target = handle.refresh().await;
            handle.shutdown().await;
            target
        };
        let (tracker, target) = tokio::join!(scheduler.run(), driver);

        assert_eq!(target, Some(CameraTarget::new(Position::new(1.0, 2.0), DEVICE_ZOOM)));
        assert_eq!(link.get_count(), 2);
        assert!(tracker.state().has_followed_device);
    }

    #[tokio::test(start_paused = true)]
    async fn test_buzzer_commands_through_handle() {
        let link = MockDeviceLink::new();
        link.queue_post_status(200);
        link.queue_post_status(503);
        let (scheduler, handle) = scheduler(&link);

        let driver = async {
            let first = handle.toggle_buzzer().await;
            let second = handle.set_buzzer(false).await;
            handle.shutdown().await;
            (first, second)
        };
        let (tracker, (first, second)) = tokio::join!(scheduler.run(), driver);

        assert!(first);
        assert!(!second);
        assert!(tracker.state().buzzer_on);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_handles_dropped() {
        let link = MockDeviceLink::new();
        let (scheduler, handle) = scheduler(&link);
        drop(handle);

        let tracker = scheduler.run().await;
        assert!(tracker.state().last_good_position.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_after_shutdown() {
        let link = MockDeviceLink::new();
        let (scheduler, handle) = scheduler(&link);
        handle.shutdown().await;
        scheduler.run().await;

        assert_eq!(handle.refresh().await, None);
        assert!(!handle.set_buzzer(true).await);
    }
}
