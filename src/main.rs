//! Console shell for the device tracker
//!
//! Prints status and camera moves as they happen. Reads single-letter
//! commands from stdin:
//!
//! - `r` refresh now and recenter
//! - `c` recenter to the default view
//! - `b` toggle the buzzer
//! - `s` print a JSON snapshot of the state
//! - `q` quit

use anyhow::{Context, Result};
use device_tracker::{
    HttpDeviceLink, PollScheduler, StatusFormatter, Tracker, TrackerConfig, TrackerHandle,
};
use log::{error, info};
use std::sync::{Arc, Mutex};
use tokio::io::{self, AsyncBufReadExt, BufReader};

fn init_logging(config: &TrackerConfig) {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(config.log_level.to_level_filter());
        }
    }
    builder.init();
}

async fn read_commands(handle: TrackerHandle, snapshot: Arc<Mutex<String>>) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match line.trim() {
            "r" => match handle.refresh().await {
                Some(target) => info!("Refreshed, camera at {}", target),
                None => break,
            },
            "c" => handle.recenter_default().await,
            "b" => {
                if !handle.toggle_buzzer().await {
                    println!("Buzzer command failed, try again");
                }
            }
            "s" => {
                let json = snapshot.lock().map(|s| s.clone()).unwrap_or_default();
                println!("{}", json);
            }
            "q" => break,
            "" => {}
            other => println!("Unknown command '{}' (r, c, b, s, q)", other),
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = TrackerConfig::default();
    init_logging(&config);
    config.validate().context("invalid tracker configuration")?;

    let link = HttpDeviceLink::new(&config.link).context("failed to create device link")?;
    info!("Tracking device at {}", config.link.base_url());

    let mut tracker = Tracker::new(link, &config);
    let formatter = StatusFormatter::new();
    let snapshot = Arc::new(Mutex::new(String::new()));

    let latest = Arc::clone(&snapshot);
    tracker.register_state_callback(Box::new(move |state| {
        println!("{}", formatter.render(state));
        match formatter.snapshot_json(state) {
            Ok(json) => {
                if let Ok(mut slot) = latest.lock() {
                    *slot = json;
                }
            }
            Err(e) => error!("Failed to serialize state: {}", e),
        }
    }));
    tracker.register_camera_callback(Box::new(|target| {
        println!("Camera -> {}", target);
    }));

    let (scheduler, handle) = PollScheduler::new(tracker, config.poll_interval());
    // No map surface to wait for in the console
    handle.surface_ready().await;

    let (_, input) = tokio::join!(scheduler.run(), read_commands(handle, snapshot));
    input
}
