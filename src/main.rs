//! Intruder Alert: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  rpi GPIO        FileDetectionLog   SystemTimeAdapter    │
//! │  (pins, alarm)   (DetectionSink)    (TimePort)           │
//! │  signal watcher ──▶ ShutdownToken + AlarmHandle          │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │   ┌──────────────────────────────────────────────────┐   │
//! │   │  AlertLoop: RangeSensor · Idle ⇄ Alarmed         │   │
//! │   └──────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 after a signal-driven shutdown, 1 if GPIO or the
//! detection log cannot be set up.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use intruder_alert::adapters::log_sink::FileDetectionLog;
use intruder_alert::adapters::rpi;
use intruder_alert::adapters::signal::spawn_signal_watcher;
use intruder_alert::adapters::time::SystemTimeAdapter;
use intruder_alert::app::shutdown::ShutdownToken;
use intruder_alert::app::startup;
use intruder_alert::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse()
        .into_config()
        .context("invalid configuration")?;

    let shutdown = ShutdownToken::new();
    let alert = startup::start(
        config,
        SystemTimeAdapter::new(),
        shutdown.clone(),
        rpi::init,
        FileDetectionLog::open,
    )
    .inspect_err(|e| log::error!("Startup failed: {e}"))?;

    spawn_signal_watcher(shutdown, alert.alarm().clone())
        .context("failed to start signal watcher")?;

    info!("Ultrasonic Intruder Alert System Initialized.");
    info!(
        "Threshold: {:.2} cm, Delay: {} ms",
        alert.config().threshold_cm,
        alert.config().poll_interval_ms
    );
    match alert.config().to_json() {
        Ok(json) => debug!("Effective config: {json}"),
        Err(e) => warn!("Cannot render config: {e}"),
    }

    alert.run();
    Ok(())
}
