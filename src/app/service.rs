//! Alert loop, the hexagonal core.
//!
//! [`AlertLoop`] owns the range sensor, the alarm state and every port it
//! drives.  One cycle is: measure → evaluate threshold → drive outputs and
//! log → sleep.  The loop never ends on its own; only a cancelled
//! [`ShutdownToken`] stops it.
//!
//! ```text
//!  RangeSensor ──▶ ┌────────────────────────┐ ──▶ DetectionSink
//!                  │       AlertLoop        │
//!  TimePort    ◀──▶│   Idle ⇄ Alarmed       │ ──▶ AlarmPort
//!                  └────────────────────────┘
//! ```

use std::time::Duration;

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, error, info, warn};

use crate::config::AlertConfig;
use crate::sensors::{RangeSensor, Reading};

use super::alarm::AlarmState;
use super::events::DetectionEvent;
use super::ports::{AlarmPort, DetectionSink, TimePort};
use super::shutdown::ShutdownToken;

/// Outcome of a single [`AlertLoop::cycle`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub reading: Reading,
    /// State after this cycle.
    pub state: AlarmState,
    /// Set when a detection was emitted this cycle.
    pub detection: Option<DetectionEvent>,
}

/// Counters returned once the loop has shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub invalid_readings: u64,
    /// Detections written to the log.
    pub detections: u64,
    /// Detections the log refused.
    pub log_failures: u64,
}

// ───────────────────────────────────────────────────────────────
// AlertLoop
// ───────────────────────────────────────────────────────────────

pub struct AlertLoop<TRIG, ECHO, T, A, S> {
    config: AlertConfig,
    sensor: RangeSensor<TRIG, ECHO>,
    time: T,
    alarm: A,
    sink: S,
    shutdown: ShutdownToken,
    state: AlarmState,
    stats: RunSummary,
}

impl<TRIG, ECHO, T, A, S> AlertLoop<TRIG, ECHO, T, A, S>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    T: TimePort,
    A: AlarmPort,
    S: DetectionSink,
{
    /// Assemble the loop.  Starts in [`AlarmState::Idle`] without touching
    /// any output.
    pub fn new(
        config: AlertConfig,
        sensor: RangeSensor<TRIG, ECHO>,
        time: T,
        alarm: A,
        sink: S,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            config,
            sensor,
            time,
            alarm,
            sink,
            shutdown,
            state: AlarmState::Idle,
            stats: RunSummary::default(),
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one measure/evaluate/act step without sleeping.
    ///
    /// Invalid readings leave both the state and the outputs untouched.
    pub fn cycle(&mut self) -> CycleReport {
        self.stats.cycles += 1;

        let reading = self.sensor.measure(&mut self.time);

        // Outputs were already forced off by the signal path; leave them.
        if self.shutdown.is_cancelled() {
            return CycleReport {
                reading,
                state: self.state,
                detection: None,
            };
        }

        let Some(distance) = reading.distance() else {
            self.stats.invalid_readings += 1;
            return CycleReport {
                reading,
                state: self.state,
                detection: None,
            };
        };

        info!("Distance: {distance:.2} cm");

        let next = self.state.next(distance, self.config.threshold_cm);
        if next != self.state {
            debug!("ALARM | {:?} -> {:?}", self.state, next);
        }
        self.state = next;

        let detection = if next.is_alarmed() {
            warn!("Intruder detected!");
            self.alarm.set_alarm(true);
            // A signal may have landed since the check above.
            if self.shutdown.is_cancelled() {
                None
            } else {
                Some(self.emit_detection(distance))
            }
        } else {
            self.alarm.set_alarm(false);
            None
        };

        CycleReport {
            reading,
            state: next,
            detection,
        }
    }

    /// Cycle until cancelled, then shut down.  The same poll delay follows
    /// valid and invalid readings alike.
    pub fn run(mut self) -> RunSummary {
        let interval = Duration::from_millis(u64::from(self.config.poll_interval_ms));

        while !self.shutdown.is_cancelled() {
            self.cycle();
            if self.shutdown.wait_timeout(interval) {
                break;
            }
        }

        self.shutdown()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn stats(&self) -> RunSummary {
        self.stats
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// The alarm port, e.g. to hand a shared handle to the signal watcher.
    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    // ── Internal ──────────────────────────────────────────────

    fn emit_detection(&mut self, distance_cm: f32) -> DetectionEvent {
        let event = DetectionEvent::new(self.time.wall_clock(), distance_cm);
        // A failed write must not take the alarm down with it.
        match self.sink.record(&event) {
            Ok(()) => self.stats.detections += 1,
            Err(e) => {
                error!("Failed to log detection: {e}");
                self.stats.log_failures += 1;
            }
        }
        event
    }

    /// Outputs off, log closed.  Consumes the loop so it cannot run twice.
    fn shutdown(mut self) -> RunSummary {
        info!("Exiting the program...");
        self.alarm.all_off();
        if let Err(e) = self.sink.close() {
            error!("Failed to close detection log: {e}");
        }
        info!(
            "Shutdown complete: {} cycles, {} invalid readings, {} detections logged, {} failed",
            self.stats.cycles,
            self.stats.invalid_readings,
            self.stats.detections,
            self.stats.log_failures
        );
        self.stats
    }
}
