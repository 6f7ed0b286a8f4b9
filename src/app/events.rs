//! Outbound detection events.
//!
//! The [`AlertLoop`](super::service::AlertLoop) emits one of these through
//! the [`DetectionSink`](super::ports::DetectionSink) port on every cycle
//! where the measured distance is below threshold.

use core::fmt;

use chrono::NaiveDateTime;

/// Timestamp layout used in the detection log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An object was measured inside the alarm threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    pub timestamp: NaiveDateTime,
    pub distance_cm: f32,
}

impl DetectionEvent {
    pub fn new(timestamp: NaiveDateTime, distance_cm: f32) -> Self {
        Self {
            timestamp,
            distance_cm,
        }
    }
}

/// Renders the log line body (without the trailing newline).
impl fmt::Display for DetectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Intruder detected at {} - Distance: {:.2} cm",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.distance_cm
        )
    }
}
