//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AlertLoop (domain)
//! ```
//!
//! Driven adapters (clock, alarm outputs, detection log) implement these
//! traits.  Digital pins use the `embedded-hal` 1.0 traits directly, so
//! any HAL pin can drive the ultrasonic ranger.

use std::io;

use chrono::NaiveDateTime;

use super::events::DetectionEvent;

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock plus blocking delays.
pub trait TimePort {
    /// Microseconds since an arbitrary fixed origin (monotonic).
    fn now_us(&mut self) -> u64;

    /// Block for `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Local wall-clock time, used to stamp detection events.
    fn wall_clock(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Alarm port (driven adapter: domain → buzzer / LED)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the alarm outputs.
pub trait AlarmPort {
    /// Drive buzzer and indicator LED together.
    fn set_alarm(&mut self, on: bool);

    /// Deassert every alarm output for a safe shutdown.
    fn all_off(&mut self);

    /// Whether the alarm outputs are currently asserted.
    fn is_alarm_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Detection sink (driven adapter: domain → append-only log)
// ───────────────────────────────────────────────────────────────

/// Receives every [`DetectionEvent`].  Each `record` must be durable
/// before it returns (write + flush).
pub trait DetectionSink {
    fn record(&mut self, event: &DetectionEvent) -> io::Result<()>;

    /// Flush and release the underlying resource.  Calling it twice is a
    /// no-op; recording after close is an error.
    fn close(&mut self) -> io::Result<()>;
}
