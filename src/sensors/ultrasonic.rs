//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs HIGH pulse on TRIG makes the module emit a 40 kHz burst; ECHO
//! then goes HIGH for as long as the sound takes to travel out and back.
//!
//! ```text
//!  TRIG  ─┐‾‾┌──────────────────────────────
//!  ECHO  ──────────┐‾‾‾‾‾‾‾‾‾‾‾‾‾┌──────────
//!                  │◀─ width ──▶│   distance = width/2 · 0.0343 cm/µs
//! ```
//!
//! Both edge waits are spin-polls against the monotonic clock and give up
//! after [`ECHO_TIMEOUT_US`], so a disconnected sensor costs at most two
//! timeouts per cycle instead of hanging the loop.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::TimePort;
use crate::error::SensorFault;

/// Trigger pulse length (µs).
pub const TRIGGER_PULSE_US: u32 = 10;
/// Upper bound on each echo edge wait (µs).
pub const ECHO_TIMEOUT_US: u64 = 50_000;
/// Speed of sound at ~20 °C.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;
/// Shortest plausible distance.
pub const MIN_RANGE_CM: f32 = 0.0;
/// Longest plausible distance for the HC-SR04.
pub const MAX_RANGE_CM: f32 = 500.0;
/// Trigger held low this long before the first measurement.
const TRIGGER_SETTLE_MS: u32 = 2;

/// Result of one measurement cycle.
///
/// Invalid readings carry no meaningful distance; use [`Reading::distance`]
/// rather than reading `distance_cm` directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub distance_cm: f32,
    pub valid: bool,
}

impl Reading {
    pub const fn valid(distance_cm: f32) -> Self {
        Self {
            distance_cm,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            distance_cm: f32::NAN,
            valid: false,
        }
    }

    pub fn distance(&self) -> Option<f32> {
        self.valid.then_some(self.distance_cm)
    }
}

/// Convert an echo pulse width into a one-way distance.
pub fn pulse_to_distance_cm(pulse_width_us: u64) -> f32 {
    (pulse_width_us as f32 / 2.0) * SPEED_OF_SOUND_CM_PER_US
}

/// Reject distances outside `[MIN_RANGE_CM, MAX_RANGE_CM]` (NaN included).
pub fn check_range(distance_cm: f32) -> Result<f32, SensorFault> {
    if (MIN_RANGE_CM..=MAX_RANGE_CM).contains(&distance_cm) {
        Ok(distance_cm)
    } else {
        Err(SensorFault::OutOfRange(distance_cm))
    }
}

/// Trigger/echo driver.  Stateless between measurements.
pub struct RangeSensor<TRIG, ECHO> {
    trigger: TRIG,
    echo: ECHO,
}

impl<TRIG: OutputPin, ECHO: InputPin> RangeSensor<TRIG, ECHO> {
    pub fn new(trigger: TRIG, echo: ECHO) -> Self {
        Self { trigger, echo }
    }

    /// Pull TRIG low and let the module settle.  Call once before the
    /// first [`measure`](Self::measure).
    pub fn prime(&mut self, time: &mut impl TimePort) -> Result<(), SensorFault> {
        self.trigger.set_low().map_err(|_| SensorFault::PinFault)?;
        time.delay_ms(TRIGGER_SETTLE_MS);
        Ok(())
    }

    /// Measure once.  Every failure collapses into [`Reading::invalid`]
    /// after a diagnostic line; none of them are fatal.
    pub fn measure(&mut self, time: &mut impl TimePort) -> Reading {
        match self.try_measure(time) {
            Ok(cm) => Reading::valid(cm),
            Err(fault) => {
                warn!("{fault}");
                Reading::invalid()
            }
        }
    }

    /// Measure once, keeping the failure cause.
    pub fn try_measure(&mut self, time: &mut impl TimePort) -> Result<f32, SensorFault> {
        self.fire_trigger(time)?;

        let rise_us = self.wait_for_echo(time, true, SensorFault::EchoRiseTimeout)?;
        let fall_us = self.wait_for_echo(time, false, SensorFault::EchoFallTimeout)?;

        check_range(pulse_to_distance_cm(fall_us.saturating_sub(rise_us)))
    }

    fn fire_trigger(&mut self, time: &mut impl TimePort) -> Result<(), SensorFault> {
        self.trigger.set_high().map_err(|_| SensorFault::PinFault)?;
        time.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| SensorFault::PinFault)
    }

    /// Spin until ECHO reads `high`, returning the clock at that moment.
    fn wait_for_echo(
        &mut self,
        time: &mut impl TimePort,
        high: bool,
        on_timeout: SensorFault,
    ) -> Result<u64, SensorFault> {
        let start = time.now_us();
        loop {
            let level = self.echo.is_high().map_err(|_| SensorFault::PinFault)?;
            let now = time.now_us();
            if level == high {
                return Ok(now);
            }
            if now.saturating_sub(start) > ECHO_TIMEOUT_US {
                return Err(on_timeout);
            }
        }
    }
}
