//! GPIO pin assignments (BCM numbering) for the Raspberry Pi wiring.
//!
//! Single source of truth; the hardware adapter references this module
//! rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const TRIGGER_GPIO: u8 = 18;
/// Digital input: HIGH for the round-trip time of the sound burst.
/// Needs a 5 V → 3.3 V divider on the Pi side.
pub const ECHO_GPIO: u8 = 24;

// ---------------------------------------------------------------------------
// Alarm outputs
// ---------------------------------------------------------------------------

/// Active buzzer (active HIGH).
pub const BUZZER_GPIO: u8 = 17;
/// Indicator LED (active HIGH).
pub const LED_GPIO: u8 = 22;
