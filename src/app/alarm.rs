//! Two-state alarm machine.
//!
//! ```text
//!            d < threshold
//!   ┌──────┐ ───────────────▶ ┌─────────┐ ◀─┐ d < threshold
//!   │ Idle │                  │ Alarmed │ ──┘ (event every cycle)
//!   └──────┘ ◀─────────────── └─────────┘
//!            d ≥ threshold
//! ```
//!
//! The machine is memoryless apart from the state itself: no hysteresis,
//! no smoothing.  Invalid readings never reach it.

/// Current alarm condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlarmState {
    #[default]
    Idle,
    Alarmed,
}

impl AlarmState {
    /// Next state for a valid distance.  The previous state does not
    /// influence the result; it is taken for symmetry with the loop.
    pub fn next(self, distance_cm: f32, threshold_cm: f32) -> Self {
        if distance_cm < threshold_cm {
            Self::Alarmed
        } else {
            Self::Idle
        }
    }

    pub fn is_alarmed(self) -> bool {
        self == Self::Alarmed
    }
}
