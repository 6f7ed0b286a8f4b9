//! Alarm output adapter; bridges two HAL output pins to [`AlarmPort`].
//!
//! [`PinAlarm`] drives the buzzer and LED together.  [`AlarmHandle`] wraps
//! any alarm in a mutex so the signal watcher can force the outputs off
//! while the main loop still owns them; every write goes through the lock,
//! so the two contexts never drive the pins at the same time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::{debug, warn};

use crate::app::ports::AlarmPort;

// ───────────────────────────────────────────────────────────────
// PinAlarm
// ───────────────────────────────────────────────────────────────

/// Buzzer + indicator LED, both active HIGH.
pub struct PinAlarm<B, L> {
    buzzer: B,
    led: L,
    on: bool,
}

impl<B: OutputPin, L: OutputPin> PinAlarm<B, L> {
    /// Wrap already-configured output pins.  Does not write to them.
    pub fn new(buzzer: B, led: L) -> Self {
        Self {
            buzzer,
            led,
            on: false,
        }
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, name: &str) {
    if let Err(e) = pin.set_state(PinState::from(on)) {
        warn!("{name} write failed: {:?}", e.kind());
    }
}

impl<B: OutputPin, L: OutputPin> AlarmPort for PinAlarm<B, L> {
    fn set_alarm(&mut self, on: bool) {
        drive(&mut self.buzzer, on, "buzzer");
        drive(&mut self.led, on, "led");
        self.on = on;
    }

    fn all_off(&mut self) {
        self.set_alarm(false);
    }

    fn is_alarm_on(&self) -> bool {
        self.on
    }
}

// ───────────────────────────────────────────────────────────────
// AlarmHandle
// ───────────────────────────────────────────────────────────────

/// Shared, lock-protected alarm.  Clones refer to the same outputs.
///
/// Once [`force_off`](Self::force_off) has run the handle stays silenced:
/// later `set_alarm(true)` calls are dropped, so a cycle racing the
/// signal watcher cannot re-assert the outputs.
pub struct AlarmHandle<A> {
    inner: Arc<Mutex<Latched<A>>>,
}

struct Latched<A> {
    alarm: A,
    silenced: bool,
}

impl<A> Clone for AlarmHandle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AlarmPort> AlarmHandle<A> {
    pub fn new(alarm: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Latched {
                alarm,
                silenced: false,
            })),
        }
    }

    /// Deassert every output now, from any thread, and keep them off.
    pub fn force_off(&self) {
        let mut guard = self.lock();
        guard.silenced = true;
        guard.alarm.all_off();
    }

    pub fn is_silenced(&self) -> bool {
        self.lock().silenced
    }

    fn lock(&self) -> MutexGuard<'_, Latched<A>> {
        // Still drive the pins after a poisoning panic.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: AlarmPort> AlarmPort for AlarmHandle<A> {
    fn set_alarm(&mut self, on: bool) {
        let mut guard = self.lock();
        if on && guard.silenced {
            debug!("Alarm silenced, ignoring assert");
            return;
        }
        guard.alarm.set_alarm(on);
    }

    fn all_off(&mut self) {
        self.lock().alarm.all_off();
    }

    fn is_alarm_on(&self) -> bool {
        self.lock().alarm.is_alarm_on()
    }
}
