//! Host time adapter.
//!
//! Monotonic microseconds come from `std::time::Instant`; wall-clock
//! timestamps come from the local time zone via chrono.
//!
//! Linux `nanosleep` overshoots by tens of microseconds, which would turn
//! the 10 µs trigger pulse into something much longer, so short delays
//! spin on the monotonic clock instead of sleeping.

use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};

use crate::app::ports::TimePort;

/// Delays shorter than this busy-wait.
const SPIN_THRESHOLD_US: u32 = 200;

/// Time adapter for Linux hosts (Raspberry Pi included).
pub struct SystemTimeAdapter {
    start: Instant,
}

impl Default for SystemTimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimeAdapter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TimePort for SystemTimeAdapter {
    /// Microseconds since the adapter was created (monotonic).
    fn now_us(&mut self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn delay_us(&mut self, us: u32) {
        let d = Duration::from_micros(u64::from(us));
        if us < SPIN_THRESHOLD_US {
            let until = Instant::now() + d;
            while Instant::now() < until {
                core::hint::spin_loop();
            }
        } else {
            thread::sleep(d);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn wall_clock(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
