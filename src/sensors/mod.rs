//! Sensor drivers.
//!
//! Only one sensor exists today: the HC-SR04 ultrasonic ranger that feeds
//! the alert loop one [`Reading`] per cycle.

pub mod ultrasonic;

pub use ultrasonic::{RangeSensor, Reading};
