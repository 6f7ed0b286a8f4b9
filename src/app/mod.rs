//! Application core: alarm logic with no direct I/O.
//!
//! All interaction with hardware, clocks and files happens through the
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod alarm;
pub mod events;
pub mod ports;
pub mod service;
pub mod shutdown;
pub mod startup;
