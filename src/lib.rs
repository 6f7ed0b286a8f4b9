//! Ultrasonic intruder alarm library.
//!
//! Exposes the pure-logic core and the host adapters for integration
//! testing.  Raspberry Pi GPIO support lives behind the `rpi` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod pins;
pub mod sensors;

pub use error::{Error, Result};
