//! Fallible bootstrap.
//!
//! Order matters: hardware first, then the detection log, then the
//! sensor is primed.  Any failure returns before an alarm output has been
//! written, and whatever was already acquired is dropped (and released)
//! on the way out.

use std::path::Path;

use embedded_hal::digital::{InputPin, OutputPin};
use log::info;

use crate::config::AlertConfig;
use crate::error::{Error, Result};
use crate::sensors::RangeSensor;

use super::ports::{AlarmPort, DetectionSink, TimePort};
use super::service::AlertLoop;
use super::shutdown::ShutdownToken;

/// Pins handed over by the platform initialiser.
pub struct Hardware<TRIG, ECHO, A> {
    pub trigger: TRIG,
    pub echo: ECHO,
    pub alarm: A,
}

/// Validate config, acquire hardware, open the log and build the loop.
pub fn start<TRIG, ECHO, T, A, S>(
    config: AlertConfig,
    mut time: T,
    shutdown: ShutdownToken,
    init_hardware: impl FnOnce() -> Result<Hardware<TRIG, ECHO, A>>,
    open_sink: impl FnOnce(&Path) -> std::io::Result<S>,
) -> Result<AlertLoop<TRIG, ECHO, T, A, S>>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    T: TimePort,
    A: AlarmPort,
    S: DetectionSink,
{
    config.validate()?;

    let hw = init_hardware()?;
    info!("GPIO initialised");

    let sink = open_sink(&config.log_path)?;
    info!("Logging detections to {}", config.log_path.display());

    let mut sensor = RangeSensor::new(hw.trigger, hw.echo);
    sensor
        .prime(&mut time)
        .map_err(|fault| Error::Init(fault.to_string()))?;

    Ok(AlertLoop::new(config, sensor, time, hw.alarm, sink, shutdown))
}
