//! Raspberry Pi GPIO adapter (feature `rpi`).
//!
//! Wraps rppal pins in the `embedded-hal` 1.0 digital traits so the core
//! can drive them, and acquires the four pins listed in [`crate::pins`].
//! rppal resets each pin's mode when it is dropped, so every exit path
//! releases the GPIO.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use rppal::gpio::{self, Gpio};

use crate::adapters::hardware::{AlarmHandle, PinAlarm};
use crate::app::startup::Hardware;
use crate::error::{Error, Result};
use crate::pins;

/// Output pin as seen by the core.
pub struct GpioOutput(gpio::OutputPin);

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set_high();
        Ok(())
    }
}

/// Input pin as seen by the core.
pub struct GpioInput(gpio::InputPin);

impl ErrorType for GpioInput {
    type Error = Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.is_low())
    }
}

/// Alarm outputs shared between the loop and the signal watcher.
pub type RpiAlarm = AlarmHandle<PinAlarm<GpioOutput, GpioOutput>>;

/// Claim TRIG/ECHO/BUZZER/LED.  Outputs come up LOW.
pub fn init() -> Result<Hardware<GpioOutput, GpioInput, RpiAlarm>> {
    let gpio = Gpio::new().map_err(init_error)?;

    let output = |bcm: u8| -> Result<GpioOutput> {
        let pin = gpio.get(bcm).map_err(init_error)?;
        Ok(GpioOutput(pin.into_output_low()))
    };

    let trigger = output(pins::TRIGGER_GPIO)?;
    let echo = GpioInput(gpio.get(pins::ECHO_GPIO).map_err(init_error)?.into_input());
    let buzzer = output(pins::BUZZER_GPIO)?;
    let led = output(pins::LED_GPIO)?;

    Ok(Hardware {
        trigger,
        echo,
        alarm: AlarmHandle::new(PinAlarm::new(buzzer, led)),
    })
}

fn init_error(e: gpio::Error) -> Error {
    Error::Init(format!("failed to initialise GPIO: {e}"))
}
