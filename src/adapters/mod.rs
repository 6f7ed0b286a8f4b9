//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                     |
//! |------------|----------------|---------------------------------|
//! | `hardware` | AlarmPort      | Buzzer + LED output pins        |
//! | `log_sink` | DetectionSink  | Append-only text file           |
//! | `rpi`      | -              | Raspberry Pi GPIO (rppal)       |
//! | `signal`   | -              | SIGINT / SIGTERM → shutdown     |
//! | `time`     | TimePort       | `Instant` + local wall clock    |

pub mod hardware;
pub mod log_sink;
#[cfg(feature = "rpi")]
pub mod rpi;
pub mod signal;
pub mod time;
