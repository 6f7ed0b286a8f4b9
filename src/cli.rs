//! Command line surface.
//!
//! ```text
//! intruder-alert [THRESHOLD_CM] [INTERVAL_MS] [--log-file PATH] [--config FILE]
//! ```
//!
//! Positional values are parsed leniently: anything that is not a
//! positive number leaves the default (or config-file value) in place.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AlertConfig;
use crate::error::ConfigError;

#[derive(Debug, Parser)]
#[command(name = "intruder-alert", version, about = "Ultrasonic intruder alarm")]
pub struct Cli {
    /// Alarm threshold in centimetres [default: 30.0]
    #[arg(allow_negative_numbers = true)]
    pub threshold: Option<String>,

    /// Delay between measurements in milliseconds [default: 500]
    #[arg(allow_negative_numbers = true)]
    pub interval: Option<String>,

    /// Append detections to this file [default: intruder_log.txt]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// JSON config file, applied before the positional arguments
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge defaults, config file and arguments into a validated config.
    pub fn into_config(self) -> Result<AlertConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AlertConfig::load(path)?,
            None => AlertConfig::default(),
        };
        config.apply_threshold_arg(self.threshold.as_deref());
        config.apply_interval_arg(self.interval.as_deref());
        if let Some(path) = self.log_file {
            config.log_path = path;
        }
        config.validate()?;
        Ok(config)
    }
}
