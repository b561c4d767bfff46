pub mod path;

#[cfg(test)]
pub mod config_test;

use std::{io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::source::{poll_interval, DEFAULT_POLL_FREQUENCY};

/// Represents all possible errors loading a [PollConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Settings for polling a controller. Missing fields use their defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct PollConfig {
    /// Polling frequency in Hz. Values of zero or less poll at ~62.5 Hz.
    pub poll_frequency: i64,
    /// Only read from the controller, skipping initialization
    pub readonly: bool,
    /// libusb log level, from 0 (off) to 4 (debug)
    pub debug: u8,
    /// Read timeout in milliseconds. Zero blocks until a report arrives.
    pub read_timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_frequency: DEFAULT_POLL_FREQUENCY,
            readonly: false,
            debug: 0,
            read_timeout_ms: 0,
        }
    }
}

impl PollConfig {
    /// Load a [PollConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<PollConfig, LoadError> {
        let config: PollConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [PollConfig] from the given YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<PollConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: PollConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Time to sleep between polls
    pub fn poll_interval(&self) -> Duration {
        poll_interval(self.poll_frequency)
    }

    /// Timeout for a single read
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
