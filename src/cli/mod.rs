#[cfg(test)]
pub mod cli_test;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{path::get_config_path, LoadError, PollConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Polling frequency in Hz
    #[arg(long, allow_negative_numbers = true)]
    pub freq: Option<i64>,
    /// Only read from the controller
    #[arg(long)]
    pub readonly: bool,
    /// USB debugging control (0-4)
    #[arg(long)]
    pub debug: Option<u8>,
    /// Read timeout in milliseconds (0 waits forever)
    #[arg(long)]
    pub read_timeout: Option<u64>,
    /// Path to a YAML config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Build the [PollConfig] to run with. The config file passed with
    /// `--config` (or the user's config file, if one exists) provides the
    /// base values and explicitly passed flags override them.
    pub fn load_config(&self) -> Result<PollConfig, LoadError> {
        let path = self.config.clone().or_else(get_config_path);
        let config = match path {
            Some(path) => {
                log::debug!("Loading config from {path:?}");
                PollConfig::from_yaml_file(path)?
            }
            None => PollConfig::default(),
        };

        Ok(self.apply(config))
    }

    /// Override the given config with any flags that were passed
    pub fn apply(&self, mut config: PollConfig) -> PollConfig {
        if let Some(freq) = self.freq {
            config.poll_frequency = freq;
        }
        if self.readonly {
            config.readonly = true;
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        if let Some(timeout) = self.read_timeout {
            config.read_timeout_ms = timeout;
        }
        config
    }
}
