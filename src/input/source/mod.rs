pub mod client;
pub mod command;
#[cfg(test)]
pub mod mod_test;
pub mod xbox_one;

use std::{thread, time::Duration};

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::drivers::xbox_one::{driver::DriverError, event::Event, hid_report::DecodeError};

use self::{client::SourceDeviceClient, command::SourceCommand};

use super::sink::Sink;

/// Default polling frequency in Hz
pub const DEFAULT_POLL_FREQUENCY: i64 = 500;
/// Poll interval used when the configured frequency is not positive
pub const FALLBACK_POLL_RATE: Duration = Duration::from_millis(16);
/// How long to wait after a failed cycle
pub const ERROR_BACKOFF: Duration = Duration::from_millis(100);
/// Size of the [SourceCommand] buffer
const BUFFER_SIZE: usize = 8;

/// Possible errors polling a source device. Both are recoverable; the cycle
/// is skipped and polling continues.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Read error: {0}")]
    Read(#[from] DriverError),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// A [SourceInputDevice] is a device that produces input events each time
/// it is polled.
pub trait SourceInputDevice {
    /// Poll the given input device for input events
    fn poll(&mut self) -> Result<Vec<Event>, InputError>;

    /// Release the underlying device
    fn stop(&mut self) {}
}

/// Returns the time to sleep between polls for the given frequency in Hz
pub fn poll_interval(frequency: i64) -> Duration {
    if frequency <= 0 {
        return FALLBACK_POLL_RATE;
    }
    Duration::from_nanos(1_000_000_000 / frequency as u64)
}

/// Options for running a [SourceDriver]
#[derive(Debug, Clone)]
pub struct SourceDriverOptions {
    /// Time to sleep after a successful cycle
    pub poll_rate: Duration,
    /// Time to sleep after a failed cycle
    pub error_backoff: Duration,
}

impl Default for SourceDriverOptions {
    fn default() -> Self {
        Self {
            poll_rate: poll_interval(DEFAULT_POLL_FREQUENCY),
            error_backoff: ERROR_BACKOFF,
        }
    }
}

/// A [SourceDriver] repeatedly polls a [SourceInputDevice] and forwards its
/// events to a [Sink] until it is told to stop.
#[derive(Debug)]
pub struct SourceDriver<T: SourceInputDevice, S: Sink> {
    device: T,
    sink: S,
    options: SourceDriverOptions,
    tx: mpsc::Sender<SourceCommand>,
    rx: mpsc::Receiver<SourceCommand>,
}

impl<T: SourceInputDevice, S: Sink> SourceDriver<T, S> {
    pub fn new(device: T, sink: S) -> Self {
        Self::new_with_options(device, sink, SourceDriverOptions::default())
    }

    pub fn new_with_options(device: T, sink: S, options: SourceDriverOptions) -> Self {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        Self {
            device,
            sink,
            options,
            tx,
            rx,
        }
    }

    /// Returns a client that can be used to stop the driver
    pub fn client(&self) -> SourceDeviceClient {
        self.tx.clone().into()
    }

    /// Returns the sink events are forwarded to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one cycle: poll the device and forward any events to the sink
    pub fn poll(&mut self) -> Result<Vec<Event>, InputError> {
        let events = self.device.poll()?;
        if !events.is_empty() {
            self.sink.send(&events);
        }
        Ok(events)
    }

    /// Poll the device until a [SourceCommand::Stop] is received. Failed
    /// cycles are logged and retried after a short backoff. The device is
    /// stopped before returning.
    pub fn run(&mut self) {
        log::debug!("Starting source driver");
        loop {
            match self.rx.try_recv() {
                Ok(SourceCommand::Stop) => {
                    log::debug!("Received stop command");
                    break;
                }
                Err(TryRecvError::Empty) => (),
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Command channel disconnected");
                    break;
                }
            }

            match self.poll() {
                Ok(_) => thread::sleep(self.options.poll_rate),
                Err(e) => {
                    log::warn!("{e}");
                    thread::sleep(self.options.error_backoff);
                }
            }
        }

        self.device.stop();
        log::debug!("Source driver stopped");
    }
}
