use std::{thread, time::Duration};

use thiserror::Error;

use crate::usb::{DeviceId, Endpoint, Transport, TransportDevice, TransportError};

use super::{product_name, PIDS, VID};

/// Devices tried during selection, in order
pub const CANDIDATES: [DeviceId; 4] = [
    DeviceId::new(VID, PIDS[0]),
    DeviceId::new(VID, PIDS[1]),
    DeviceId::new(VID, PIDS[2]),
    DeviceId::new(VID, PIDS[3]),
];

// USB layout
const CONFIGURATION: u8 = 1;
const INTERFACE: u8 = 0;
const ALT_SETTING: u8 = 0;
const ENDPOINT: u8 = 1;

/// Command that starts the controller sending input reports
pub const INIT_PAYLOAD: [u8; 2] = [0x05, 0x20];
/// How long the controller needs after initialization
pub const INIT_DELAY: Duration = Duration::from_millis(100);

// Input report buffer size
pub const PACKET_SIZE: usize = 64;

/// Possible errors from the [Driver]
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("no compatible Xbox controller found")]
    NoDeviceFound,
    #[error("initialization failed: {0}")]
    InitializationFailed(TransportError),
    #[error("{0}")]
    Read(#[from] TransportError),
    #[error("device has been closed")]
    Closed,
}

/// Resources acquired for one device. Dropping releases the interface, then
/// the configuration, then closes the device.
struct Claimed<D: TransportDevice> {
    device: D,
    config: bool,
    interface: bool,
}

impl<D: TransportDevice> Claimed<D> {
    fn new(device: D) -> Self {
        Self {
            device,
            config: false,
            interface: false,
        }
    }

    fn release(&mut self) {
        if self.interface {
            self.device.release_interface();
            self.interface = false;
        }
        if self.config {
            self.device.release_config();
            self.config = false;
        }
    }
}

impl<D: TransportDevice> Drop for Claimed<D> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Session with a single Xbox One controller
pub struct Driver<D: TransportDevice> {
    /// Claimed device, or [None] once closed
    claimed: Option<Claimed<D>>,
    id: DeviceId,
    input: Endpoint,
    output: Endpoint,
}

impl<D: TransportDevice> Driver<D> {
    /// Open the first supported controller that can be fully claimed
    pub fn open<T>(transport: &mut T) -> Result<Self, DriverError>
    where
        T: Transport<Device = D>,
    {
        Self::open_candidates(transport, &CANDIDATES)
    }

    /// Try each candidate in order. Anything acquired for a candidate that
    /// cannot be fully claimed is released before the next one is tried.
    pub fn open_candidates<T>(transport: &mut T, candidates: &[DeviceId]) -> Result<Self, DriverError>
    where
        T: Transport<Device = D>,
    {
        for id in candidates {
            match Self::claim(transport, *id) {
                Ok(driver) => {
                    log::info!(
                        "Found {} with PID: {:#06x}",
                        product_name(id.product_id),
                        id.product_id
                    );
                    return Ok(driver);
                }
                Err(TransportError::NotFound(_)) => {
                    log::trace!("No device found for {id}");
                }
                Err(e) => {
                    log::debug!("Skipping device {id}: {e}");
                }
            }
        }

        Err(DriverError::NoDeviceFound)
    }

    fn claim<T>(transport: &mut T, id: DeviceId) -> Result<Self, TransportError>
    where
        T: Transport<Device = D>,
    {
        let mut claimed = Claimed::new(transport.open(id)?);
        claimed.device.claim_config(CONFIGURATION)?;
        claimed.config = true;
        claimed.device.claim_interface(INTERFACE, ALT_SETTING)?;
        claimed.interface = true;
        let input = claimed.device.in_endpoint(ENDPOINT)?;
        let output = claimed.device.out_endpoint(ENDPOINT)?;

        Ok(Self {
            claimed: Some(claimed),
            id,
            input,
            output,
        })
    }

    /// Returns the id of the selected device
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns true until the driver has been closed
    pub fn is_open(&self) -> bool {
        self.claimed.is_some()
    }

    /// Send the start command and wait for the controller to get ready
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        let claimed = self.claimed.as_mut().ok_or(DriverError::Closed)?;
        claimed
            .device
            .write(self.output, &INIT_PAYLOAD)
            .map_err(DriverError::InitializationFailed)?;
        thread::sleep(INIT_DELAY);
        log::debug!("Initialized device {}", self.id);

        Ok(())
    }

    /// Read one report from the device. Only the bytes actually received are
    /// returned.
    pub fn read(&mut self) -> Result<Vec<u8>, DriverError> {
        let claimed = self.claimed.as_mut().ok_or(DriverError::Closed)?;
        let mut buf = [0; PACKET_SIZE];
        let bytes_read = claimed.device.read(self.input, &mut buf)?;
        let slice = &buf[..bytes_read.min(PACKET_SIZE)];
        log::trace!("Got report of {} bytes: {slice:02x?}", slice.len());

        Ok(slice.to_vec())
    }

    /// Release the interface, configuration and device. Calling this more
    /// than once has no effect.
    pub fn close(&mut self) {
        if let Some(claimed) = self.claimed.take() {
            drop(claimed);
            log::debug!("Closed device {}", self.id);
        }
    }
}

impl<D: TransportDevice> std::fmt::Debug for Driver<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .finish()
    }
}
