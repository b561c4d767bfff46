pub mod device;
pub mod mock;

use std::fmt::Display;

use thiserror::Error;

/// A (vendor, product) pair identifying a USB device model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl DeviceId {
    pub const fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

/// Resources that must be acquired before a device can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Device,
    Config,
    Interface,
    InEndpoint,
    OutEndpoint,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Device => "device",
            Resource::Config => "configuration",
            Resource::Interface => "interface",
            Resource::InEndpoint => "input endpoint",
            Resource::OutEndpoint => "output endpoint",
        };
        write!(f, "{name}")
    }
}

/// Possible errors from the USB transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("device {0} not found")]
    NotFound(DeviceId),
    #[error("unable to claim {resource}: {reason}")]
    ClaimError { resource: Resource, reason: String },
    #[error("transfer failed: {0}")]
    Io(String),
    #[error("transfer timed out")]
    Timeout,
}

/// How data moves through an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Interrupt,
    Bulk,
}

/// An endpoint resolved while claiming a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub address: u8,
    pub kind: TransferKind,
}

/// A [Transport] locates and opens USB devices.
pub trait Transport {
    type Device: TransportDevice;

    /// Open the first device matching the given id. Returns
    /// [TransportError::NotFound] if no such device is attached.
    fn open(&mut self, id: DeviceId) -> Result<Self::Device, TransportError>;
}

/// An opened USB device. Dropping the device closes it.
///
/// Release methods must tolerate being called for resources that were never
/// claimed or were already released.
pub trait TransportDevice {
    /// Select the given configuration value
    fn claim_config(&mut self, config: u8) -> Result<(), TransportError>;
    fn release_config(&mut self);
    /// Claim the given interface and switch it to the alternate setting
    fn claim_interface(&mut self, interface: u8, alt_setting: u8) -> Result<(), TransportError>;
    fn release_interface(&mut self);
    /// Find the IN endpoint with the given number on the claimed interface
    fn in_endpoint(&mut self, number: u8) -> Result<Endpoint, TransportError>;
    /// Find the OUT endpoint with the given number on the claimed interface
    fn out_endpoint(&mut self, number: u8) -> Result<Endpoint, TransportError>;
    /// Write the buffer to the endpoint, returning the number of bytes written
    fn write(&mut self, endpoint: Endpoint, buf: &[u8]) -> Result<usize, TransportError>;
    /// Read from the endpoint into the buffer, returning the number of bytes read
    fn read(&mut self, endpoint: Endpoint, buf: &mut [u8]) -> Result<usize, TransportError>;
}
