use std::time::Duration;

use rusb::{Context, DeviceHandle, Direction, LogLevel, TransferType, UsbContext};

use super::{DeviceId, Endpoint, Resource, TransferKind, Transport, TransportDevice, TransportError};

/// libusb backed [Transport]
pub struct UsbTransport {
    context: Context,
    timeout: Duration,
}

impl UsbTransport {
    /// Create a new libusb context. The debug level is handed to libusb
    /// as its log level. A zero timeout blocks reads and writes forever.
    pub fn new(debug: u8, timeout: Duration) -> Result<Self, TransportError> {
        let mut context = Context::new().map_err(|e| TransportError::Io(e.to_string()))?;
        context.set_log_level(log_level(debug));
        Ok(Self { context, timeout })
    }
}

impl Transport for UsbTransport {
    type Device = UsbDevice;

    fn open(&mut self, id: DeviceId) -> Result<Self::Device, TransportError> {
        let handle = self
            .context
            .open_device_with_vid_pid(id.vendor_id, id.product_id)
            .ok_or(TransportError::NotFound(id))?;
        log::trace!("Opened USB device {id}");

        Ok(UsbDevice {
            id,
            handle,
            timeout: self.timeout,
            config: None,
            interface: None,
        })
    }
}

impl std::fmt::Debug for UsbTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// An opened libusb device handle
pub struct UsbDevice {
    id: DeviceId,
    handle: DeviceHandle<Context>,
    timeout: Duration,
    config: Option<u8>,
    /// Claimed interface number and alternate setting
    interface: Option<(u8, u8)>,
}

impl UsbDevice {
    /// Look up an endpoint on the claimed interface setting
    fn find_endpoint(&self, number: u8, direction: Direction) -> Result<Endpoint, TransportError> {
        let resource = match direction {
            Direction::In => Resource::InEndpoint,
            Direction::Out => Resource::OutEndpoint,
        };
        let Some((interface, alt_setting)) = self.interface else {
            return Err(claim_error(resource, "no interface claimed"));
        };

        let descriptor = self
            .handle
            .device()
            .active_config_descriptor()
            .map_err(|e| claim_error(resource, e))?;
        for iface in descriptor.interfaces() {
            for setting in iface.descriptors() {
                if setting.interface_number() != interface || setting.setting_number() != alt_setting
                {
                    continue;
                }
                for endpoint in setting.endpoint_descriptors() {
                    if endpoint.number() != number || endpoint.direction() != direction {
                        continue;
                    }
                    let kind = match endpoint.transfer_type() {
                        TransferType::Bulk => TransferKind::Bulk,
                        _ => TransferKind::Interrupt,
                    };
                    return Ok(Endpoint {
                        address: endpoint.address(),
                        kind,
                    });
                }
            }
        }

        Err(claim_error(
            resource,
            format!("endpoint {number} not found on interface {interface}"),
        ))
    }
}

impl TransportDevice for UsbDevice {
    fn claim_config(&mut self, config: u8) -> Result<(), TransportError> {
        // Kernel drivers bound to the interface would block claiming it
        if let Err(e) = self.handle.set_auto_detach_kernel_driver(true) {
            log::debug!("Kernel driver auto-detach unavailable for {}: {e}", self.id);
        }

        let active = self
            .handle
            .active_configuration()
            .map_err(|e| claim_error(Resource::Config, e))?;
        if active != config {
            self.handle
                .set_active_configuration(config)
                .map_err(|e| claim_error(Resource::Config, e))?;
        }
        self.config = Some(config);

        Ok(())
    }

    fn release_config(&mut self) {
        if let Some(config) = self.config.take() {
            log::trace!("Released configuration {config} on {}", self.id);
        }
    }

    fn claim_interface(&mut self, interface: u8, alt_setting: u8) -> Result<(), TransportError> {
        self.handle
            .claim_interface(interface)
            .map_err(|e| claim_error(Resource::Interface, e))?;
        if let Err(e) = self.handle.set_alternate_setting(interface, alt_setting) {
            if let Err(e) = self.handle.release_interface(interface) {
                log::debug!("Failed to release interface {interface}: {e}");
            }
            return Err(claim_error(Resource::Interface, e));
        }
        self.interface = Some((interface, alt_setting));

        Ok(())
    }

    fn release_interface(&mut self) {
        let Some((interface, _)) = self.interface.take() else {
            return;
        };
        if let Err(e) = self.handle.release_interface(interface) {
            log::debug!("Failed to release interface {interface} on {}: {e}", self.id);
        }
    }

    fn in_endpoint(&mut self, number: u8) -> Result<Endpoint, TransportError> {
        self.find_endpoint(number, Direction::In)
    }

    fn out_endpoint(&mut self, number: u8) -> Result<Endpoint, TransportError> {
        self.find_endpoint(number, Direction::Out)
    }

    fn write(&mut self, endpoint: Endpoint, buf: &[u8]) -> Result<usize, TransportError> {
        let result = match endpoint.kind {
            TransferKind::Interrupt => self.handle.write_interrupt(endpoint.address, buf, self.timeout),
            TransferKind::Bulk => self.handle.write_bulk(endpoint.address, buf, self.timeout),
        };
        result.map_err(transfer_error)
    }

    fn read(&mut self, endpoint: Endpoint, buf: &mut [u8]) -> Result<usize, TransportError> {
        let result = match endpoint.kind {
            TransferKind::Interrupt => self.handle.read_interrupt(endpoint.address, buf, self.timeout),
            TransferKind::Bulk => self.handle.read_bulk(endpoint.address, buf, self.timeout),
        };
        result.map_err(transfer_error)
    }
}

impl Drop for UsbDevice {
    fn drop(&mut self) {
        self.release_interface();
        self.release_config();
        log::trace!("Closed USB device {}", self.id);
    }
}

impl std::fmt::Debug for UsbDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbDevice")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("interface", &self.interface)
            .finish()
    }
}

/// Map the numeric debug level onto a libusb log level
pub fn log_level(debug: u8) -> LogLevel {
    match debug {
        0 => LogLevel::None,
        1 => LogLevel::Error,
        2 => LogLevel::Warning,
        3 => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

fn claim_error(resource: Resource, reason: impl ToString) -> TransportError {
    TransportError::ClaimError {
        resource,
        reason: reason.to_string(),
    }
}

fn transfer_error(err: rusb::Error) -> TransportError {
    match err {
        rusb::Error::Timeout => TransportError::Timeout,
        err => TransportError::Io(err.to_string()),
    }
}
