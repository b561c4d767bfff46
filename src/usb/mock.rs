//! In-memory [Transport] for exercising device selection and polling without
//! hardware attached. Every resource acquisition and release is recorded in
//! a shared [Journal].
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use super::{DeviceId, Endpoint, Resource, TransferKind, Transport, TransportDevice, TransportError};

/// Endpoint addresses handed out by [MockHandle]
pub const MOCK_IN_ENDPOINT: u8 = 0x81;
pub const MOCK_OUT_ENDPOINT: u8 = 0x01;

/// A call made against a mock device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Open(DeviceId),
    ClaimConfig(DeviceId),
    ClaimInterface(DeviceId),
    ReleaseInterface(DeviceId),
    ReleaseConfig(DeviceId),
    Close(DeviceId),
    Write(DeviceId, Vec<u8>),
}

/// Shared record of every call made through a [MockTransport]
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<MockCall>>>);

impl Journal {
    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    /// Returns all recorded calls in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Returns the calls recorded for the given device
    pub fn calls_for(&self, id: DeviceId) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.device_id() == id)
            .collect()
    }

    /// Number of resources acquired on the given device that have not been
    /// released yet.
    pub fn outstanding(&self, id: DeviceId) -> usize {
        let mut count: isize = 0;
        for call in self.calls_for(id) {
            match call {
                MockCall::Open(_) | MockCall::ClaimConfig(_) | MockCall::ClaimInterface(_) => {
                    count += 1
                }
                MockCall::ReleaseInterface(_) | MockCall::ReleaseConfig(_) | MockCall::Close(_) => {
                    count -= 1
                }
                MockCall::Write(_, _) => (),
            }
        }
        count.max(0) as usize
    }
}

impl MockCall {
    fn device_id(&self) -> DeviceId {
        match self {
            MockCall::Open(id)
            | MockCall::ClaimConfig(id)
            | MockCall::ClaimInterface(id)
            | MockCall::ReleaseInterface(id)
            | MockCall::ReleaseConfig(id)
            | MockCall::Close(id)
            | MockCall::Write(id, _) => *id,
        }
    }
}

/// Behavior of one attached mock device
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    fail_at: Option<Resource>,
    fail_writes: bool,
    reads: VecDeque<Result<Vec<u8>, TransportError>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when the given resource is acquired. [Resource::Device] makes the
    /// device impossible to open.
    pub fn failing_at(mut self, resource: Resource) -> Self {
        self.fail_at = Some(resource);
        self
    }

    /// Fail every write
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Queue a report to be returned by the next read
    pub fn with_report(mut self, report: Vec<u8>) -> Self {
        self.reads.push_back(Ok(report));
        self
    }

    /// Queue an error to be returned by the next read
    pub fn with_read_error(mut self, err: TransportError) -> Self {
        self.reads.push_back(Err(err));
        self
    }
}

/// A [Transport] serving [MockDevice] instances
#[derive(Debug, Default)]
pub struct MockTransport {
    devices: HashMap<DeviceId, MockDevice>,
    journal: Journal,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device with the given id
    pub fn with_device(mut self, id: DeviceId, device: MockDevice) -> Self {
        self.devices.insert(id, device);
        self
    }

    /// Returns a handle to the shared call journal
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

impl Transport for MockTransport {
    type Device = MockHandle;

    fn open(&mut self, id: DeviceId) -> Result<Self::Device, TransportError> {
        let Some(device) = self.devices.get(&id) else {
            return Err(TransportError::NotFound(id));
        };
        if device.fail_at == Some(Resource::Device) {
            return Err(TransportError::NotFound(id));
        }
        self.journal.record(MockCall::Open(id));

        Ok(MockHandle {
            id,
            device: device.clone(),
            journal: self.journal.clone(),
            config: false,
            interface: false,
        })
    }
}

/// An opened [MockDevice]
#[derive(Debug)]
pub struct MockHandle {
    id: DeviceId,
    device: MockDevice,
    journal: Journal,
    config: bool,
    interface: bool,
}

impl MockHandle {
    fn check(&self, resource: Resource) -> Result<(), TransportError> {
        if self.device.fail_at == Some(resource) {
            return Err(TransportError::ClaimError {
                resource,
                reason: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TransportDevice for MockHandle {
    fn claim_config(&mut self, _config: u8) -> Result<(), TransportError> {
        self.check(Resource::Config)?;
        self.config = true;
        self.journal.record(MockCall::ClaimConfig(self.id));
        Ok(())
    }

    fn release_config(&mut self) {
        if self.config {
            self.config = false;
            self.journal.record(MockCall::ReleaseConfig(self.id));
        }
    }

    fn claim_interface(&mut self, _interface: u8, _alt_setting: u8) -> Result<(), TransportError> {
        self.check(Resource::Interface)?;
        self.interface = true;
        self.journal.record(MockCall::ClaimInterface(self.id));
        Ok(())
    }

    fn release_interface(&mut self) {
        if self.interface {
            self.interface = false;
            self.journal.record(MockCall::ReleaseInterface(self.id));
        }
    }

    fn in_endpoint(&mut self, _number: u8) -> Result<Endpoint, TransportError> {
        self.check(Resource::InEndpoint)?;
        Ok(Endpoint {
            address: MOCK_IN_ENDPOINT,
            kind: TransferKind::Interrupt,
        })
    }

    fn out_endpoint(&mut self, _number: u8) -> Result<Endpoint, TransportError> {
        self.check(Resource::OutEndpoint)?;
        Ok(Endpoint {
            address: MOCK_OUT_ENDPOINT,
            kind: TransferKind::Interrupt,
        })
    }

    fn write(&mut self, _endpoint: Endpoint, buf: &[u8]) -> Result<usize, TransportError> {
        if self.device.fail_writes {
            return Err(TransportError::Io("mock write failure".to_string()));
        }
        self.journal.record(MockCall::Write(self.id, buf.to_vec()));
        Ok(buf.len())
    }

    fn read(&mut self, _endpoint: Endpoint, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.device.reads.pop_front() {
            Some(Ok(report)) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            Some(Err(e)) => Err(e),
            None => Err(TransportError::Timeout),
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.journal.record(MockCall::Close(self.id));
    }
}
