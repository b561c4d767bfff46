use std::{
    error::Error,
    sync::{Arc, OnceLock},
    time::Duration,
};

use packed_struct::PackedStructSlice;

use crate::{
    drivers::xbox_one::{
        driver::{Driver, CANDIDATES},
        event::{Button, Event, Stick},
        hid_report::GipInputReport,
    },
    input::sink::Sink,
    usb::{
        mock::{MockDevice, MockHandle, MockTransport},
        TransportError,
    },
};

use super::{
    client::SourceDeviceClient, poll_interval, xbox_one::XboxOne, InputError, SourceDriver,
    SourceDriverOptions, SourceInputDevice,
};

const NO_WAIT: SourceDriverOptions = SourceDriverOptions {
    poll_rate: Duration::ZERO,
    error_backoff: Duration::ZERO,
};

/// Collects events and stops the driver once enough have arrived
struct StopAfter {
    count: usize,
    events: Vec<Event>,
    client: Arc<OnceLock<SourceDeviceClient>>,
}

impl Sink for StopAfter {
    fn send(&mut self, events: &[Event]) {
        self.events.extend_from_slice(events);
        if self.events.len() < self.count {
            return;
        }
        if let Some(client) = self.client.get() {
            client.try_stop().expect("should send stop command");
        }
    }
}

fn report(report: GipInputReport) -> Vec<u8> {
    report.pack_to_vec().expect("should pack report")
}

fn open(device: MockDevice) -> Result<XboxOne<MockHandle>, Box<dyn Error>> {
    let mut transport = MockTransport::new().with_device(CANDIDATES[0], device);
    let driver = Driver::open(&mut transport)?;
    Ok(XboxOne::new(driver))
}

#[test]
fn test_poll_interval() {
    assert_eq!(poll_interval(500), Duration::from_millis(2));
    assert_eq!(poll_interval(1000), Duration::from_millis(1));
    assert_eq!(poll_interval(60), Duration::from_nanos(16_666_666));
    assert_eq!(poll_interval(0), Duration::from_millis(16));
    assert_eq!(poll_interval(-250), Duration::from_millis(16));
}

#[test]
fn test_first_report_is_baseline() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        a: true,
        l_stick_x: 16384,
        ..Default::default()
    };
    let mut device = open(MockDevice::new().with_report(report(pressed)))?;
    let events = device.poll()?;
    assert!(events.is_empty());
    assert!(device.state().is_some_and(|state| state.a));

    Ok(())
}

#[test]
fn test_poll_events() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        a: true,
        l_stick_x: 16384,
        ..Default::default()
    };
    let device = open(
        MockDevice::new()
            .with_report(report(GipInputReport::default()))
            .with_report(report(pressed))
            .with_report(report(GipInputReport::default())),
    )?;
    let mut source = SourceDriver::new_with_options(device, Vec::new(), NO_WAIT);

    assert!(source.poll()?.is_empty());
    let events = source.poll()?;
    assert_eq!(
        events,
        vec![
            Event::ButtonPressed(Button::A),
            Event::StickMoved {
                stick: Stick::Left,
                x: 0.5,
                y: 0.0
            },
        ]
    );
    source.poll()?;
    assert_eq!(
        source.sink()[2..],
        [
            Event::ButtonReleased(Button::A),
            Event::StickMoved {
                stick: Stick::Left,
                x: 0.0,
                y: 0.0
            },
        ]
    );

    Ok(())
}

#[test]
fn test_failed_cycles_keep_last_state() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        b: true,
        ..Default::default()
    };
    let device = open(
        MockDevice::new()
            .with_report(report(pressed))
            .with_report(vec![0x20, 0x00, 0x01])
            .with_read_error(TransportError::Io("pipe error".to_string()))
            .with_report(report(pressed)),
    )?;
    let mut source = SourceDriver::new_with_options(device, Vec::new(), NO_WAIT);

    assert!(source.poll()?.is_empty());
    assert!(matches!(source.poll(), Err(InputError::Decode(_))));
    assert!(matches!(source.poll(), Err(InputError::Read(_))));
    // Compared against the last good report, so nothing changed
    assert!(source.poll()?.is_empty());
    assert!(source.sink().is_empty());

    Ok(())
}

#[test]
fn test_unknown_report_resets_state() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        y: true,
        ..Default::default()
    };
    let mut unknown = vec![0; 32];
    unknown[0] = 0x03;
    let device = open(
        MockDevice::new()
            .with_report(report(pressed))
            .with_report(unknown),
    )?;
    let mut source = SourceDriver::new_with_options(device, Vec::new(), NO_WAIT);

    source.poll()?;
    let events = source.poll()?;
    assert_eq!(events, vec![Event::ButtonReleased(Button::Y)]);

    Ok(())
}

#[test]
fn test_run_until_stopped() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        rb: true,
        trigger_r: 1023,
        ..Default::default()
    };
    let device = open(
        MockDevice::new()
            .with_report(report(GipInputReport::default()))
            .with_report(vec![0; 4])
            .with_read_error(TransportError::Timeout)
            .with_report(report(pressed)),
    )?;
    let client = Arc::new(OnceLock::new());
    let sink = StopAfter {
        count: 2,
        events: Vec::new(),
        client: client.clone(),
    };
    let mut source = SourceDriver::new_with_options(device, sink, NO_WAIT);
    let _ = client.set(source.client());

    source.run();
    assert_eq!(
        source.sink().events,
        vec![
            Event::ButtonPressed(Button::RB),
            Event::TriggersChanged {
                left: 0.0,
                right: 1.0
            },
        ]
    );

    Ok(())
}

#[test]
fn test_stop_before_run() -> Result<(), Box<dyn Error>> {
    let device = open(MockDevice::new().with_report(report(GipInputReport::default())))?;
    let mut source = SourceDriver::new_with_options(device, Vec::new(), NO_WAIT);
    source.client().try_stop()?;
    source.run();
    assert!(source.sink().is_empty());

    Ok(())
}
