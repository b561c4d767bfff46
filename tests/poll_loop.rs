use std::error::Error;
use std::time::Duration;

use packed_struct::PackedStructSlice;
use tokio::sync::mpsc;

use xone_poll::drivers::xbox_one::driver::{Driver, CANDIDATES, INIT_PAYLOAD};
use xone_poll::drivers::xbox_one::event::{Button, Event, Stick};
use xone_poll::drivers::xbox_one::hid_report::{GipGuideReport, GipInputReport};
use xone_poll::input::sink::ChannelSink;
use xone_poll::input::source::{xbox_one::XboxOne, SourceDriver, SourceDriverOptions};
use xone_poll::usb::mock::{MockCall, MockDevice, MockTransport};
use xone_poll::usb::{Resource, TransportError};

#[tokio::test]
async fn test_poll_loop() -> Result<(), Box<dyn Error>> {
    let pressed = GipInputReport {
        a: true,
        l_stick_x: 16384,
        trigger_l: 1023,
        ..Default::default()
    };
    let mut guide = GipGuideReport {
        guide: true,
        ..Default::default()
    }
    .pack_to_vec()?;
    // System reports arrive padded to the minimum report size
    guide.resize(16, 0);

    let [first, second, ..] = CANDIDATES;
    let mut transport = MockTransport::new()
        .with_device(first, MockDevice::new().failing_at(Resource::Config))
        .with_device(
            second,
            MockDevice::new()
                .with_report(GipInputReport::default().pack_to_vec()?)
                .with_read_error(TransportError::Io("babble".to_string()))
                .with_report(pressed.pack_to_vec()?)
                .with_report(vec![0x20; 8])
                .with_report(guide),
        );
    let journal = transport.journal();

    let mut driver = Driver::open(&mut transport)?;
    driver.initialize()?;

    let (tx, mut rx) = mpsc::channel(64);
    let options = SourceDriverOptions {
        poll_rate: Duration::from_millis(1),
        error_backoff: Duration::from_millis(1),
    };
    let mut source =
        SourceDriver::new_with_options(XboxOne::new(driver), ChannelSink::new(tx), options);
    let client = source.client();
    let task = tokio::task::spawn_blocking(move || source.run());

    let expected = vec![
        Event::ButtonPressed(Button::A),
        Event::StickMoved {
            stick: Stick::Left,
            x: 0.5,
            y: 0.0,
        },
        Event::TriggersChanged {
            left: 1.0,
            right: 0.0,
        },
        Event::ButtonReleased(Button::A),
        Event::ButtonPressed(Button::Guide),
        Event::StickMoved {
            stick: Stick::Left,
            x: 0.0,
            y: 0.0,
        },
        Event::TriggersChanged {
            left: 0.0,
            right: 0.0,
        },
    ];
    let mut events = Vec::new();
    while events.len() < expected.len() {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await?
            .ok_or("event channel closed")?;
        events.push(event);
    }
    assert_eq!(events, expected);

    client.stop().await?;
    tokio::time::timeout(Duration::from_secs(5), task).await??;

    // Only the selected device was initialized and everything was released
    let writes: Vec<MockCall> = journal
        .calls()
        .into_iter()
        .filter(|call| matches!(call, MockCall::Write(_, _)))
        .collect();
    assert_eq!(writes, vec![MockCall::Write(second, INIT_PAYLOAD.to_vec())]);
    assert_eq!(journal.outstanding(first), 0);
    assert_eq!(journal.outstanding(second), 0);

    Ok(())
}
