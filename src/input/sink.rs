use tokio::sync::mpsc;

use crate::drivers::xbox_one::event::Event;

/// A [Sink] receives the events produced by each poll cycle, in order
pub trait Sink {
    fn send(&mut self, events: &[Event]);
}

/// Writes every event to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn send(&mut self, events: &[Event]) {
        for event in events {
            log::info!("{event}");
        }
    }
}

/// Forwards every event over a channel. Must not be used from within an
/// async context.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Event>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }
}

impl Sink for ChannelSink {
    fn send(&mut self, events: &[Event]) {
        for event in events {
            if let Err(e) = self.tx.blocking_send(*event) {
                log::debug!("Event receiver closed: {e}");
                return;
            }
        }
    }
}

/// Collects events, mostly useful for inspection
impl Sink for Vec<Event> {
    fn send(&mut self, events: &[Event]) {
        self.extend_from_slice(events);
    }
}
