use std::fmt::Debug;

use crate::{
    drivers::xbox_one::{
        driver::Driver,
        event::Event,
        hid_report,
        state::{self, ControllerState},
    },
    usb::TransportDevice,
};

use super::{InputError, SourceInputDevice};

/// Xbox One source device implementation
pub struct XboxOne<D: TransportDevice> {
    driver: Driver<D>,
    /// State from the last successful poll
    state: Option<ControllerState>,
}

impl<D: TransportDevice> XboxOne<D> {
    pub fn new(driver: Driver<D>) -> Self {
        Self {
            driver,
            state: None,
        }
    }

    /// Returns the state decoded by the last successful poll
    pub fn state(&self) -> Option<&ControllerState> {
        self.state.as_ref()
    }

    /// Update the state, returning the old one
    fn update_state(&mut self, state: ControllerState) -> Option<ControllerState> {
        self.state.replace(state)
    }
}

impl<D: TransportDevice> SourceInputDevice for XboxOne<D> {
    /// Read one report and translate it into events. Nothing is stored when
    /// the read or decode fails, so the next report is compared against the
    /// last good state.
    fn poll(&mut self) -> Result<Vec<Event>, InputError> {
        let buf = self.driver.read()?;
        let state = hid_report::decode(&buf)?;
        log::trace!("State: {state}");

        let old_state = self.update_state(state);
        let events = state::diff(&state, old_state.as_ref());
        if !events.is_empty() {
            log::debug!("Got events: {events:?}");
        }

        Ok(events)
    }

    fn stop(&mut self) {
        self.driver.close();
    }
}

impl<D: TransportDevice> Debug for XboxOne<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XboxOne")
            .field("driver", &self.driver)
            .finish()
    }
}
