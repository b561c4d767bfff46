use std::fmt::Display;

use super::event::{Button, Event, Stick};

/// Minimum change of an analog value before it is reported
pub const ANALOG_THRESHOLD: f32 = 0.1;

/// Accessor for one button field of a [ControllerState]
pub type ButtonField = fn(&ControllerState) -> bool;

/// Button fields in declaration order. Button events are always emitted in
/// this order.
pub const BUTTON_FIELDS: [(Button, ButtonField); 16] = [
    (Button::A, |s| s.a),
    (Button::B, |s| s.b),
    (Button::X, |s| s.x),
    (Button::Y, |s| s.y),
    (Button::RB, |s| s.rb),
    (Button::LB, |s| s.lb),
    (Button::DPadUp, |s| s.dpad_up),
    (Button::DPadRight, |s| s.dpad_right),
    (Button::DPadDown, |s| s.dpad_down),
    (Button::DPadLeft, |s| s.dpad_left),
    (Button::ThumbL, |s| s.thumb_l),
    (Button::ThumbR, |s| s.thumb_r),
    (Button::Menu, |s| s.menu),
    (Button::View, |s| s.view),
    (Button::Guide, |s| s.guide),
    (Button::Share, |s| s.share),
];

/// Decoded snapshot of the controller. Triggers are normalized to
/// [0.0, 1.0] and sticks to [-1.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerState {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub rb: bool,
    pub lb: bool,
    pub dpad_up: bool,
    pub dpad_right: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub thumb_l: bool,
    pub thumb_r: bool,
    pub menu: bool,
    pub view: bool,
    pub guide: bool,
    pub share: bool,
    pub lt: f32,
    pub rt: f32,
    pub left_x: f32,
    pub left_y: f32,
    pub right_x: f32,
    pub right_y: f32,
}

impl ControllerState {
    /// Returns whether the given button is pressed
    pub fn is_pressed(&self, button: Button) -> bool {
        BUTTON_FIELDS
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, pressed)| pressed(self))
            .unwrap_or_default()
    }

    /// Returns all currently pressed buttons in declaration order
    pub fn pressed_buttons(&self) -> Vec<Button> {
        BUTTON_FIELDS
            .iter()
            .filter(|(_, pressed)| pressed(self))
            .map(|(button, _)| *button)
            .collect()
    }

    /// Returns true if no change between the two states would be reported:
    /// every button matches and no axis moved by more than [ANALOG_THRESHOLD].
    pub fn is_equivalent(&self, other: &ControllerState) -> bool {
        let buttons_match = BUTTON_FIELDS
            .iter()
            .all(|(_, pressed)| pressed(self) == pressed(other));
        buttons_match
            && !moved(self.lt, other.lt)
            && !moved(self.rt, other.rt)
            && !moved(self.left_x, other.left_x)
            && !moved(self.left_y, other.left_y)
            && !moved(self.right_x, other.right_x)
            && !moved(self.right_y, other.right_y)
    }
}

impl Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let buttons: Vec<&str> = self
            .pressed_buttons()
            .iter()
            .map(|button| button.name())
            .collect();
        write!(
            f,
            "buttons=[{}] LT={:.2} RT={:.2} L=({:.2}, {:.2}) R=({:.2}, {:.2})",
            buttons.join(" "),
            self.lt,
            self.rt,
            self.left_x,
            self.left_y,
            self.right_x,
            self.right_y
        )
    }
}

/// Translate the change between two states into individual events. Without a
/// previous state nothing is reported; the first state is only a baseline.
pub fn diff(current: &ControllerState, previous: Option<&ControllerState>) -> Vec<Event> {
    let mut events = Vec::new();
    let Some(previous) = previous else {
        return events;
    };

    // Binary events
    for (button, pressed) in BUTTON_FIELDS {
        let value = pressed(current);
        if value == pressed(previous) {
            continue;
        }
        if value {
            events.push(Event::ButtonPressed(button));
        } else {
            events.push(Event::ButtonReleased(button));
        }
    }

    // Axis events
    if moved(current.left_x, previous.left_x) || moved(current.left_y, previous.left_y) {
        events.push(Event::StickMoved {
            stick: Stick::Left,
            x: current.left_x,
            y: current.left_y,
        });
    }
    if moved(current.right_x, previous.right_x) || moved(current.right_y, previous.right_y) {
        events.push(Event::StickMoved {
            stick: Stick::Right,
            x: current.right_x,
            y: current.right_y,
        });
    }

    // Trigger events
    if moved(current.lt, previous.lt) || moved(current.rt, previous.rt) {
        events.push(Event::TriggersChanged {
            left: current.lt,
            right: current.rt,
        });
    }

    events
}

fn moved(current: f32, previous: f32) -> bool {
    (current - previous).abs() > ANALOG_THRESHOLD
}
