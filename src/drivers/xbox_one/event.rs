use std::fmt::Display;

/// Events that can be emitted by the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    ButtonPressed(Button),
    ButtonReleased(Button),
    /// Stick position after the move, not the delta
    StickMoved { stick: Stick, x: f32, y: f32 },
    /// Both trigger values, even if only one of them changed
    TriggersChanged { left: f32, right: f32 },
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::ButtonPressed(button) => write!(f, "{button} pressed"),
            Event::ButtonReleased(button) => write!(f, "{button} released"),
            Event::StickMoved { stick, x, y } => write!(f, "{stick} stick: {x:.2}, {y:.2}"),
            Event::TriggersChanged { left, right } => {
                write!(f, "Triggers: LT={left:.2} RT={right:.2}")
            }
        }
    }
}

/// Binary inputs on the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// A Button
    A,
    /// B Button
    B,
    /// X Button
    X,
    /// Y Button
    Y,
    /// Right shoulder button
    RB,
    /// Left shoulder button
    LB,
    /// DPad up
    DPadUp,
    /// DPad right
    DPadRight,
    /// DPad down
    DPadDown,
    /// DPad left
    DPadLeft,
    /// Z-axis button on the left stick
    ThumbL,
    /// Z-axis button on the right stick
    ThumbR,
    /// Menu (☰) button
    Menu,
    /// View ⧉  button
    View,
    /// Guide button
    Guide,
    /// Share button
    Share,
}

impl Button {
    /// Short name of the button as printed on the controller
    pub fn name(&self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
            Button::RB => "RB",
            Button::LB => "LB",
            Button::DPadUp => "UP",
            Button::DPadRight => "RIGHT",
            Button::DPadDown => "DOWN",
            Button::DPadLeft => "LEFT",
            Button::ThumbL => "LS",
            Button::ThumbR => "RS",
            Button::Menu => "MENU",
            Button::View => "VIEW",
            Button::Guide => "GUIDE",
            Button::Share => "SHARE",
        }
    }
}

impl Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

impl Display for Stick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stick::Left => write!(f, "Left"),
            Stick::Right => write!(f, "Right"),
        }
    }
}
