//! Reports sent by Xbox One controllers over the Gaming Input Protocol (GIP).
//! Reference: https://github.com/quantus/xbox-one-controller-protocol
//! Reference: https://github.com/paroj/xpad/blob/master/xpad.c
use packed_struct::prelude::*;
use thiserror::Error;

use super::state::ControllerState;

/// Reports shorter than this are truncated transfers
pub const REPORT_MIN_SIZE: usize = 16;
/// Size of the [GipInputReport]
pub const INPUT_REPORT_SIZE: usize = 17;
/// Size of the [GipGuideReport]
pub const GUIDE_REPORT_SIZE: usize = 4;

// Input report axis ranges
pub const TRIGGER_AXIS_MAX: f32 = 1023.0;
pub const JOY_AXIS_SCALE: f32 = 32768.0;

/// Stick deflections smaller than this are treated as centered
pub const DEADZONE: f32 = 0.1;

/// Different report types
#[derive(PrimitiveEnum_u8, Clone, Copy, PartialEq, Debug)]
pub enum ReportType {
    GuideButton = 0x07,
    Input = 0x20,
}

/// Possible errors decoding a report
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("short read: {len} bytes")]
    ShortReport { len: usize },
    #[error("unable to unpack report: {0:?}")]
    Packing(#[from] PackingError),
}

/// Full input state report
// # ReportID: 20 | Flags | Seq | Buttons | Buttons | LT  | RT  | LX  | LY  | RX  | RY
// E: 20 00 3a 10 00 00 00 00 00 00 40 00 00 00 00 00 00
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "17")]
pub struct GipInputReport {
    // BYTE 0
    #[packed_field(bytes = "0")]
    pub report_id: u8,
    // BYTE 1
    #[packed_field(bytes = "1")]
    pub flags: u8,
    // BYTE 2
    #[packed_field(bytes = "2")]
    pub sequence: u8,

    // Buttons
    // BYTE 3
    #[packed_field(bits = "24")]
    pub y: bool,
    #[packed_field(bits = "25")]
    pub b: bool,
    #[packed_field(bits = "26")]
    pub x: bool,
    #[packed_field(bits = "27")]
    pub a: bool,
    #[packed_field(bits = "28")]
    pub view: bool,
    #[packed_field(bits = "29")]
    pub menu: bool,
    #[packed_field(bits = "31")]
    pub share: bool,
    // BYTE 4
    #[packed_field(bits = "32")]
    pub thumb_r: bool,
    #[packed_field(bits = "33")]
    pub thumb_l: bool,
    #[packed_field(bits = "34")]
    pub rb: bool,
    #[packed_field(bits = "35")]
    pub lb: bool,
    #[packed_field(bits = "36")]
    pub dpad_right: bool,
    #[packed_field(bits = "37")]
    pub dpad_left: bool,
    #[packed_field(bits = "38")]
    pub dpad_down: bool,
    #[packed_field(bits = "39")]
    pub dpad_up: bool,

    // Triggers
    // BYTES 5-6
    #[packed_field(bytes = "5..=6", endian = "lsb")]
    pub trigger_l: u16,
    // BYTES 7-8
    #[packed_field(bytes = "7..=8", endian = "lsb")]
    pub trigger_r: u16,

    // Axes
    // BYTES 9-10
    #[packed_field(bytes = "9..=10", endian = "lsb")]
    pub l_stick_x: i16,
    // BYTES 11-12
    #[packed_field(bytes = "11..=12", endian = "lsb")]
    pub l_stick_y: i16,
    // BYTES 13-14
    #[packed_field(bytes = "13..=14", endian = "lsb")]
    pub r_stick_x: i16,
    // BYTES 15-16
    #[packed_field(bytes = "15..=16", endian = "lsb")]
    pub r_stick_y: i16,
}

impl Default for GipInputReport {
    fn default() -> Self {
        Self {
            report_id: ReportType::Input.to_primitive(),
            flags: Default::default(),
            sequence: Default::default(),
            y: Default::default(),
            b: Default::default(),
            x: Default::default(),
            a: Default::default(),
            view: Default::default(),
            menu: Default::default(),
            share: Default::default(),
            thumb_r: Default::default(),
            thumb_l: Default::default(),
            rb: Default::default(),
            lb: Default::default(),
            dpad_right: Default::default(),
            dpad_left: Default::default(),
            dpad_down: Default::default(),
            dpad_up: Default::default(),
            trigger_l: Default::default(),
            trigger_r: Default::default(),
            l_stick_x: Default::default(),
            l_stick_y: Default::default(),
            r_stick_x: Default::default(),
            r_stick_y: Default::default(),
        }
    }
}

impl GipInputReport {
    /// Normalize the report into a [ControllerState]
    pub fn to_state(&self) -> ControllerState {
        ControllerState {
            a: self.a,
            b: self.b,
            x: self.x,
            y: self.y,
            rb: self.rb,
            lb: self.lb,
            dpad_up: self.dpad_up,
            dpad_right: self.dpad_right,
            dpad_down: self.dpad_down,
            dpad_left: self.dpad_left,
            thumb_l: self.thumb_l,
            thumb_r: self.thumb_r,
            menu: self.menu,
            view: self.view,
            guide: false,
            share: self.share,
            lt: normalize_trigger_value(self.trigger_l),
            rt: normalize_trigger_value(self.trigger_r),
            left_x: normalize_axis_value(self.l_stick_x),
            left_y: normalize_axis_value(self.l_stick_y),
            right_x: normalize_axis_value(self.r_stick_x),
            right_y: normalize_axis_value(self.r_stick_y),
        }
    }
}

/// System button report. Only carries the state of the guide button.
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "4")]
pub struct GipGuideReport {
    // BYTE 0
    #[packed_field(bytes = "0")]
    pub report_id: u8,
    // BYTE 1
    #[packed_field(bytes = "1")]
    pub flags: u8,
    // BYTE 2
    #[packed_field(bits = "23")]
    pub guide: bool,
}

impl Default for GipGuideReport {
    fn default() -> Self {
        Self {
            report_id: ReportType::GuideButton.to_primitive(),
            flags: Default::default(),
            guide: Default::default(),
        }
    }
}

impl GipGuideReport {
    /// Every field besides the guide button stays at its default
    pub fn to_state(&self) -> ControllerState {
        ControllerState {
            guide: self.guide,
            ..Default::default()
        }
    }
}

/// Decode the given buffer into a [ControllerState]. Buffers with an unknown
/// report type decode to the default state.
pub fn decode(buf: &[u8]) -> Result<ControllerState, DecodeError> {
    let len = buf.len();
    if len < REPORT_MIN_SIZE {
        return Err(DecodeError::ShortReport { len });
    }

    let state = match ReportType::from_primitive(buf[0]) {
        Some(ReportType::Input) => {
            let Some(data) = buf.get(..INPUT_REPORT_SIZE) else {
                return Err(DecodeError::ShortReport { len });
            };
            let report = GipInputReport::unpack_from_slice(data)?;
            log::trace!("Got input report: {report:?}");
            report.to_state()
        }
        Some(ReportType::GuideButton) => {
            let Some(data) = buf.get(..GUIDE_REPORT_SIZE) else {
                return Err(DecodeError::ShortReport { len });
            };
            let report = GipGuideReport::unpack_from_slice(data)?;
            log::trace!("Got guide report: {report:?}");
            report.to_state()
        }
        None => {
            log::trace!("Ignoring report type: {:#04x}", buf[0]);
            ControllerState::default()
        }
    };

    Ok(state)
}

/// Snap stick values inside the deadzone to zero. A value of exactly
/// [DEADZONE] is kept.
pub fn apply_deadzone(value: f32) -> f32 {
    if value.abs() < DEADZONE {
        0.0
    } else {
        value
    }
}

/// Returns a value between 0.0 and 1.0. Values past the trigger range are
/// clamped.
fn normalize_trigger_value(raw_value: u16) -> f32 {
    (raw_value as f32 / TRIGGER_AXIS_MAX).min(1.0)
}

/// Returns a value between -1.0 and 1.0 with the deadzone applied
fn normalize_axis_value(raw_value: i16) -> f32 {
    apply_deadzone(raw_value as f32 / JOY_AXIS_SCALE)
}
