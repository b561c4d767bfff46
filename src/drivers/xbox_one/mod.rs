pub mod driver;
pub mod event;
pub mod hid_report;
pub mod state;

// Hardware ID's
pub const VID: u16 = 0x045e;
pub const PID_XBOX_ONE: u16 = 0x02d1;
pub const PID_XBOX_ONE_S: u16 = 0x02dd;
pub const PID_XBOX_ONE_X: u16 = 0x02ea;
pub const PID_XBOX_ONE_ELITE: u16 = 0x02e3;

/// Product ID's in the order they are tried during device selection
pub const PIDS: [u16; 4] = [
    PID_XBOX_ONE,
    PID_XBOX_ONE_S,
    PID_XBOX_ONE_X,
    PID_XBOX_ONE_ELITE,
];

/// Returns a human readable name for the given product id
pub fn product_name(pid: u16) -> &'static str {
    match pid {
        PID_XBOX_ONE => "Xbox One Controller",
        PID_XBOX_ONE_S => "Xbox One S Controller",
        PID_XBOX_ONE_X => "Xbox One X Controller",
        PID_XBOX_ONE_ELITE => "Xbox Elite Controller",
        _ => "Unknown Xbox Controller",
    }
}
