//! HID report types served by the BLE keyboard.

pub mod keyboard;
pub mod protocol;


pub use keyboard::KeyboardReport;
pub use protocol::ProtocolMode;
