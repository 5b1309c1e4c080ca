//! User interface hardware - SSD1306 128×64 OLED via I²C.
//!
//! What is drawn lives in the library's presenter; this module only
//! provides the panel it draws on.

pub mod display;
