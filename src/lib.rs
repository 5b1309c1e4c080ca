//! One Button Keyboard: a hand-held BLE shortcut keyboard.
//!
//! The device shows one entry of a fixed shortcut catalog on its display.
//! The secondary and power buttons step through the catalog; the primary
//! button (or either auxiliary input) sends the selected key combination
//! to the connected host.
//!
//! This library holds everything that does not touch hardware directly:
//! the catalog, mode persistence, input edge detection, the screen
//! presenter, the key emitter and the main loop controller. Hardware is
//! reached through small collaborator traits, so the whole control flow
//! runs in host tests (`cargo test --lib`).
//!
//! The embedded binary (`src/main.rs`, `embedded` feature) implements
//! those traits for the nRF52840 with Embassy and the S140 SoftDevice.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible everywhere.
mod fmt;

pub mod advertising;
pub mod battery;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod display;
pub mod emitter;
pub mod error;
pub mod hid;
pub mod input;
pub mod keycode;
pub mod mode;
pub mod power;
pub mod storage;
pub mod timer;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, Shortcut};
pub use controller::{Action, Controller, Hardware};
pub use error::Error;
pub use keycode::Key;
pub use mode::Mode;
