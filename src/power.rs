//! Power-management collaborator.
//!
//! On the reference hardware this is the board's button/battery front end:
//! debounced primary and secondary buttons, the power button, and the
//! battery voltage. The control loop calls [`PowerManagement::update`]
//! once per iteration and then queries the latched flags for that
//! iteration.

use core::future::Future;

use crate::input::ButtonPress;

/// Display power state as tracked by the control loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    #[default]
    On,
    Off,
}

/// Buttons and battery sensing.
pub trait PowerManagement {
    /// Sample the buttons. Flags returned by the query methods stay fixed
    /// until the next call.
    fn update(&mut self);

    /// The primary (trigger) button was pressed since the previous update.
    fn primary_pressed(&self) -> bool;

    /// The secondary (next mode) button was pressed since the previous
    /// update.
    fn secondary_pressed(&self) -> bool;

    /// Power button status for this iteration.
    fn power_button(&self) -> ButtonPress;

    /// Current battery cell voltage in millivolts.
    fn battery_millivolts(&mut self) -> impl Future<Output = u16>;
}
