//! Button and auxiliary input sampling.
//!
//! Everything here is sampled once per control loop iteration; the loop
//! period doubles as the debounce interval.
//!
//! - [`AuxInputs`] turns the two auxiliary digital pins into rising-edge
//!   "pressed" events.
//! - [`EdgeLatch`] is the per-pin latch behind it, also used by the board
//!   for the primary and secondary buttons.
//! - [`HoldTracker`] classifies the power button into short and long
//!   presses.

use embedded_hal::digital::InputPin;

/// Which auxiliary input to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuxPin {
    A,
    B,
}

/// Press classification of a button with hold detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPress {
    #[default]
    None,
    /// Pressed and released before the long-press threshold.
    Short,
    /// Held past the long-press threshold (reported once per hold).
    Long,
}

/// Last-known level of one input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    level: bool,
}

impl EdgeLatch {
    /// Latch starting at the idle (inactive) level.
    pub const fn new() -> Self {
        Self { level: false }
    }

    /// Record the active level and report whether this sample is a rising
    /// edge (inactive → active).
    pub fn sample(&mut self, active: bool) -> bool {
        let rising = active && !self.level;
        self.level = active;
        rising
    }
}

/// The two auxiliary inputs with their edge latches.
///
/// Both pins are active-high.
pub struct AuxInputs<A, B> {
    a: A,
    b: B,
    latch_a: EdgeLatch,
    latch_b: EdgeLatch,
}

impl<A: InputPin, B: InputPin> AuxInputs<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self {
            a,
            b,
            latch_a: EdgeLatch::new(),
            latch_b: EdgeLatch::new(),
        }
    }

    /// True only on the poll where `pin` goes from low to high.
    ///
    /// A failed read is treated as "no press" and leaves the latch as it
    /// was.
    pub fn poll_aux(&mut self, pin: AuxPin) -> bool {
        match pin {
            AuxPin::A => poll_pin(&mut self.a, &mut self.latch_a),
            AuxPin::B => poll_pin(&mut self.b, &mut self.latch_b),
        }
    }
}

fn poll_pin<P: InputPin>(pin: &mut P, latch: &mut EdgeLatch) -> bool {
    match pin.is_high() {
        Ok(level) => latch.sample(level),
        Err(_) => false,
    }
}

/// Short/long press detector for a single button.
#[derive(Clone, Copy, Debug)]
pub struct HoldTracker {
    long_press_ms: u64,
    pressed_at: Option<u64>,
    long_reported: bool,
}

impl HoldTracker {
    pub const fn new(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            pressed_at: None,
            long_reported: false,
        }
    }

    /// Treat a press already in progress (the one that woke the device)
    /// as consumed: its release reports nothing and it never turns long.
    pub fn swallow_press(&mut self, now_ms: u64) {
        self.pressed_at = Some(now_ms);
        self.long_reported = true;
    }

    /// Feed one sample of the button (`pressed` = held down) taken at
    /// `now_ms`.
    ///
    /// A short press is reported on release; a long press is reported as
    /// soon as the hold crosses the threshold, and its release is silent.
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> ButtonPress {
        match (self.pressed_at, pressed) {
            (None, true) => {
                self.pressed_at = Some(now_ms);
                self.long_reported = false;
                ButtonPress::None
            }
            (Some(since), true) => {
                if !self.long_reported && now_ms.saturating_sub(since) >= self.long_press_ms {
                    self.long_reported = true;
                    ButtonPress::Long
                } else {
                    ButtonPress::None
                }
            }
            (Some(_), false) => {
                self.pressed_at = None;
                if self.long_reported {
                    ButtonPress::None
                } else {
                    ButtonPress::Short
                }
            }
            (None, false) => ButtonPress::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePin;

    #[test]
    fn held_level_yields_one_press() {
        let mut latch = EdgeLatch::new();
        assert!(latch.sample(true));
        assert!(!latch.sample(true));
        assert!(!latch.sample(true));
        assert!(!latch.sample(false));
        assert!(latch.sample(true));
    }

    #[test]
    fn aux_pin_held_high_fires_once() {
        let a = FakePin::new();
        let b = FakePin::new();
        let mut aux = AuxInputs::new(a.clone(), b.clone());

        assert!(!aux.poll_aux(AuxPin::A));
        a.set_high(true);
        assert!(aux.poll_aux(AuxPin::A));
        for _ in 0..5 {
            assert!(!aux.poll_aux(AuxPin::A));
        }
        // B has its own latch.
        assert!(!aux.poll_aux(AuxPin::B));
        b.set_high(true);
        assert!(aux.poll_aux(AuxPin::B));
    }

    #[test]
    fn release_rearms_the_edge() {
        let a = FakePin::new();
        let mut aux = AuxInputs::new(a.clone(), FakePin::new());

        a.set_high(true);
        assert!(aux.poll_aux(AuxPin::A));
        a.set_high(false);
        assert!(!aux.poll_aux(AuxPin::A));
        a.set_high(true);
        assert!(aux.poll_aux(AuxPin::A));
    }

    #[test]
    fn read_error_is_not_a_press_and_keeps_latch() {
        let a = FakePin::new();
        let mut aux = AuxInputs::new(a.clone(), FakePin::new());

        a.set_high(true);
        assert!(aux.poll_aux(AuxPin::A));
        a.set_failing(true);
        assert!(!aux.poll_aux(AuxPin::A));
        a.set_failing(false);
        // Still high and the latch still remembers it: no second event.
        assert!(!aux.poll_aux(AuxPin::A));
    }

    #[test]
    fn quick_tap_is_short_press_on_release() {
        let mut tracker = HoldTracker::new(1_500);
        assert_eq!(tracker.sample(true, 0), ButtonPress::None);
        assert_eq!(tracker.sample(true, 100), ButtonPress::None);
        assert_eq!(tracker.sample(false, 200), ButtonPress::Short);
        assert_eq!(tracker.sample(false, 300), ButtonPress::None);
    }

    #[test]
    fn long_hold_reports_long_once_and_silent_release() {
        let mut tracker = HoldTracker::new(1_500);
        tracker.sample(true, 0);
        assert_eq!(tracker.sample(true, 1_400), ButtonPress::None);
        assert_eq!(tracker.sample(true, 1_500), ButtonPress::Long);
        assert_eq!(tracker.sample(true, 3_000), ButtonPress::None);
        assert_eq!(tracker.sample(false, 3_100), ButtonPress::None);
        // A fresh tap afterwards is short again.
        tracker.sample(true, 4_000);
        assert_eq!(tracker.sample(false, 4_100), ButtonPress::Short);
    }

    #[test]
    fn swallowed_press_stays_silent() {
        let mut tracker = HoldTracker::new(1_500);
        tracker.swallow_press(0);
        assert_eq!(tracker.sample(true, 100), ButtonPress::None);
        assert_eq!(tracker.sample(true, 5_000), ButtonPress::None);
        assert_eq!(tracker.sample(false, 5_100), ButtonPress::None);
        tracker.sample(true, 6_000);
        assert_eq!(tracker.sample(false, 6_100), ButtonPress::Short);
    }
}
