//! Millisecond clock and deadlines.
//!
//! Every timer in the control loop is a "deadline = now + interval" value
//! compared against a monotonic millisecond clock.

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;
}

/// A point in time on the [`Clock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline(u64);

impl Deadline {
    /// Deadline `interval_ms` after `now_ms`.
    pub fn after(now_ms: u64, interval_ms: u64) -> Self {
        Deadline(now_ms.saturating_add(interval_ms))
    }

    /// True once the clock has moved strictly past the deadline.
    pub fn has_passed(self, now_ms: u64) -> bool {
        self.0 < now_ms
    }

    #[cfg(test)]
    pub fn as_millis(self) -> u64 {
        self.0
    }
}
