//! The selected catalog position.

/// Index of the currently selected shortcut.
///
/// Always a valid index into the catalog it was built for: the only ways
/// to move it are [`Mode::next`] and [`Mode::prev`], which wrap instead of
/// overflowing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode(u8);

impl Mode {
    /// The first catalog entry.
    pub const FIRST: Mode = Mode(0);

    /// Restore a mode from its persisted byte.
    ///
    /// A byte outside `0..size` (stale flash from a larger catalog, or
    /// corruption) falls back to the first entry.
    pub fn from_persisted(byte: u8, size: usize) -> Self {
        if usize::from(byte) < size {
            Mode(byte)
        } else {
            Mode::FIRST
        }
    }

    /// Zero-based catalog index.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// One-based position, as shown on screen.
    pub fn position(self) -> usize {
        self.index() + 1
    }

    /// Byte written to storage.
    pub fn as_byte(self) -> u8 {
        self.0
    }

    /// Advance by one, wrapping to 0 past the last index.
    pub fn next(self, size: usize) -> Self {
        if self.index() + 1 < size {
            Mode(self.0 + 1)
        } else {
            Mode::FIRST
        }
    }

    /// Step back by one, wrapping to the last index below 0.
    pub fn prev(self, size: usize) -> Self {
        match self.0.checked_sub(1) {
            Some(index) => Mode(index),
            None => Mode(size.saturating_sub(1) as u8),
        }
    }
}
