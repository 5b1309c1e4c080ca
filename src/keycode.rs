//! Keyboard key codes.
//!
//! A [`Key`] is a USB HID usage ID from the Keyboard/Keypad usage page
//! (0x07). The same IDs travel over BLE HID-over-GATT. Usages
//! `0xE0..=0xE7` are the eight modifier keys; they are reported as bits of
//! the modifier byte rather than in a key slot.

/// A single keyboard usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key(u8);

impl Key {
    // Modifiers
    pub const LEFT_CTRL: Key = Key(0xE0);
    pub const LEFT_SHIFT: Key = Key(0xE1);
    pub const LEFT_ALT: Key = Key(0xE2);
    pub const LEFT_GUI: Key = Key(0xE3);
    pub const RIGHT_CTRL: Key = Key(0xE4);
    pub const RIGHT_SHIFT: Key = Key(0xE5);
    pub const RIGHT_ALT: Key = Key(0xE6);
    pub const RIGHT_GUI: Key = Key(0xE7);

    // Letters
    pub const A: Key = Key(0x04);
    pub const G: Key = Key(0x0A);
    pub const M: Key = Key(0x10);
    pub const P: Key = Key(0x13);
    pub const R: Key = Key(0x15);

    // Digits (top row)
    pub const DIGIT_3: Key = Key(0x20);
    pub const DIGIT_4: Key = Key(0x21);
    pub const DIGIT_5: Key = Key(0x22);

    /// Print Screen / SysRq.
    pub const PRINT_SCREEN: Key = Key(0x46);

    // Function keys beyond F12
    pub const F13: Key = Key(0x68);
    pub const F14: Key = Key(0x69);
    pub const F15: Key = Key(0x6A);

    /// Wrap a raw usage ID. Usage 0 means "no event" on the wire and is
    /// rejected.
    #[cfg(test)]
    pub const fn from_usage(usage: u8) -> Option<Self> {
        if usage == 0 {
            None
        } else {
            Some(Key(usage))
        }
    }

    /// Raw usage ID.
    pub const fn usage(self) -> u8 {
        self.0
    }

    /// True for the eight modifier usages.
    pub const fn is_modifier(self) -> bool {
        self.0 >= 0xE0 && self.0 <= 0xE7
    }

    /// Bit in the report's modifier byte, if this key is a modifier.
    ///
    /// Bit 0 = Left Ctrl … bit 7 = Right GUI, in usage order.
    pub const fn modifier_bit(self) -> Option<u8> {
        if self.is_modifier() {
            Some(1 << (self.0 - 0xE0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn modifier_bits_follow_usage_order() {
        assert_eq!(Key::LEFT_CTRL.modifier_bit(), Some(0x01));
        assert_eq!(Key::LEFT_SHIFT.modifier_bit(), Some(0x02));
        assert_eq!(Key::LEFT_ALT.modifier_bit(), Some(0x04));
        assert_eq!(Key::LEFT_GUI.modifier_bit(), Some(0x08));
        assert_eq!(Key::RIGHT_GUI.modifier_bit(), Some(0x80));
    }

    #[test]
    fn ordinary_keys_have_no_modifier_bit() {
        assert!(!Key::PRINT_SCREEN.is_modifier());
        assert_eq!(Key::PRINT_SCREEN.modifier_bit(), None);
        assert_eq!(Key::F13.modifier_bit(), None);
    }

    #[test]
    fn usage_zero_is_not_a_key() {
        assert_eq!(Key::from_usage(0), None);
        assert_eq!(Key::from_usage(0x46), Some(Key::PRINT_SCREEN));
    }
}
