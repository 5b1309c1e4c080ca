//! HID protocol mode.
//!
//! A HID-over-GATT host starts in report protocol and may switch the
//! keyboard to boot protocol through the Protocol Mode characteristic.
//! Key reports then go out on the Boot Keyboard Input Report instead of
//! the report-map input report. The 8-byte layout is the same in both.

/// Which input characteristic carries key reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolMode {
    Boot,
    #[default]
    Report,
}

impl ProtocolMode {
    /// Decode a Protocol Mode write. Reserved values are rejected.
    pub fn from_write(data: &[u8]) -> Option<Self> {
        match data {
            [0x00] => Some(Self::Boot),
            [0x01] => Some(Self::Report),
            _ => None,
        }
    }

    /// Characteristic value for this mode.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Boot => 0x00,
            Self::Report => 0x01,
        }
    }

    /// Whether the host listens on the input report this mode uses.
    pub fn subscribed(self, report_notify: bool, boot_notify: bool) -> bool {
        match self {
            Self::Boot => boot_notify,
            Self::Report => report_notify,
        }
    }
}
