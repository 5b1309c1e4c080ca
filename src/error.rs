//! Unified error type for the firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! None of these errors stop the control loop: callers log them and carry
//! on with a default.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// No host is connected, or it has not enabled keyboard notifications.
    NotConnected,

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GATT service registration failed.
    RegisterFailed,
    /// Characteristic notify failed.
    NotifyFailed,
    /// Characteristic value update failed.
    SetValueFailed,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}

impl<E> From<sequential_storage::Error<E>> for Error {
    fn from(_: sequential_storage::Error<E>) -> Self {
        Error::Storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ble_errors_wrap() {
        assert_eq!(Error::from(BleError::NotifyFailed), Error::Ble(BleError::NotifyFailed));
    }

    #[test]
    fn storage_errors_collapse_to_storage() {
        let full: sequential_storage::Error<()> = sequential_storage::Error::FullStorage;
        assert_eq!(Error::from(full), Error::Storage);
        let flash = sequential_storage::Error::Storage { value: () };
        assert_eq!(Error::from(flash), Error::Storage);
    }
}
