//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// BLE

/// GAP device name advertised to hosts.
pub const BLE_DEVICE_NAME: &str = "One Button Keyboard";

/// Device Information manufacturer string.
pub const BLE_MANUFACTURER: &str = "one-button-keyboard";

/// GAP appearance: HID keyboard (0x03C1, little-endian).
pub const BLE_APPEARANCE_KEYBOARD: [u8; 2] = [0xC1, 0x03];

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// Preferred connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Maximum number of bonded hosts kept in RAM.
pub const MAX_BONDED_HOSTS: usize = 4;

// Control loop timing

/// Fixed delay at the end of every control loop iteration (ms).
pub const LOOP_INTERVAL_MS: u32 = 100;

/// How long a chord is held down before release-all (ms).
pub const KEY_HOLD_MS: u32 = 100;

/// Battery percentage refresh period (ms).
pub const BATTERY_REFRESH_INTERVAL_MS: u64 = 60_000;

/// Inactivity timeout before the display is switched off (ms).
pub const BACKLIGHT_IDLE_TIMEOUT_MS: u64 = 10_000;

/// Hold time that turns a power-button press into a long press (ms).
pub const POWER_LONG_PRESS_MS: u64 = 1_500;

// Battery

/// Cell voltage reported as 0 % (mV).
pub const BATTERY_EMPTY_MV: u16 = 3_200;

/// Cell voltage reported as 100 % (mV).
pub const BATTERY_FULL_MV: u16 = 4_000;

/// The battery is sensed through a 1:2 resistor divider.
pub const BATTERY_DIVIDER_RATIO: u32 = 2;

/// SAADC full-scale input: 0.6 V internal reference with 1/6 gain.
pub const ADC_REFERENCE_MV: u32 = 3_600;

/// 12-bit SAADC resolution.
pub const ADC_FULL_SCALE: u32 = 4_096;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Primary button   → P0.11  (active-low, pull-up)
//   Secondary button → P0.12  (active-low, pull-up)
//   Power button     → P0.24  (active-low, pull-up, System OFF wake source)
//   Aux input A      → P0.02  (active-high, pull-down)
//   Aux input B      → P0.03  (active-high, pull-down)
//   I²C SDA          → P0.26
//   I²C SCL          → P0.27
//   Battery sense    → P0.29 / AIN5

/// Pin number of the power button on port 0 (used for the System OFF wake-up sense).
pub const POWER_BUTTON_PIN: usize = 24;

// Mode storage

/// Flash page index where mode storage starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Number of flash pages reserved for mode storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// Flash page size for nRF52840 (4 KB).
pub const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of the mode storage region.
pub const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of the mode storage region.
pub const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Timing parameters of the control loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Delay appended to every loop iteration.
    pub loop_interval_ms: u32,
    /// Hold time for each press phase of a shortcut.
    pub key_hold_ms: u32,
    /// Battery display refresh period.
    pub battery_refresh_ms: u64,
    /// Idle time before the display goes dark.
    pub idle_timeout_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: LOOP_INTERVAL_MS,
            key_hold_ms: KEY_HOLD_MS,
            battery_refresh_ms: BATTERY_REFRESH_INTERVAL_MS,
            idle_timeout_ms: BACKLIGHT_IDLE_TIMEOUT_MS,
        }
    }
}
