//! Key emitter.
//!
//! Turns one catalog entry into presses on the wireless keyboard link.
//! The link models "keys currently down" rather than discrete keystrokes,
//! so each phase is press, hold, then release-all.

use embedded_hal_async::delay::DelayNs;

use crate::catalog::Shortcut;
use crate::keycode::Key;

/// Wireless keyboard collaborator.
pub trait KeyboardLink {
    /// A host is connected and listening for key reports.
    fn is_connected(&self) -> bool;

    /// Add `key` to the keys held down and report it.
    fn press(&mut self, key: Key);

    /// Release every key and report it.
    fn release_all(&mut self);

    /// Publish the battery level (0..=100) to the host.
    fn set_battery_level(&mut self, percent: u8);
}

/// Send `shortcut` over `link`, holding each phase for `hold_ms`.
///
/// Dropped silently when no host is connected. When both chord slots are
/// set, the chord is pressed and released first; the populated main slots
/// follow in order.
pub async fn send<K, D>(link: &mut K, delay: &mut D, shortcut: &Shortcut, hold_ms: u32)
where
    K: KeyboardLink,
    D: DelayNs,
{
    if !link.is_connected() {
        debug!("keyboard not connected, dropping '{}'", shortcut.title);
        return;
    }

    if let Some((first, second)) = shortcut.chord() {
        link.press(first);
        link.press(second);
        delay.delay_ms(hold_ms).await;
        link.release_all();
    }

    for key in shortcut.primary_keys() {
        link.press(key);
    }
    delay.delay_ms(hold_ms).await;
    link.release_all();

    debug!("sent '{}'", shortcut.title);
}
