//! Integration tests for one-button-keyboard host-testable logic.

use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;

use one_button_keyboard::battery::percent_from_millivolts;
use one_button_keyboard::catalog::BUILTIN;
use one_button_keyboard::display::{battery_label, index_label};
use one_button_keyboard::emitter::{self, KeyboardLink};
use one_button_keyboard::hid::KeyboardReport;
use one_button_keyboard::{Catalog, Key, Mode};

/// Keyboard link that keeps the report state like the BLE link does and
/// records every report it would notify.
struct WireKeyboard {
    report: KeyboardReport,
    sent: Vec<[u8; 8]>,
}

impl WireKeyboard {
    fn new() -> Self {
        Self {
            report: KeyboardReport::empty(),
            sent: Vec::new(),
        }
    }
}

impl KeyboardLink for WireKeyboard {
    fn is_connected(&self) -> bool {
        true
    }

    fn press(&mut self, key: Key) {
        if self.report.press(key) {
            self.sent.push(self.report.to_bytes());
        }
    }

    fn release_all(&mut self) {
        self.report.release_all();
        self.sent.push(self.report.to_bytes());
    }

    fn set_battery_level(&mut self, _percent: u8) {}
}

struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

fn wire_reports(index: usize) -> Vec<[u8; 8]> {
    let mut keyboard = WireKeyboard::new();
    block_on(emitter::send(&mut keyboard, &mut NoDelay, &BUILTIN[index], 100));
    keyboard.sent
}

#[test]
fn teams_mute_reports_on_the_wire() {
    assert_eq!(
        wire_reports(0),
        [
            [0x01, 0, 0, 0, 0, 0, 0, 0],
            [0x03, 0, 0, 0, 0, 0, 0, 0],
            [0x03, 0, 0x10, 0, 0, 0, 0, 0],
            [0; 8],
        ]
    );
}

#[test]
fn win_capture_movie_sends_game_bar_chord_first() {
    assert_eq!(
        wire_reports(3),
        [
            // Win+G
            [0x08, 0, 0, 0, 0, 0, 0, 0],
            [0x08, 0, 0x0A, 0, 0, 0, 0, 0],
            [0; 8],
            // Win+Alt+R
            [0x08, 0, 0, 0, 0, 0, 0, 0],
            [0x0C, 0, 0, 0, 0, 0, 0, 0],
            [0x0C, 0, 0x15, 0, 0, 0, 0, 0],
            [0; 8],
        ]
    );
}

#[test]
fn every_builtin_shortcut_ends_released() {
    for index in 0..BUILTIN.len() {
        let sent = wire_reports(index);
        assert_eq!(sent.last(), Some(&[0u8; 8]), "entry {index}");
        // Something was pressed before the release.
        assert!(sent.len() >= 2, "entry {index}");
    }
}

#[test]
fn mode_walk_covers_catalog_and_returns() {
    let catalog = Catalog::builtin();
    let size = catalog.size();

    let mut mode = Mode::FIRST;
    let mut titles = Vec::new();
    for _ in 0..size {
        titles.push(catalog.get(mode).title);
        mode = mode.next(size);
    }
    assert_eq!(mode, Mode::FIRST);
    assert_eq!(titles.first(), Some(&"Teams Mute"));
    assert_eq!(titles.last(), Some(&"Free Key:F15"));

    assert_eq!(Mode::FIRST.prev(size).index(), size - 1);
}

#[test]
fn screen_labels_for_last_entry_and_half_battery() {
    let catalog = Catalog::builtin();
    let last = Mode::from_persisted(14, catalog.size());

    assert_eq!(index_label(last, catalog.size()).as_str(), "15/15");
    assert_eq!(battery_label(percent_from_millivolts(3_600)).as_str(), " 50%");
}
