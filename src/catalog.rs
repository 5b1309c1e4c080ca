//! The shortcut catalog.
//!
//! A fixed, ordered table compiled into the firmware. The order defines
//! the on-screen numbering and the value persisted in flash, so entries
//! must only ever be appended.

use crate::keycode::Key;
use crate::mode::Mode;

/// One catalog entry: a label and the keys it sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shortcut {
    /// Name shown on the highlighted band.
    pub title: &'static str,
    /// Human-readable key combination shown under the title.
    pub keymap: &'static str,
    /// Keys pressed together in the main phase. `None` slots are skipped.
    pub keys: [Option<Key>; 4],
    /// Optional pre-chord sent (and released) before the main phase.
    pub chord: [Option<Key>; 2],
}

impl Shortcut {
    pub const fn new(title: &'static str, keymap: &'static str, keys: [Option<Key>; 4]) -> Self {
        Self {
            title,
            keymap,
            keys,
            chord: [None, None],
        }
    }

    pub const fn with_chord(self, first: Key, second: Key) -> Self {
        Self {
            chord: [Some(first), Some(second)],
            ..self
        }
    }

    /// The pre-chord, present only when both chord slots are populated.
    pub fn chord(&self) -> Option<(Key, Key)> {
        match self.chord {
            [Some(first), Some(second)] => Some((first, second)),
            _ => None,
        }
    }

    /// Populated main-phase keys, in slot order.
    pub fn primary_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.iter().flatten().copied()
    }
}

const fn k(key: Key) -> Option<Key> {
    Some(key)
}

/// The built-in table.
pub static BUILTIN: [Shortcut; 15] = [
    Shortcut::new("Teams Mute", "Ctrl+Shift+M", [k(Key::LEFT_CTRL), k(Key::LEFT_SHIFT), k(Key::M), None]),
    Shortcut::new("Zoom Mute", "Alt+A", [k(Key::LEFT_ALT), k(Key::A), None, None]),
    Shortcut::new("Win Capture Screen", "Win+PrtSc", [k(Key::LEFT_GUI), k(Key::PRINT_SCREEN), None, None]),
    // Opens the Game Bar (Win+G) before starting the recording.
    Shortcut::new("Win Capture Movie", "Win+Alt+R", [k(Key::LEFT_GUI), k(Key::LEFT_ALT), k(Key::R), None])
        .with_chord(Key::LEFT_GUI, Key::G),
    Shortcut::new("Win Clipboard Screen", "PrtSc", [k(Key::PRINT_SCREEN), None, None, None]),
    Shortcut::new("Win Clipboard Window", "Alt+PrtSc", [k(Key::LEFT_ALT), k(Key::PRINT_SCREEN), None, None]),
    Shortcut::new("Mac Capture Screen", "Cmd+Shift+3", [k(Key::LEFT_GUI), k(Key::LEFT_SHIFT), None, k(Key::DIGIT_3)]),
    Shortcut::new("Mac Capture Area", "Cmd+Shift+4", [k(Key::LEFT_GUI), k(Key::LEFT_SHIFT), None, k(Key::DIGIT_4)]),
    Shortcut::new("Mac Capture Movie", "Cmd+Shift+5", [k(Key::LEFT_GUI), k(Key::LEFT_SHIFT), None, k(Key::DIGIT_5)]),
    Shortcut::new("Mac Clipboard Screen", "Cmd+Shift+Ctl+3", [k(Key::LEFT_GUI), k(Key::LEFT_SHIFT), k(Key::LEFT_CTRL), k(Key::DIGIT_3)]),
    Shortcut::new("Mac Clipboard Area", "Cmd+Shift+Ctl+4", [k(Key::LEFT_GUI), k(Key::LEFT_SHIFT), k(Key::LEFT_CTRL), k(Key::DIGIT_4)]),
    Shortcut::new("Chrome Capture Page", "Shift+Alt+P", [k(Key::LEFT_SHIFT), k(Key::LEFT_ALT), None, k(Key::P)]),
    Shortcut::new("Free Key:F13", "F13", [k(Key::F13), None, None, None]),
    Shortcut::new("Free Key:F14", "F14", [k(Key::F14), None, None, None]),
    Shortcut::new("Free Key:F15", "F15", [k(Key::F15), None, None, None]),
];

/// Read-only view over a shortcut table.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    entries: &'static [Shortcut],
}

impl Catalog {
    /// Wrap a table. Returns `None` if it is empty, or too long for the
    /// selected index to fit the single persisted byte.
    pub const fn new(entries: &'static [Shortcut]) -> Option<Self> {
        if entries.is_empty() || entries.len() > 256 {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// The compiled-in 15-entry table.
    pub const fn builtin() -> Self {
        Self { entries: &BUILTIN }
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Entry for `mode`.
    ///
    /// `mode` must come from this catalog's size; the controller
    /// guarantees that by only moving it with `next`/`prev`.
    pub fn get(&self, mode: Mode) -> &'static Shortcut {
        &self.entries[mode.index()]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
