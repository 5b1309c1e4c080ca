//! Display presenter.
//!
//! Screen layout on the 128×64 panel, `FONT_6X10`, 21 columns:
//!
//! ```text
//! y=0   " 4/15"              " 87%"
//! y=13  ██████████████████████████████   highlight band
//! y=22  █ Win Capture Movie          █   title, inverted
//! y=41  ██████████████████████████████
//! y=48                       Win+Alt+R   keymap, right-aligned
//! ```
//!
//! Every field is drawn with an opaque background and padded to its full
//! width, so a redraw always overwrites what the previous one left.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use crate::catalog::Catalog;
use crate::mode::Mode;

/// Panel width in pixels.
pub const DISPLAY_WIDTH: u32 = 128;

/// Text columns per row with `FONT_6X10`.
pub const COLUMNS: usize = 21;

const CHAR_WIDTH: i32 = 6;
const BAND_TOP: i32 = 13;
const BAND_HEIGHT: u32 = 28;
const TITLE_Y: i32 = 22;
const KEYMAP_Y: i32 = 48;
const BATTERY_X: i32 = DISPLAY_WIDTH as i32 - 4 * CHAR_WIDTH;

/// Screen collaborator: a monochrome draw target that can be pushed to
/// the glass and switched dark.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Send the drawn frame to the hardware.
    fn present(&mut self);

    /// Switch the panel (or its backlight) on or off. Content is kept.
    fn set_backlight(&mut self, on: bool);
}

fn normal_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .background_color(BinaryColor::Off)
        .build()
}

fn band_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::Off)
        .background_color(BinaryColor::On)
        .build()
}

/// `"%2d/%d"` position indicator, one-based.
pub fn index_label(mode: Mode, size: usize) -> String<12> {
    let mut label = String::new();
    let _ = write!(label, "{:>2}/{}", mode.position(), size);
    label
}

/// Title left-aligned and padded (or cut) to the full row.
pub fn title_line(title: &str) -> String<64> {
    let mut line = String::new();
    let _ = write!(line, "{:<width$.width$}", title, width = COLUMNS);
    line
}

/// Keymap label right-aligned on the full row.
pub fn keymap_line(keymap: &str) -> String<64> {
    let mut line = String::new();
    let _ = write!(line, "{:>width$.width$}", keymap, width = COLUMNS);
    line
}

/// `"%3d%%"` battery indicator.
pub fn battery_label(percent: u8) -> String<8> {
    let mut label = String::new();
    let _ = write!(label, "{:>3}%", percent);
    label
}

/// Draw the position indicator, the highlighted title and the keymap for
/// `mode`.
pub fn render_index_and_title<D>(
    target: &mut D,
    mode: Mode,
    catalog: &Catalog,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let shortcut = catalog.get(mode);

    Text::with_baseline(
        index_label(mode, catalog.size()).as_str(),
        Point::new(0, 0),
        normal_style(),
        Baseline::Top,
    )
    .draw(target)?;

    Rectangle::new(
        Point::new(0, BAND_TOP),
        Size::new(DISPLAY_WIDTH, BAND_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(target)?;

    Text::with_baseline(
        title_line(shortcut.title).as_str(),
        Point::new(0, TITLE_Y),
        band_style(),
        Baseline::Top,
    )
    .draw(target)?;

    Text::with_baseline(
        keymap_line(shortcut.keymap).as_str(),
        Point::new(0, KEYMAP_Y),
        normal_style(),
        Baseline::Top,
    )
    .draw(target)?;

    Ok(())
}

/// Draw the battery percentage in the top-right corner.
pub fn render_battery<D>(target: &mut D, percent: u8) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(
        battery_label(percent).as_str(),
        Point::new(BATTERY_X, 0),
        normal_style(),
        Baseline::Top,
    )
    .draw(target)?;
    Ok(())
}
