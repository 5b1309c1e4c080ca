//! Host-side stand-ins for the hardware collaborators.

use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::digital::{self, ErrorKind, InputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_storage_async::nor_flash::{self, NorFlash, NorFlashErrorKind, ReadNorFlash};

use crate::emitter::KeyboardLink;
use crate::input::ButtonPress;
use crate::keycode::Key;
use crate::power::PowerManagement;
use crate::storage::ModeStore;
use crate::timer::Clock;
use crate::display::Panel;

/// Digital input whose level the test controls through a shared handle.
#[derive(Clone, Default)]
pub struct FakePin {
    high: Rc<Cell<bool>>,
    failing: Rc<Cell<bool>>,
}

impl FakePin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl digital::ErrorType for FakePin {
    type Error = ErrorKind;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.failing.get() {
            Err(ErrorKind::Other)
        } else {
            Ok(self.high.get())
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Clock that only moves when something waits on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeTime {
    now_ms: u64,
    pending_ns: u64,
}

impl FakeTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for FakeTime {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

impl DelayNs for FakeTime {
    async fn delay_ns(&mut self, ns: u32) {
        self.pending_ns += u64::from(ns);
        self.now_ms += self.pending_ns / 1_000_000;
        self.pending_ns %= 1_000_000;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
    }
}

/// Button front end driven by queued presses.
///
/// `queue_*` arms a press for the next `update`, which latches it for one
/// iteration, like a debounced "was pressed" flag.
#[derive(Debug)]
pub struct FakePower {
    pub millivolts: u16,
    queued_primary: bool,
    queued_secondary: bool,
    queued_power: ButtonPress,
    primary: bool,
    secondary: bool,
    power: ButtonPress,
    pub battery_reads: usize,
}

impl FakePower {
    pub fn new(millivolts: u16) -> Self {
        Self {
            millivolts,
            queued_primary: false,
            queued_secondary: false,
            queued_power: ButtonPress::None,
            primary: false,
            secondary: false,
            power: ButtonPress::None,
            battery_reads: 0,
        }
    }

    pub fn queue_primary(&mut self) {
        self.queued_primary = true;
    }

    pub fn queue_secondary(&mut self) {
        self.queued_secondary = true;
    }

    pub fn queue_power(&mut self, press: ButtonPress) {
        self.queued_power = press;
    }
}

impl PowerManagement for FakePower {
    fn update(&mut self) {
        self.primary = core::mem::take(&mut self.queued_primary);
        self.secondary = core::mem::take(&mut self.queued_secondary);
        self.power = core::mem::take(&mut self.queued_power);
    }

    fn primary_pressed(&self) -> bool {
        self.primary
    }

    fn secondary_pressed(&self) -> bool {
        self.secondary
    }

    fn power_button(&self) -> ButtonPress {
        self.power
    }

    async fn battery_millivolts(&mut self) -> u16 {
        self.battery_reads += 1;
        self.millivolts
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Press(Key),
    ReleaseAll,
}

/// Keyboard link that records every call.
#[derive(Debug, Default)]
pub struct RecordingKeyboard {
    pub connected: bool,
    pub events: Vec<KeyEvent>,
    pub battery_level: Option<u8>,
}

impl RecordingKeyboard {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

impl KeyboardLink for RecordingKeyboard {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn press(&mut self, key: Key) {
        self.events.push(KeyEvent::Press(key));
    }

    fn release_all(&mut self) {
        self.events.push(KeyEvent::ReleaseAll);
    }

    fn set_battery_level(&mut self, percent: u8) {
        self.battery_level = Some(percent);
    }
}

/// In-memory mode store that keeps a history of saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<u8>,
    pub saves: Vec<u8>,
}

impl MemoryStore {
    pub fn holding(value: u8) -> Self {
        Self {
            value: Some(value),
            saves: Vec::new(),
        }
    }
}

impl ModeStore for MemoryStore {
    async fn load(&mut self) -> u8 {
        self.value.unwrap_or(0)
    }

    async fn save(&mut self, index: u8) {
        self.value = Some(index);
        self.saves.push(index);
    }
}

const PANEL_WIDTH: usize = 128;
const PANEL_HEIGHT: usize = 64;

/// 128×64 framebuffer panel.
#[derive(Clone, Debug)]
pub struct FramePanel {
    pixels: Vec<[bool; PANEL_WIDTH]>,
    pub backlight: bool,
    /// Every actual backlight change, in order.
    pub backlight_changes: Vec<bool>,
    pub presents: usize,
}

impl FramePanel {
    pub fn new() -> Self {
        Self {
            pixels: vec![[false; PANEL_WIDTH]; PANEL_HEIGHT],
            backlight: true,
            backlight_changes: Vec::new(),
            presents: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.pixels[y as usize][x as usize]
    }

    /// Number of lit pixels in `x0..x1` × `y0..y1`.
    pub fn lit_in(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> usize {
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
            .count()
    }

    pub fn same_pixels(&self, other: &FramePanel) -> bool {
        self.pixels == other.pixels
    }
}

impl OriginDimensions for FramePanel {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for FramePanel {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..PANEL_WIDTH as i32).contains(&point.x) && (0..PANEL_HEIGHT as i32).contains(&point.y) {
                self.pixels[point.y as usize][point.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Panel for FramePanel {
    fn present(&mut self) {
        self.presents += 1;
    }

    fn set_backlight(&mut self, on: bool) {
        if self.backlight != on {
            self.backlight_changes.push(on);
        }
        self.backlight = on;
    }
}

/// NOR flash in RAM with nRF52840 geometry: 4 KiB pages, word writes.
///
/// Writes can only clear bits, as on real NOR flash. `fail` makes every
/// operation return an error.
pub struct RamFlash {
    data: Vec<u8>,
    pub fail: bool,
}

impl RamFlash {
    const PAGE: usize = 4096;

    pub fn new(pages: usize) -> Self {
        Self {
            data: vec![0xFF; pages * Self::PAGE],
            fail: false,
        }
    }

    pub fn size_for(pages: usize) -> u32 {
        (pages * Self::PAGE) as u32
    }

    fn check(&self, offset: u32, len: usize) -> Result<(), NorFlashErrorKind> {
        if self.fail {
            return Err(NorFlashErrorKind::Other);
        }
        if offset as usize + len > self.data.len() {
            return Err(NorFlashErrorKind::OutOfBounds);
        }
        Ok(())
    }
}

impl nor_flash::ErrorType for RamFlash {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for RamFlash {
    const READ_SIZE: usize = 1;

    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.check(offset, bytes.len())?;
        let start = offset as usize;
        bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for RamFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = Self::PAGE;

    async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        self.check(from, (to - from) as usize)?;
        if from as usize % Self::PAGE != 0 || to as usize % Self::PAGE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        self.data[from as usize..to as usize].fill(0xFF);
        Ok(())
    }

    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.check(offset, bytes.len())?;
        if offset as usize % Self::WRITE_SIZE != 0 || bytes.len() % Self::WRITE_SIZE != 0 {
            return Err(NorFlashErrorKind::NotAligned);
        }
        let start = offset as usize;
        for (cell, byte) in self.data[start..start + bytes.len()].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        Ok(())
    }
}
