//! SSD1306 OLED display wrapper.

use defmt::warn;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use one_button_keyboard::display::Panel;
use one_button_keyboard::error::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The OLED as the controller's [`Panel`].
///
/// "Backlight" is the panel's display-on state; the frame buffer is kept
/// while it is off.
pub struct OledPanel<I2C> {
    display: Display<I2C>,
    on: bool,
}

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<OledPanel<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display
        .set_brightness(Brightness::DIMMER)
        .map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(OledPanel { display, on: true })
}

impl<I2C> OriginDimensions for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl<I2C> DrawTarget for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Color = BinaryColor;
    type Error = <Display<I2C> as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl<I2C> Panel for OledPanel<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn present(&mut self) {
        if self.display.flush().is_err() {
            warn!("Display: {}", Error::Display);
        }
    }

    fn set_backlight(&mut self, on: bool) {
        if self.on == on {
            return;
        }
        match self.display.set_display_on(on) {
            Ok(()) => self.on = on,
            Err(_) => warn!("Display: {}", Error::Display),
        }
    }
}
