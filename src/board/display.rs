//! SSD1306 OLED driven as a two-row character display.

use climate_hmi::config::DISPLAY_ROWS;
use climate_hmi::error::{Error, Result};
use climate_hmi::ui::display::{check_row, DisplayPort};
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// 16 columns of 8 px fill the 128 px width.
const ROW_HEIGHT: i32 = 16;

/// Top of the first text row; centres both rows vertically.
const FIRST_ROW_TOP: i32 = (64 - ROW_HEIGHT * DISPLAY_ROWS as i32) / 2;

type Driver<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub struct OledText<I2C> {
    driver: Driver<I2C>,
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_8X13)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> OledText<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the panel and blank it.
    pub fn new(i2c: I2C) -> Result<Self> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        driver.init().map_err(|_| Error::Display)?;
        driver.clear_buffer();
        driver.flush().map_err(|_| Error::Display)?;
        Ok(Self { driver })
    }
}

impl<I2C> DisplayPort for OledText<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) -> Result<()> {
        self.driver.clear_buffer();
        self.driver.flush().map_err(|_| Error::Display)
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<()> {
        check_row(row)?;
        let top = FIRST_ROW_TOP + row as i32 * ROW_HEIGHT;

        Rectangle::new(Point::new(0, top), Size::new(128, ROW_HEIGHT as u32))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.driver)
            .map_err(|_| Error::Display)?;
        Text::with_baseline(text, Point::new(0, top + 1), text_style(), Baseline::Top)
            .draw(&mut self.driver)
            .map_err(|_| Error::Display)?;

        self.driver.flush().map_err(|_| Error::Display)
    }
}
