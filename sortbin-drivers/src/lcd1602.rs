//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack wires the expander's low nibble to RS/RW/EN/backlight
//! and the high nibble to the controller's data lines, so every
//! controller byte goes out as two strobed nibbles. Timing follows the
//! HD44780 datasheet's 4-bit bring-up sequence.

use embedded_hal::i2c::I2c;

use sortbin_core::traits::{Clock, Panel, PanelError, PANEL_COLS, PANEL_ROWS};

/// Factory-default PCF8574 backpack address
pub const DEFAULT_ADDR: u8 = 0x27;

// PCF8574 bit map (common backpack wiring)
const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 commands
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment cursor, no display shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

// DDRAM start address per row
const ROW_ADDR: [u8; 2] = [0x00, 0x40];

/// Pad or truncate text to one panel row
///
/// Non-printable bytes become '?'; the controller's ROM would otherwise
/// render them as arbitrary glyphs.
pub fn pad_line(text: &str) -> [u8; PANEL_COLS] {
    let mut row = [b' '; PANEL_COLS];
    for (slot, byte) in row.iter_mut().zip(text.bytes()) {
        *slot = if byte.is_ascii_graphic() || byte == b' ' {
            byte
        } else {
            b'?'
        };
    }
    row
}

/// 16x2 panel driver
pub struct Lcd1602<I2C, C> {
    i2c: I2C,
    clock: C,
    addr: u8,
    backlight: bool,
}

impl<I2C, C> Lcd1602<I2C, C>
where
    I2C: I2c,
    C: Clock,
{
    /// Create the driver; call [`Lcd1602::init`] before writing
    pub fn new(i2c: I2C, addr: u8, clock: C) -> Self {
        Self {
            i2c,
            clock,
            addr,
            backlight: true,
        }
    }

    /// Run the 4-bit bring-up sequence
    pub fn init(&mut self) -> Result<(), PanelError> {
        // Controller needs time after power-on before it accepts commands
        self.clock.delay_ms(50);

        // Three 8-bit function-set knocks, then switch to 4-bit
        self.write_nibble(0x03, false)?;
        self.clock.delay_ms(5);
        self.write_nibble(0x03, false)?;
        self.clock.delay_us(150);
        self.write_nibble(0x03, false)?;
        self.clock.delay_us(150);
        self.write_nibble(0x02, false)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.clock.delay_ms(2);
        self.command(CMD_ENTRY_MODE)?;
        Ok(())
    }

    fn bus_write(&mut self, byte: u8) -> Result<(), PanelError> {
        let byte = if self.backlight {
            byte | BACKLIGHT
        } else {
            byte
        };
        self.i2c
            .write(self.addr, &[byte])
            .map_err(|_| PanelError::Bus)
    }

    fn write_nibble(&mut self, nibble: u8, is_data: bool) -> Result<(), PanelError> {
        let flags = if is_data { RS } else { 0 };
        let byte = (nibble << 4) | flags;

        // Strobe EN around the nibble
        self.bus_write(byte | EN)?;
        self.clock.delay_us(1);
        self.bus_write(byte)?;
        self.clock.delay_us(50);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) -> Result<(), PanelError> {
        self.write_nibble(byte >> 4, is_data)?;
        self.write_nibble(byte & 0x0F, is_data)
    }

    fn command(&mut self, cmd: u8) -> Result<(), PanelError> {
        self.write_byte(cmd, false)
    }
}

impl<I2C, C> Panel for Lcd1602<I2C, C>
where
    I2C: I2c,
    C: Clock,
{
    fn clear(&mut self) -> Result<(), PanelError> {
        self.command(CMD_CLEAR)?;
        // Clear is the one slow command on this controller
        self.clock.delay_ms(2);
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), PanelError> {
        self.backlight = on;
        // Dummy write so the backlight bit takes effect immediately
        self.bus_write(0)
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), PanelError> {
        if row >= PANEL_ROWS {
            return Err(PanelError::InvalidRow);
        }

        self.command(CMD_SET_DDRAM | ROW_ADDR[row as usize])?;
        for byte in pad_line(text) {
            self.write_byte(byte, true)?;
        }
        Ok(())
    }
}
