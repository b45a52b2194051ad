//! Board wiring and glue
//!
//! Pin map (Raspberry Pi Pico):
//!
//! | GPIO  | Function                     |
//! |-------|------------------------------|
//! | 2/3   | fill sensor, plastic (trig/echo) |
//! | 4/5   | fill sensor, paper (trig/echo)   |
//! | 6/7   | hand sensor, plastic (trig/echo) |
//! | 10/11 | hand sensor, paper (trig/echo)   |
//! | 8/9   | UART1 to the SMS modem (tx/rx)   |
//! | 15    | reset button, active low to GND  |
//! | 16    | lid servo signal (PWM slice 0 A) |
//! | 20/21 | I2C0 to the LCD backpack (sda/scl) |

use core::convert::Infallible;

use embassy_rp::gpio::Input;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART1};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, UartTx};
use embedded_hal::pwm::SetDutyCycle;

use sortbin_core::sorter::Sorter;
use sortbin_core::traits::ResetInput;
use sortbin_drivers::hcsr04::SensorBank;
use sortbin_drivers::lcd1602::Lcd1602;
use sortbin_drivers::servo::LidServo;
use sortbin_drivers::sim800::Sim800;

use crate::clock::SystemClock;

/// Destination for the full-bin alert messages
pub const ALERT_NUMBER: &str = "+15550100000";

/// SMS modem baud rate
pub const GSM_BAUD: u32 = 9600;

/// PWM clock divider: 125 MHz system clock down to a 1 MHz tick
pub const SERVO_PWM_DIVIDER: u16 = 125;

/// PWM wrap for a 20 ms servo frame at the 1 MHz tick (one count per µs)
pub const SERVO_PWM_TOP: u16 = 19_999;

/// Servo PWM channel
///
/// Wraps the slice so duty updates go through a stored config; with the
/// divider/top above, one duty step is one microsecond of pulse.
pub struct ServoPwm {
    pwm: Pwm<'static>,
    cfg: pwm::Config,
}

impl ServoPwm {
    pub fn new(pwm: Pwm<'static>, cfg: pwm::Config) -> Self {
        Self { pwm, cfg }
    }
}

impl embedded_hal::pwm::ErrorType for ServoPwm {
    type Error = Infallible;
}

impl SetDutyCycle for ServoPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.cfg.top
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.cfg.compare_a = duty;
        self.pwm.set_config(&self.cfg);
        Ok(())
    }
}

/// Reset button, active low with the internal pull-up
pub struct ResetButton {
    pin: Input<'static>,
}

impl ResetButton {
    pub fn new(pin: Input<'static>) -> Self {
        Self { pin }
    }
}

impl ResetInput for ResetButton {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low()
    }
}

// Concrete peripheral types for this board
pub type BoardSampler = SensorBank<embassy_rp::gpio::Output<'static>, Input<'static>, SystemClock>;
pub type BoardLid = LidServo<ServoPwm>;
pub type BoardPanel = Lcd1602<I2c<'static, I2C0, i2c::Blocking>, SystemClock>;
pub type BoardTransport = Sim800<UartTx<'static, UART1, uart::Blocking>, SystemClock>;

/// The sorter as wired on this board
pub type BoardSorter =
    Sorter<BoardSampler, BoardLid, BoardPanel, BoardTransport, ResetButton, SystemClock>;
