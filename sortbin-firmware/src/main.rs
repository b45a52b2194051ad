//! Sortbin - Two-Bin Trash Sorter Firmware
//!
//! Main firmware binary for RP2040-based control boards. Wires the
//! ultrasonic bank, lid servo, LCD panel, SMS modem and reset button to
//! the board-agnostic arbitration loop and runs it as a single task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::uart::{self, Uart};
use fixed::traits::ToFixed;
use {defmt_rtt as _, panic_probe as _};

use sortbin_core::config::SorterConfig;
use sortbin_core::sorter::Sorter;
use sortbin_core::traits::Clock;
use sortbin_drivers::hcsr04::{Hcsr04, SensorBank};
use sortbin_drivers::lcd1602::{Lcd1602, DEFAULT_ADDR};
use sortbin_drivers::servo::{LidAngles, LidServo, ServoConfig};
use sortbin_drivers::sim800::Sim800;

use crate::board::{
    ResetButton, ServoPwm, ALERT_NUMBER, GSM_BAUD, SERVO_PWM_DIVIDER, SERVO_PWM_TOP,
};
use crate::clock::SystemClock;

mod board;
mod clock;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sortbin firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let clock = SystemClock;

    // Ultrasonic bank: one trigger/echo pair per logical channel
    let fill_plastic = Hcsr04::new(
        Output::new(p.PIN_2, Level::Low),
        Input::new(p.PIN_3, Pull::None),
        clock,
    );
    let fill_paper = Hcsr04::new(
        Output::new(p.PIN_4, Level::Low),
        Input::new(p.PIN_5, Pull::None),
        clock,
    );
    let hand_plastic = Hcsr04::new(
        Output::new(p.PIN_6, Level::Low),
        Input::new(p.PIN_7, Pull::None),
        clock,
    );
    let hand_paper = Hcsr04::new(
        Output::new(p.PIN_10, Level::Low),
        Input::new(p.PIN_11, Pull::None),
        clock,
    );
    let sampler = SensorBank::new(fill_plastic, fill_paper, hand_plastic, hand_paper, clock);
    info!("Ultrasonic bank initialized");

    // Lid servo: 50 Hz frame, one duty step per microsecond of pulse
    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = SERVO_PWM_DIVIDER.to_fixed();
    pwm_config.top = SERVO_PWM_TOP;
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config.clone());
    let lid = LidServo::new(
        ServoPwm::new(pwm, pwm_config),
        ServoConfig::default(),
        LidAngles::default(),
    );
    info!("Lid servo initialized");

    // Panel: 16x2 LCD behind the I2C backpack
    let lcd_i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());
    let mut panel = Lcd1602::new(lcd_i2c, DEFAULT_ADDR, clock);
    if panel.init().is_err() {
        warn!("Panel init failed, continuing without local feedback");
    } else {
        info!("Panel initialized");
    }

    // Alert transport: SMS modem on UART1, write-only
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = GSM_BAUD;
    let gsm = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let (gsm_tx, _gsm_rx) = gsm.split();
    let transport = Sim800::new(gsm_tx, ALERT_NUMBER, clock);
    info!("Alert transport initialized (destination {})", ALERT_NUMBER);

    let reset_button = ResetButton::new(Input::new(p.PIN_15, Pull::Up));

    // Seed the feedback picker from boot time; variety is all it buys
    let seed = clock.now_us() | 1;

    let sorter = Sorter::new(
        SorterConfig::default(),
        sampler,
        lid,
        panel,
        transport,
        reset_button,
        clock,
        seed,
    );

    spawner.spawn(tasks::arbiter_task(sorter)).unwrap();
    info!("Arbiter running");

    // Main task has nothing else to do - all work happens in the arbiter
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
