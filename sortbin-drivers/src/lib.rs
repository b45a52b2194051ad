//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the capability traits
//! defined in sortbin-core:
//!
//! - HC-SR04 ultrasonic ranging (distance sampler)
//! - Hobby servo over PWM (lid actuator)
//! - HD44780 16x2 LCD behind a PCF8574 I2C backpack (panel)
//! - SIM800-style SMS modem over a UART (alert transport)
//!
//! Drivers are generic over `embedded-hal` 1.0 pin/bus traits plus the
//! core clock, so they run against any board HAL and against mocks.

#![no_std]
#![deny(unsafe_code)]

pub mod hcsr04;
pub mod lcd1602;
pub mod servo;
pub mod sim800;
