//! Core clock trait over embassy-time
//!
//! The arbitration loop's waits are blocking holds, so delays use
//! `block_for` rather than the async timer.

use embassy_time::{block_for, Duration, Instant};

use sortbin_core::traits::Clock;

/// Board time source; zero-sized, copy one into every driver
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }
}
