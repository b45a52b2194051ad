//! Monotonic time and blocking delays
//!
//! The loop's poll period is an elapsed-time comparison and all of its
//! waits (lid dwell, withdrawal wait, reset settle, message hold) are
//! blocking holds, so both directions go through this one trait. Drivers
//! use the microsecond half for trigger pulses and bus settle times.

/// Trait for the time source the loop and drivers run against
pub trait Clock {
    /// Milliseconds since an arbitrary boot-time epoch
    fn now_ms(&self) -> u64;

    /// Microseconds since the same epoch
    fn now_us(&self) -> u64;

    /// Block for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Block for the given number of microseconds
    fn delay_us(&mut self, us: u32);
}
