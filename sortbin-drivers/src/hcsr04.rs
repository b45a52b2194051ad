//! HC-SR04 ultrasonic ranging
//!
//! Blocking measurement: a 10 µs trigger pulse, then the echo pin goes
//! high for the sound's round-trip time. Both waits are bounded; a
//! timeout or an out-of-range echo maps to the no-echo sentinel rather
//! than an error, matching how the control loop treats missing readings.

use embedded_hal::digital::{InputPin, OutputPin};

use sortbin_core::distance::{DistanceReading, SlotReadings};
use sortbin_core::traits::{Clock, DistanceSampler};

/// Longest range the sensor can resolve
pub const MAX_RANGE_CM: f32 = 400.0;

/// Trigger pulse width
const TRIGGER_PULSE_US: u32 = 10;

/// Bound on waiting for the echo to start or end
///
/// The sensor itself gives up after ~38 ms; anything past 30 ms is
/// already beyond [`MAX_RANGE_CM`].
const ECHO_TIMEOUT_US: u64 = 30_000;

/// Round-trip microseconds per centimeter at room temperature
const US_PER_CM: f32 = 58.0;

/// Gap between consecutive sensors in a bank, so one sensor's stray
/// echo cannot arrive as another's
const SETTLE_BETWEEN_PINGS_US: u32 = 1_000;

/// Convert an echo pulse width to a reading
///
/// Zero-width and beyond-range echoes are no-echo; the sensor reports
/// both when nothing reflects.
pub fn echo_to_cm(width_us: u64) -> DistanceReading {
    let cm = width_us as f32 / US_PER_CM;
    if cm <= 0.0 || cm > MAX_RANGE_CM {
        DistanceReading::NoEcho
    } else {
        DistanceReading::Centimeters(cm)
    }
}

/// One HC-SR04 channel
pub struct Hcsr04<TRIG, ECHO, C> {
    trigger: TRIG,
    echo: ECHO,
    clock: C,
}

impl<TRIG, ECHO, C> Hcsr04<TRIG, ECHO, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    C: Clock,
{
    /// Create a channel from its trigger/echo pin pair
    pub fn new(trigger: TRIG, echo: ECHO, clock: C) -> Self {
        Self {
            trigger,
            echo,
            clock,
        }
    }

    /// Take one measurement
    ///
    /// Blocks for at most twice [`ECHO_TIMEOUT_US`] plus the trigger
    /// pulse; never indefinitely.
    pub fn measure(&mut self) -> DistanceReading {
        let _ = self.trigger.set_low();
        self.clock.delay_us(2);
        let _ = self.trigger.set_high();
        self.clock.delay_us(TRIGGER_PULSE_US);
        let _ = self.trigger.set_low();

        // Wait for the echo to start
        let sent = self.clock.now_us();
        while !matches!(self.echo.is_high(), Ok(true)) {
            if self.clock.now_us().saturating_sub(sent) > ECHO_TIMEOUT_US {
                return DistanceReading::NoEcho;
            }
        }

        // Measure how long it stays high
        let rise = self.clock.now_us();
        while matches!(self.echo.is_high(), Ok(true)) {
            if self.clock.now_us().saturating_sub(rise) > ECHO_TIMEOUT_US {
                return DistanceReading::NoEcho;
            }
        }

        echo_to_cm(self.clock.now_us().saturating_sub(rise))
    }
}

/// The four logical channels as one sampler
///
/// Sensors fire sequentially with a settle gap; one bank call is one
/// poll's worth of readings.
pub struct SensorBank<TRIG, ECHO, C> {
    fill_plastic: Hcsr04<TRIG, ECHO, C>,
    fill_paper: Hcsr04<TRIG, ECHO, C>,
    hand_plastic: Hcsr04<TRIG, ECHO, C>,
    hand_paper: Hcsr04<TRIG, ECHO, C>,
    clock: C,
}

impl<TRIG, ECHO, C> SensorBank<TRIG, ECHO, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    C: Clock,
{
    /// Group four channels into a bank
    pub fn new(
        fill_plastic: Hcsr04<TRIG, ECHO, C>,
        fill_paper: Hcsr04<TRIG, ECHO, C>,
        hand_plastic: Hcsr04<TRIG, ECHO, C>,
        hand_paper: Hcsr04<TRIG, ECHO, C>,
        clock: C,
    ) -> Self {
        Self {
            fill_plastic,
            fill_paper,
            hand_plastic,
            hand_paper,
            clock,
        }
    }
}

impl<TRIG, ECHO, C> DistanceSampler for SensorBank<TRIG, ECHO, C>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    C: Clock,
{
    fn sample_all(&mut self) -> SlotReadings {
        let fill_plastic = self.fill_plastic.measure();
        self.clock.delay_us(SETTLE_BETWEEN_PINGS_US);
        let fill_paper = self.fill_paper.measure();
        self.clock.delay_us(SETTLE_BETWEEN_PINGS_US);
        let hand_plastic = self.hand_plastic.measure();
        self.clock.delay_us(SETTLE_BETWEEN_PINGS_US);
        let hand_paper = self.hand_paper.measure();

        SlotReadings {
            fill_plastic,
            fill_paper,
            hand_plastic,
            hand_paper,
        }
    }
}
