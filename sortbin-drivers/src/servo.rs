//! Lid servo over PWM
//!
//! Standard hobby-servo signalling: a pulse between `min_pulse_us` and
//! `max_pulse_us` once per `period_us` selects the shaft angle. The
//! three lid positions map to three fixed angles.

use embedded_hal::pwm::SetDutyCycle;

use sortbin_core::traits::{LidActuator, LidPosition};

/// Servo signal timing
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// PWM period (50 Hz frame)
    pub period_us: u32,
    /// Pulse width at 0 degrees
    pub min_pulse_us: u32,
    /// Pulse width at `max_angle_deg`
    pub max_pulse_us: u32,
    /// Mechanical range of the servo
    pub max_angle_deg: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            period_us: 20_000,
            min_pulse_us: 500,
            max_pulse_us: 2_400,
            max_angle_deg: 180,
        }
    }
}

/// Shaft angles for the three lid positions
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidAngles {
    /// Resting position, both slots covered
    pub closed_deg: u16,
    /// Tilt that drops into the plastic bin
    pub toward_plastic_deg: u16,
    /// Tilt that drops into the paper bin
    pub toward_paper_deg: u16,
}

impl Default for LidAngles {
    fn default() -> Self {
        Self {
            closed_deg: 90,
            toward_plastic_deg: 0,
            toward_paper_deg: 180,
        }
    }
}

/// Pulse width for an angle, clamped to the servo's range
pub fn pulse_for_angle(cfg: &ServoConfig, angle_deg: u16) -> u32 {
    let angle = u32::from(angle_deg.min(cfg.max_angle_deg));
    let span = cfg.max_pulse_us - cfg.min_pulse_us;
    cfg.min_pulse_us + span * angle / u32::from(cfg.max_angle_deg)
}

/// The shared lid, driven by one servo
pub struct LidServo<P> {
    pwm: P,
    cfg: ServoConfig,
    angles: LidAngles,
}

impl<P: SetDutyCycle> LidServo<P> {
    /// Create the lid around a PWM channel already configured for the
    /// servo frame rate
    pub fn new(pwm: P, cfg: ServoConfig, angles: LidAngles) -> Self {
        Self { pwm, cfg, angles }
    }

    /// Command the shaft to an angle
    pub fn set_angle(&mut self, angle_deg: u16) {
        let pulse_us = pulse_for_angle(&self.cfg, angle_deg);
        let max_duty = u32::from(self.pwm.max_duty_cycle());
        let duty = (pulse_us * max_duty / self.cfg.period_us).min(max_duty) as u16;
        let _ = self.pwm.set_duty_cycle(duty);
    }
}

impl<P: SetDutyCycle> LidActuator for LidServo<P> {
    fn set_position(&mut self, position: LidPosition) {
        let angle_deg = match position {
            LidPosition::Closed => self.angles.closed_deg,
            LidPosition::TowardPlastic => self.angles.toward_plastic_deg,
            LidPosition::TowardPaper => self.angles.toward_paper_deg,
        };
        self.set_angle(angle_deg);
    }
}
