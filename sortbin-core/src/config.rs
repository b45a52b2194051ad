//! Loop configuration
//!
//! Every tunable is a compile-time design constant; the struct exists so
//! tests can vary thresholds and shrink the wait periods.

/// Fill-detection threshold in centimeters
pub const FULL_THRESHOLD_CM: f32 = 10.0;

/// Hand-detection threshold in centimeters
pub const HAND_THRESHOLD_CM: f32 = 10.0;

/// Sensor refresh period in milliseconds
pub const POLL_PERIOD_MS: u32 = 100;

/// Fast re-sample period used inside blocking waits, milliseconds
pub const SUB_POLL_PERIOD_MS: u32 = 20;

/// How long the lid holds an open position before the withdrawal wait
pub const LID_DWELL_MS: u32 = 1500;

/// Duration of one visible warning flash, milliseconds
pub const WARN_FLASH_MS: u32 = 400;

/// How long a feedback message stays on screen, milliseconds
pub const FEEDBACK_HOLD_MS: u32 = 1200;

/// Settle delay after the reset button is first seen pressed
pub const RESET_SETTLE_MS: u32 = 50;

/// Arbitration loop configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SorterConfig {
    /// A fill reading strictly below this latches the bin full (cm)
    pub full_threshold_cm: f32,
    /// A hand reading strictly below this counts as hand present (cm)
    pub hand_threshold_cm: f32,
    /// Sensor refresh period (ms), checked by elapsed-time comparison
    pub poll_period_ms: u32,
    /// Re-sample period inside blocking waits (ms)
    pub sub_poll_period_ms: u32,
    /// Lid open dwell (ms); always runs to completion once started
    pub lid_dwell_ms: u32,
    /// Visible warning flash duration (ms)
    pub warn_flash_ms: u32,
    /// Feedback message hold (ms)
    pub feedback_hold_ms: u32,
    /// Reset debounce settle delay (ms)
    pub reset_settle_ms: u32,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            full_threshold_cm: FULL_THRESHOLD_CM,
            hand_threshold_cm: HAND_THRESHOLD_CM,
            poll_period_ms: POLL_PERIOD_MS,
            sub_poll_period_ms: SUB_POLL_PERIOD_MS,
            lid_dwell_ms: LID_DWELL_MS,
            warn_flash_ms: WARN_FLASH_MS,
            feedback_hold_ms: FEEDBACK_HOLD_MS,
            reset_settle_ms: RESET_SETTLE_MS,
        }
    }
}
