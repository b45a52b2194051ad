//! Fill tracking
//!
//! Converts fill-sensor distances into the sticky per-bin `full` latch.
//! The latch is one-way: a hand passing near a fill sensor must not
//! flap the bin between full and not-full, so once a bin is judged full
//! it stays full until a human resets the unit.

use crate::bins::{Bin, BinStates};
use crate::distance::SlotReadings;

/// One-way fullness latch fed by sampled distances
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FillTracker {
    threshold_cm: f32,
}

impl FillTracker {
    /// Create a tracker with the given fill threshold
    pub fn new(threshold_cm: f32) -> Self {
        Self { threshold_cm }
    }

    /// Latch any bin whose fill reading is valid and strictly below the
    /// threshold
    ///
    /// No-echo readings never latch; nothing is ever cleared here.
    pub fn update(&self, bins: &mut BinStates, readings: &SlotReadings) {
        for bin in Bin::IN_PRIORITY_ORDER {
            if readings.fill(bin).is_within(self.threshold_cm) {
                bins.latch_full(bin);
            }
        }
    }
}
