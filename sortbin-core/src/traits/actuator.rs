//! Lid actuator abstraction
//!
//! One shared lid serves both bins, so the actuator knows exactly three
//! positions. Commands are instantaneous; dwell timing is the loop's job.

/// Lid positions
///
/// Exactly one position is active at any instant. There are no
/// intermediate positions; the mechanism is commanded, not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LidPosition {
    /// Resting state, both slots covered
    Closed,
    /// Tilted so a drop lands in the plastic bin
    TowardPlastic,
    /// Tilted so a drop lands in the paper bin
    TowardPaper,
}

/// Trait for the shared lid mechanism
///
/// Implementations translate the named position into whatever the
/// mechanism needs (servo pulse width, stepper target, ...).
pub trait LidActuator {
    /// Command the lid to a position
    fn set_position(&mut self, position: LidPosition);
}
