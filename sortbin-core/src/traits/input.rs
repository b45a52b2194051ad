//! Reset button abstraction

/// Trait for the manual reset input
///
/// Electrical details (active-low, pull-up) stay in the firmware wrapper;
/// the loop only asks whether the button is currently held.
pub trait ResetInput {
    /// True while the button is held down
    fn is_pressed(&mut self) -> bool;
}
