//! Fixed display texts and the feedback message pool
//!
//! Every string fits the 16-column panel. The feedback pool is picked
//! from uniformly at random after each deposit; there is no ordering or
//! fairness guarantee, only variety.

use nanorand::{Rng, WyRand};

use crate::bins::Bin;

/// Boot banner
pub const READY: (&str, &str) = ("Sortbin ready", "Plastic | Paper");

/// Reset confirmation
pub const RESET_DONE: (&str, &str) = ("Bins reset", "Thank you!");

/// Feedback shown after a deposit, one entry picked per service
pub const FEEDBACK_POOL: [(&str, &str); 5] = [
    ("Thank you!", "Keep it sorted"),
    ("Nice one!", "See you again"),
    ("Well sorted!", ""),
    ("Every bit", "counts. Thanks!"),
    ("Good throw!", "Sorted right"),
];

/// Two-line "slot opening" message for a bin
pub fn opening_lines(bin: Bin) -> (&'static str, &'static str) {
    match bin {
        Bin::Plastic => ("Opening lid...", "Plastic side"),
        Bin::Paper => ("Opening lid...", "Paper side"),
    }
}

/// Two-line warning shown while a bin is full
pub fn full_lines(bin: Bin) -> (&'static str, &'static str) {
    match bin {
        Bin::Plastic => ("Plastic bin FULL", "Please empty it"),
        Bin::Paper => ("Paper bin FULL", "Please empty it"),
    }
}

/// Text of the one-shot external alert for a bin
pub fn alert_text(bin: Bin) -> &'static str {
    match bin {
        Bin::Plastic => "Sortbin: plastic bin is full, please empty it",
        Bin::Paper => "Sortbin: paper bin is full, please empty it",
    }
}

/// Uniform random pick over [`FEEDBACK_POOL`]
pub struct FeedbackPicker {
    rng: WyRand,
}

impl FeedbackPicker {
    /// Create a picker from a seed (the firmware seeds from boot time)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: WyRand::new_seed(seed),
        }
    }

    /// Pick one feedback message
    pub fn pick(&mut self) -> (&'static str, &'static str) {
        let index = self.rng.generate_range(0..FEEDBACK_POOL.len());
        FEEDBACK_POOL[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PANEL_COLS;

    #[test]
    fn test_all_texts_fit_the_panel() {
        let mut lines: std::vec::Vec<&str> = std::vec![READY.0, READY.1, RESET_DONE.0, RESET_DONE.1];
        for (top, bottom) in FEEDBACK_POOL {
            lines.push(top);
            lines.push(bottom);
        }
        for bin in Bin::IN_PRIORITY_ORDER {
            let (top, bottom) = opening_lines(bin);
            lines.push(top);
            lines.push(bottom);
            let (top, bottom) = full_lines(bin);
            lines.push(top);
            lines.push(bottom);
        }

        for line in lines {
            assert!(line.len() <= PANEL_COLS, "{:?} is wider than the panel", line);
        }
    }

    #[test]
    fn test_pick_is_deterministic_per_seed() {
        let mut a = FeedbackPicker::new(42);
        let mut b = FeedbackPicker::new(42);
        for _ in 0..20 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_pick_covers_the_pool() {
        // With enough draws every entry should appear at least once
        let mut picker = FeedbackPicker::new(7);
        let mut seen = [false; FEEDBACK_POOL.len()];
        for _ in 0..200 {
            let picked = picker.pick();
            let index = FEEDBACK_POOL
                .iter()
                .position(|entry| *entry == picked)
                .unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
