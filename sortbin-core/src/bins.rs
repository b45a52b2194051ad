//! Bin identity and per-bin bookkeeping
//!
//! Each bin carries two latches: `full`, set by the fill tracker and
//! cleared only by reset, and `alert_sent`, set by the notifier and
//! cleared only by reset. `alert_sent` implies `full` at every point:
//! it is only ever set on a bin that is already full, and reset clears
//! both together.

use crate::traits::LidPosition;

/// The two bins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bin {
    Plastic,
    Paper,
}

impl Bin {
    /// Both bins in arbitration priority order (Plastic is checked first)
    pub const IN_PRIORITY_ORDER: [Bin; 2] = [Bin::Plastic, Bin::Paper];

    /// Display label, fits the panel width
    pub fn label(self) -> &'static str {
        match self {
            Bin::Plastic => "Plastic",
            Bin::Paper => "Paper",
        }
    }

    /// Lid position that drops into this bin
    pub fn lid_position(self) -> LidPosition {
        match self {
            Bin::Plastic => LidPosition::TowardPlastic,
            Bin::Paper => LidPosition::TowardPaper,
        }
    }
}

/// Latched state of one bin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinState {
    /// Bin judged full; sticky until reset
    pub full: bool,
    /// External alert already sent for this full-episode
    pub alert_sent: bool,
}

/// State of both bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BinStates {
    plastic: BinState,
    paper: BinState,
}

impl BinStates {
    /// Both bins empty, nothing alerted
    pub const fn new() -> Self {
        Self {
            plastic: BinState {
                full: false,
                alert_sent: false,
            },
            paper: BinState {
                full: false,
                alert_sent: false,
            },
        }
    }

    /// Current state of a bin
    pub fn get(&self, bin: Bin) -> BinState {
        match bin {
            Bin::Plastic => self.plastic,
            Bin::Paper => self.paper,
        }
    }

    fn get_mut(&mut self, bin: Bin) -> &mut BinState {
        match bin {
            Bin::Plastic => &mut self.plastic,
            Bin::Paper => &mut self.paper,
        }
    }

    /// True if the bin is latched full
    pub fn is_full(&self, bin: Bin) -> bool {
        self.get(bin).full
    }

    /// True if the bin is full and its one-shot alert has not fired yet
    pub fn alert_pending(&self, bin: Bin) -> bool {
        let state = self.get(bin);
        state.full && !state.alert_sent
    }

    /// Latch a bin full; one-way until [`BinStates::reset`]
    pub fn latch_full(&mut self, bin: Bin) {
        self.get_mut(bin).full = true;
    }

    /// Record that the one-shot alert fired
    ///
    /// Only meaningful on a full bin; ignored otherwise so the
    /// `alert_sent` implies `full` invariant cannot be broken.
    pub fn mark_alert_sent(&mut self, bin: Bin) {
        let state = self.get_mut(bin);
        if state.full {
            state.alert_sent = true;
        }
    }

    /// True if any bin is full now that was not full in `earlier`
    ///
    /// Used by the service wait to spot a fill event that happened
    /// mid-transaction; a bin that was already full when the snapshot
    /// was taken does not count.
    pub fn newly_full_since(&self, earlier: &BinStates) -> bool {
        Bin::IN_PRIORITY_ORDER
            .iter()
            .any(|&bin| self.is_full(bin) && !earlier.is_full(bin))
    }

    /// Clear all four latches in one operation
    ///
    /// The only way `full` ever becomes false.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(Bin::IN_PRIORITY_ORDER, [Bin::Plastic, Bin::Paper]);
    }

    #[test]
    fn test_lid_positions() {
        assert_eq!(Bin::Plastic.lid_position(), LidPosition::TowardPlastic);
        assert_eq!(Bin::Paper.lid_position(), LidPosition::TowardPaper);
    }

    #[test]
    fn test_latch_is_sticky() {
        let mut bins = BinStates::new();
        bins.latch_full(Bin::Plastic);
        assert!(bins.is_full(Bin::Plastic));
        assert!(!bins.is_full(Bin::Paper));

        // Latching again changes nothing
        bins.latch_full(Bin::Plastic);
        assert!(bins.is_full(Bin::Plastic));
    }

    #[test]
    fn test_alert_requires_full() {
        let mut bins = BinStates::new();

        // Not full: marking is a no-op
        bins.mark_alert_sent(Bin::Paper);
        assert!(!bins.get(Bin::Paper).alert_sent);

        bins.latch_full(Bin::Paper);
        assert!(bins.alert_pending(Bin::Paper));

        bins.mark_alert_sent(Bin::Paper);
        assert!(bins.get(Bin::Paper).alert_sent);
        assert!(!bins.alert_pending(Bin::Paper));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut bins = BinStates::new();
        bins.latch_full(Bin::Plastic);
        bins.latch_full(Bin::Paper);
        bins.mark_alert_sent(Bin::Plastic);

        bins.reset();

        for bin in Bin::IN_PRIORITY_ORDER {
            assert_eq!(bins.get(bin), BinState::default());
        }
    }

    #[test]
    fn test_newly_full_since() {
        let mut bins = BinStates::new();
        bins.latch_full(Bin::Paper);
        let snapshot = bins;

        // Nothing new yet
        assert!(!bins.newly_full_since(&snapshot));

        // Paper was already full at the snapshot; only Plastic counts
        bins.latch_full(Bin::Plastic);
        assert!(bins.newly_full_since(&snapshot));
    }

    #[test]
    fn test_alert_sent_implies_full() {
        // Exercise every mutation sequence over one bin and check the
        // invariant after each step
        let mut bins = BinStates::new();
        let check = |b: &BinStates| {
            for bin in Bin::IN_PRIORITY_ORDER {
                let s = b.get(bin);
                assert!(!s.alert_sent || s.full);
            }
        };

        check(&bins);
        bins.mark_alert_sent(Bin::Plastic);
        check(&bins);
        bins.latch_full(Bin::Plastic);
        check(&bins);
        bins.mark_alert_sent(Bin::Plastic);
        check(&bins);
        bins.reset();
        check(&bins);
    }
}
