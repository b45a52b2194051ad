//! The arbitration loop
//!
//! One sequential thread of control shares a single lid between two
//! intake slots. Sensors are refreshed on a fixed poll period (checked
//! by elapsed-time comparison, not sleep), fullness latches feed the
//! notifier, and a hand over a non-full slot starts a blocking service
//! transaction: open toward that bin, hold the dwell, re-sample on a
//! fast sub-period until the hand withdraws or a fill event arrives,
//! then show a feedback message.
//!
//! Every wait in here is a blocking hold of the whole loop: there is
//! exactly one actuator and one panel, so nothing useful could run
//! concurrently.

use crate::bins::{Bin, BinStates};
use crate::config::SorterConfig;
use crate::distance::SlotReadings;
use crate::fill::FillTracker;
use crate::messages::{self, FeedbackPicker};
use crate::notify;
use crate::traits::{
    AlertTransport, Clock, DistanceSampler, LidActuator, LidPosition, Panel, PanelExt, ResetInput,
};

/// What a cycle ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Nothing to do this cycle
    Idle,
    /// A slot was serviced (open, dwell, wait, feedback)
    Served(Bin),
    /// The manual reset ran
    Reset,
}

/// The sorter control loop
///
/// Owns all mutable state (bin latches, latest readings, last poll
/// timestamp) and the injected peripherals. `run_cycle` is called
/// forever by the firmware task; each call is one iteration of the
/// polling state machine.
pub struct Sorter<S, A, P, T, R, C> {
    cfg: SorterConfig,
    bins: BinStates,
    fill: FillTracker,
    feedback: FeedbackPicker,
    readings: SlotReadings,
    last_poll_ms: Option<u64>,
    sampler: S,
    lid: A,
    panel: P,
    transport: T,
    reset_button: R,
    clock: C,
}

impl<S, A, P, T, R, C> Sorter<S, A, P, T, R, C>
where
    S: DistanceSampler,
    A: LidActuator,
    P: Panel,
    T: AlertTransport,
    R: ResetInput,
    C: Clock,
{
    /// Create the loop around its peripherals
    ///
    /// `seed` feeds the feedback picker; the firmware passes boot-time
    /// microseconds, tests pass a constant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cfg: SorterConfig,
        sampler: S,
        lid: A,
        panel: P,
        transport: T,
        reset_button: R,
        clock: C,
        seed: u64,
    ) -> Self {
        let fill = FillTracker::new(cfg.full_threshold_cm);
        Self {
            cfg,
            bins: BinStates::new(),
            fill,
            feedback: FeedbackPicker::new(seed),
            readings: SlotReadings::all_no_echo(),
            last_poll_ms: None,
            sampler,
            lid,
            panel,
            transport,
            reset_button,
            clock,
        }
    }

    /// Close the lid and show the ready banner
    pub fn boot(&mut self) {
        self.lid.set_position(LidPosition::Closed);
        let _ = self.panel.set_backlight(true);
        let _ = self.panel.show(messages::READY.0, messages::READY.1);
    }

    /// Current bin latches
    pub fn bins(&self) -> &BinStates {
        &self.bins
    }

    /// One iteration of the polling state machine
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.poll_sensors_if_due();

        // One-shot alerts for bins that latched full
        for bin in Bin::IN_PRIORITY_ORDER {
            notify::maybe_alert(
                &mut self.bins,
                bin,
                &mut self.panel,
                &mut self.transport,
                &mut self.clock,
                self.cfg.warn_flash_ms,
            );
        }

        // Repeatable reminder: a hand over a full bin's slot gets the
        // visible warning every cycle, independent of the one-shot gate
        for bin in Bin::IN_PRIORITY_ORDER {
            if self.bins.is_full(bin) && self.hand_present(bin) {
                notify::flash_warning(
                    &mut self.panel,
                    &mut self.clock,
                    bin,
                    self.cfg.warn_flash_ms,
                );
            }
        }

        if self.reset_button.is_pressed() {
            self.perform_reset();
            return CycleOutcome::Reset;
        }

        // Plastic is checked first; at most one slot is serviced per
        // iteration because the lid can only be in one place. The other
        // slot's demand persists and is re-evaluated next cycle.
        for bin in Bin::IN_PRIORITY_ORDER {
            if self.hand_present(bin) && !self.bins.is_full(bin) {
                self.serve(bin);
                return CycleOutcome::Served(bin);
            }
        }

        CycleOutcome::Idle
    }

    /// Resample every channel once the poll period has elapsed
    ///
    /// Also forces the lid closed: closed is the resting state unless a
    /// service opens it later in the same iteration.
    fn poll_sensors_if_due(&mut self) {
        let now = self.clock.now_ms();
        let due = match self.last_poll_ms {
            Some(last) => now.saturating_sub(last) >= u64::from(self.cfg.poll_period_ms),
            None => true,
        };
        if due {
            self.last_poll_ms = Some(now);
            self.readings = self.sampler.sample_all();
            self.fill.update(&mut self.bins, &self.readings);
            self.lid.set_position(LidPosition::Closed);
        }
    }

    /// True if the latest sample shows a hand over this bin's slot
    fn hand_present(&self, bin: Bin) -> bool {
        self.readings.hand(bin).is_within(self.cfg.hand_threshold_cm)
    }

    /// One service transaction for a slot
    fn serve(&mut self, bin: Bin) {
        let (top, bottom) = messages::opening_lines(bin);
        let _ = self.panel.show(top, bottom);

        self.lid.set_position(bin.lid_position());
        // The dwell always runs to completion once the lid is open
        self.clock.delay_ms(self.cfg.lid_dwell_ms);

        // Wait for the hand to withdraw. A fill event on a bin that was
        // not full when the wait started ends it early, so a fill
        // mid-transaction cannot hang the loop.
        let before = self.bins;
        loop {
            self.readings = self.sampler.sample_all();
            self.fill.update(&mut self.bins, &self.readings);

            if !self.hand_present(bin) {
                break;
            }
            if self.bins.newly_full_since(&before) {
                break;
            }

            self.clock.delay_ms(self.cfg.sub_poll_period_ms);
        }

        let (top, bottom) = self.feedback.pick();
        let _ = self.panel.show(top, bottom);
        self.clock.delay_ms(self.cfg.feedback_hold_ms);
    }

    /// Debounced manual reset
    ///
    /// Settle delay to ride out contact bounce, clear both bins, show
    /// the confirmation, force the lid closed, then hold until the
    /// button is released.
    fn perform_reset(&mut self) {
        self.clock.delay_ms(self.cfg.reset_settle_ms);

        self.bins.reset();
        let _ = self.panel.show(messages::RESET_DONE.0, messages::RESET_DONE.1);
        self.lid.set_position(LidPosition::Closed);

        while self.reset_button.is_pressed() {
            self.clock.delay_ms(self.cfg.sub_poll_period_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceReading;
    use crate::mock::{
        ManualClock, RecordingLid, RecordingPanel, RecordingTransport, ScriptedButton,
        ScriptedSampler,
    };
    use std::vec;
    use std::vec::Vec;

    type TestSorter = Sorter<
        ScriptedSampler,
        RecordingLid,
        RecordingPanel,
        RecordingTransport,
        ScriptedButton,
        ManualClock,
    >;

    const NEAR: DistanceReading = DistanceReading::Centimeters(5.0);

    fn sorter(script: Vec<SlotReadings>, button: ScriptedButton) -> TestSorter {
        Sorter::new(
            SorterConfig::default(),
            ScriptedSampler::new(script),
            RecordingLid::new(),
            RecordingPanel::new(),
            RecordingTransport::new(),
            button,
            ManualClock::new(),
            1234,
        )
    }

    fn quiet() -> SlotReadings {
        SlotReadings::all_no_echo()
    }

    fn with_fill(bin: Bin, reading: DistanceReading) -> SlotReadings {
        let mut readings = quiet();
        match bin {
            Bin::Plastic => readings.fill_plastic = reading,
            Bin::Paper => readings.fill_paper = reading,
        }
        readings
    }

    fn with_hand(bin: Bin, reading: DistanceReading) -> SlotReadings {
        let mut readings = quiet();
        match bin {
            Bin::Plastic => readings.hand_plastic = reading,
            Bin::Paper => readings.hand_paper = reading,
        }
        readings
    }

    #[test]
    fn test_idle_when_nothing_happens() {
        let mut sorter = sorter(vec![quiet()], ScriptedButton::released());

        for _ in 0..5 {
            assert_eq!(sorter.run_cycle(), CycleOutcome::Idle);
            sorter.clock.advance_ms(100);
        }

        assert!(!sorter.bins().is_full(Bin::Plastic));
        assert!(!sorter.bins().is_full(Bin::Paper));
        assert!(sorter.transport.sent.is_empty());
        // Only idle-default close commands ever reached the lid
        assert!(sorter
            .lid
            .history
            .iter()
            .all(|&p| p == LidPosition::Closed));
    }

    #[test]
    fn test_poll_period_gates_sampling() {
        let mut sorter = sorter(vec![quiet()], ScriptedButton::released());

        sorter.run_cycle();
        assert_eq!(sorter.sampler.samples_taken, 1);

        // No time passed: the next cycle must not resample
        sorter.run_cycle();
        assert_eq!(sorter.sampler.samples_taken, 1);

        sorter.clock.advance_ms(100);
        sorter.run_cycle();
        assert_eq!(sorter.sampler.samples_taken, 2);
    }

    #[test]
    fn test_near_fill_reading_latches_far_does_not() {
        let mut sorter = sorter(
            vec![
                with_fill(Bin::Plastic, DistanceReading::Centimeters(15.0)),
                with_fill(Bin::Plastic, NEAR),
            ],
            ScriptedButton::released(),
        );

        sorter.run_cycle();
        assert!(!sorter.bins().is_full(Bin::Plastic));

        sorter.clock.advance_ms(100);
        sorter.run_cycle();
        assert!(sorter.bins().is_full(Bin::Plastic));
    }

    #[test]
    fn test_hand_over_empty_bin_gets_served() {
        // Poll sees a hand over the paper slot, the wait sees it once
        // more, then it withdraws
        let mut sorter = sorter(
            vec![
                with_hand(Bin::Paper, DistanceReading::Centimeters(8.0)),
                with_hand(Bin::Paper, DistanceReading::Centimeters(8.0)),
                quiet(),
            ],
            ScriptedButton::released(),
        );

        assert_eq!(sorter.run_cycle(), CycleOutcome::Served(Bin::Paper));

        // Closed from the poll default, then opened toward paper
        assert_eq!(
            sorter.lid.history,
            vec![LidPosition::Closed, LidPosition::TowardPaper]
        );

        // Dwell held first, then the fast sub-period, then the feedback hold
        assert_eq!(sorter.clock.delays_ms[0], sorter.cfg.lid_dwell_ms);
        assert_eq!(sorter.clock.delays_ms[1], sorter.cfg.sub_poll_period_ms);
        assert_eq!(
            *sorter.clock.delays_ms.last().unwrap(),
            sorter.cfg.feedback_hold_ms
        );

        // The last screen is one of the feedback pool entries
        let lines = sorter.panel.lines_written();
        let top = lines[lines.len() - 2].as_str();
        let bottom = lines[lines.len() - 1].as_str();
        assert!(messages::FEEDBACK_POOL
            .iter()
            .any(|&(t, b)| t == top && b == bottom));

        // Nothing about this transaction is an alert
        assert!(sorter.transport.sent.is_empty());
    }

    #[test]
    fn test_full_bin_is_never_served() {
        let mut readings = with_fill(Bin::Plastic, NEAR);
        readings.hand_plastic = NEAR;

        let mut sorter = sorter(vec![readings], ScriptedButton::released());
        sorter.run_cycle();

        assert!(sorter.bins().is_full(Bin::Plastic));
        // The lid never opened
        assert!(sorter
            .lid
            .history
            .iter()
            .all(|&p| p == LidPosition::Closed));
    }

    #[test]
    fn test_one_alert_but_warning_every_cycle() {
        let mut readings = with_fill(Bin::Plastic, NEAR);
        readings.hand_plastic = NEAR;

        let mut sorter = sorter(vec![readings], ScriptedButton::released());

        for _ in 0..3 {
            sorter.run_cycle();
            sorter.clock.advance_ms(100);
        }

        // External alert exactly once per full-episode
        assert_eq!(sorter.transport.sent.len(), 1);
        assert_eq!(
            sorter.transport.sent[0].as_str(),
            messages::alert_text(Bin::Plastic)
        );

        // Visible warning on the alert plus once per cycle with the
        // hand present: 1 + 3
        let warnings = sorter
            .panel
            .lines_written()
            .iter()
            .filter(|line| line.as_str() == messages::full_lines(Bin::Plastic).0)
            .count();
        assert_eq!(warnings, 4);
    }

    #[test]
    fn test_send_failure_does_not_retry() {
        let mut sorter = sorter(
            vec![with_fill(Bin::Paper, NEAR)],
            ScriptedButton::released(),
        );
        sorter.transport.fail = true;

        for _ in 0..3 {
            sorter.run_cycle();
            sorter.clock.advance_ms(100);
        }

        // The channel cannot confirm delivery, so the failed send is
        // latched like a success and never retried
        assert_eq!(sorter.transport.sent.len(), 1);
    }

    #[test]
    fn test_reset_clears_both_bins_and_closes_lid() {
        // Held for the cycle's check plus two release-loop polls
        let button = ScriptedButton::new(vec![true, true, true, false]);
        let mut sorter = sorter(vec![with_fill(Bin::Plastic, NEAR)], button);

        assert_eq!(sorter.run_cycle(), CycleOutcome::Reset);

        assert!(!sorter.bins().is_full(Bin::Plastic));
        assert!(!sorter.bins().is_full(Bin::Paper));
        assert!(!sorter.bins().get(Bin::Plastic).alert_sent);
        assert_eq!(sorter.lid.current, LidPosition::Closed);

        let lines = sorter.panel.lines_written();
        assert!(lines.iter().any(|l| l.as_str() == messages::RESET_DONE.0));

        // The one-shot alert flash ran before the reset was checked,
        // and the settle delay ran as part of the reset
        assert_eq!(sorter.clock.delays_ms[0], sorter.cfg.warn_flash_ms / 2);
        assert!(sorter
            .clock
            .delays_ms
            .contains(&sorter.cfg.reset_settle_ms));
    }

    #[test]
    fn test_full_latches_again_after_reset() {
        let button = ScriptedButton::new(vec![false, true, false]);
        let mut sorter = sorter(vec![with_fill(Bin::Plastic, NEAR)], button);

        // Cycle 1: latch + alert. Cycle 2: reset. Cycle 3: latch + alert again.
        sorter.run_cycle();
        sorter.clock.advance_ms(100);
        assert_eq!(sorter.run_cycle(), CycleOutcome::Reset);
        sorter.clock.advance_ms(100);
        sorter.run_cycle();

        assert!(sorter.bins().is_full(Bin::Plastic));
        assert_eq!(sorter.transport.sent.len(), 2);
    }

    #[test]
    fn test_both_hands_plastic_first_paper_next_cycle() {
        let mut both = quiet();
        both.hand_plastic = DistanceReading::Centimeters(6.0);
        both.hand_paper = DistanceReading::Centimeters(6.0);

        let mut paper_only = quiet();
        paper_only.hand_paper = DistanceReading::Centimeters(6.0);

        let mut sorter = sorter(
            vec![
                both,       // poll: both slots demand service
                both,       // wait: plastic hand still there
                paper_only, // wait: plastic hand gone, paper persists
                paper_only, // next poll: paper still waiting
                paper_only, // wait: paper hand still there
                quiet(),    // wait: paper hand gone
            ],
            ScriptedButton::released(),
        );

        // Plastic wins the cycle; the paper request is not lost, just
        // deferred to the next iteration
        assert_eq!(sorter.run_cycle(), CycleOutcome::Served(Bin::Plastic));
        sorter.clock.advance_ms(100);
        assert_eq!(sorter.run_cycle(), CycleOutcome::Served(Bin::Paper));

        assert_eq!(
            sorter.lid.history,
            vec![
                LidPosition::Closed,
                LidPosition::TowardPlastic,
                LidPosition::Closed,
                LidPosition::TowardPaper,
            ]
        );
    }

    #[test]
    fn test_fill_event_aborts_the_withdrawal_wait() {
        let hand_held = with_hand(Bin::Plastic, NEAR);

        let mut hand_held_and_paper_fills = hand_held;
        hand_held_and_paper_fills.fill_paper = NEAR;

        let mut sorter = sorter(
            vec![hand_held, hand_held_and_paper_fills],
            ScriptedButton::released(),
        );

        // The hand never withdraws, but the paper fill event ends the
        // wait after a single sub-period sample
        assert_eq!(sorter.run_cycle(), CycleOutcome::Served(Bin::Plastic));
        assert_eq!(sorter.sampler.samples_taken, 2);
        assert!(sorter.bins().is_full(Bin::Paper));
    }

    #[test]
    fn test_bin_already_full_does_not_abort_service() {
        let paper_full = with_fill(Bin::Paper, NEAR);

        let mut serving = with_hand(Bin::Plastic, NEAR);
        serving.fill_paper = NEAR;

        let mut released = quiet();
        released.fill_paper = NEAR;

        let mut sorter = sorter(
            vec![paper_full, serving, serving, released],
            ScriptedButton::released(),
        );

        // Cycle 1: paper latches full and alerts
        sorter.run_cycle();
        assert!(sorter.bins().is_full(Bin::Paper));

        // Cycle 2: plastic is served; paper being full since before the
        // wait started must not cut the transaction short
        sorter.clock.advance_ms(100);
        assert_eq!(sorter.run_cycle(), CycleOutcome::Served(Bin::Plastic));
        // Two poll samples, one wait sample with the hand held, and the
        // one that saw it withdraw
        assert_eq!(sorter.sampler.samples_taken, 4);
    }

    #[test]
    fn test_no_echo_never_looks_like_a_hand() {
        let mut sorter = sorter(vec![quiet()], ScriptedButton::released());

        for _ in 0..4 {
            assert_eq!(sorter.run_cycle(), CycleOutcome::Idle);
            sorter.clock.advance_ms(100);
        }
        assert!(sorter
            .lid
            .history
            .iter()
            .all(|&p| p == LidPosition::Closed));
    }

    #[test]
    fn test_boot_shows_banner_and_closes() {
        let mut sorter = sorter(vec![quiet()], ScriptedButton::released());
        sorter.boot();

        assert_eq!(sorter.lid.current, LidPosition::Closed);
        let lines = sorter.panel.lines_written();
        assert_eq!(lines[0].as_str(), messages::READY.0);
        assert_eq!(lines[1].as_str(), messages::READY.1);
    }
}
