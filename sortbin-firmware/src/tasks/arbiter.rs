//! The sorter control task
//!
//! Runs the arbitration loop forever. Each `run_cycle` is one iteration
//! of the polling state machine; the await between iterations yields to
//! the executor but the real pacing is the loop's own elapsed-time gate.

use defmt::*;
use embassy_time::Timer;

use sortbin_core::config::SUB_POLL_PERIOD_MS;
use sortbin_core::sorter::CycleOutcome;

use crate::board::BoardSorter;

/// Arbiter task - owns the sorter and every peripheral inside it
#[embassy_executor::task]
pub async fn arbiter_task(mut sorter: BoardSorter) {
    info!("Arbiter task started");

    sorter.boot();

    loop {
        match sorter.run_cycle() {
            CycleOutcome::Served(bin) => info!("Serviced the {:?} slot", bin),
            CycleOutcome::Reset => info!("Bin states reset"),
            CycleOutcome::Idle => {}
        }

        Timer::after_millis(u64::from(SUB_POLL_PERIOD_MS)).await;
    }
}
