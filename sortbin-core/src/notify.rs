//! Full-bin notification
//!
//! Two distinct outputs per full-episode:
//!
//! - the external alert fires at most once, gated by the `alert_sent`
//!   latch (cleared only on reset), so the message channel is never
//!   spammed;
//! - the visible warning re-emits every cycle a hand is detected over a
//!   full bin's slot, as a reminder to whoever is standing there.

use crate::bins::{Bin, BinStates};
use crate::messages;
use crate::traits::{AlertTransport, Clock, Panel, PanelExt};

/// Flash the panel with the full-bin warning
///
/// Blocking hold for `flash_ms`: warning text with the backlight dark
/// for the first half, lit for the second.
pub fn flash_warning<P, C>(panel: &mut P, clock: &mut C, bin: Bin, flash_ms: u32)
where
    P: Panel,
    C: Clock,
{
    let (top, bottom) = messages::full_lines(bin);
    let _ = panel.show(top, bottom);
    let _ = panel.set_backlight(false);
    clock.delay_ms(flash_ms / 2);
    let _ = panel.set_backlight(true);
    clock.delay_ms(flash_ms - flash_ms / 2);
}

/// Run the one-shot alert for a bin if it is due
///
/// Due means full with no alert sent this episode. Emits the visible
/// warning, sends exactly one external message, and sets the latch.
/// The send result is not inspected: the channel has no acknowledgment
/// path, so a failed send is indistinguishable from success and is not
/// retried. Returns true if the alert fired.
pub fn maybe_alert<P, T, C>(
    bins: &mut BinStates,
    bin: Bin,
    panel: &mut P,
    transport: &mut T,
    clock: &mut C,
    flash_ms: u32,
) -> bool
where
    P: Panel,
    T: AlertTransport,
    C: Clock,
{
    if !bins.alert_pending(bin) {
        return false;
    }

    flash_warning(panel, clock, bin, flash_ms);
    let _ = transport.send_alert(messages::alert_text(bin));
    bins.mark_alert_sent(bin);
    true
}
