//! Mock peripherals for host tests
//!
//! Scripted inputs and recording outputs; the manual clock advances
//! instantly on delay so scenario tests run in real microseconds.

use std::string::{String, ToString};
use std::vec::Vec;

use crate::distance::SlotReadings;
use crate::traits::{
    AlertTransport, Clock, DistanceSampler, LidActuator, LidPosition, Panel, PanelError,
    ResetInput, TransportError,
};

/// Clock that only moves when something delays on it
pub struct ManualClock {
    now_us: u64,
    /// Every delay_ms call, in order
    pub delays_ms: Vec<u32>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now_us: 0,
            delays_ms: Vec::new(),
        }
    }

    /// Advance time without recording a delay (as if work took this long)
    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us += ms * 1_000;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_us / 1_000
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
        self.now_us += u64::from(ms) * 1_000;
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us += u64::from(us);
    }
}

/// Sampler that replays a script, repeating the last entry forever
pub struct ScriptedSampler {
    script: Vec<SlotReadings>,
    index: usize,
    /// Total sample_all calls
    pub samples_taken: usize,
}

impl ScriptedSampler {
    pub fn new(script: Vec<SlotReadings>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            index: 0,
            samples_taken: 0,
        }
    }
}

impl DistanceSampler for ScriptedSampler {
    fn sample_all(&mut self) -> SlotReadings {
        self.samples_taken += 1;
        let reading = self.script[self.index.min(self.script.len() - 1)];
        self.index += 1;
        reading
    }
}

/// Everything a panel was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOp {
    Clear,
    Backlight(bool),
    Line(u8, String),
}

/// Panel that records every operation and never fails
pub struct RecordingPanel {
    pub ops: Vec<PanelOp>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// All written lines, in order
    pub fn lines_written(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PanelOp::Line(_, text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Backlight switches, in order
    pub fn backlight_trace(&self) -> Vec<bool> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PanelOp::Backlight(on) => Some(*on),
                _ => None,
            })
            .collect()
    }
}

impl Panel for RecordingPanel {
    fn clear(&mut self) -> Result<(), PanelError> {
        self.ops.push(PanelOp::Clear);
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), PanelError> {
        self.ops.push(PanelOp::Backlight(on));
        Ok(())
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), PanelError> {
        self.ops.push(PanelOp::Line(row, text.to_string()));
        Ok(())
    }
}

/// Transport that records sends; can be told to fail
pub struct RecordingTransport {
    pub sent: Vec<String>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            fail: false,
        }
    }
}

impl AlertTransport for RecordingTransport {
    fn send_alert(&mut self, text: &str) -> Result<(), TransportError> {
        self.sent.push(text.to_string());
        if self.fail {
            Err(TransportError::Serial)
        } else {
            Ok(())
        }
    }
}

/// Lid that records every commanded position
pub struct RecordingLid {
    pub history: Vec<LidPosition>,
    pub current: LidPosition,
}

impl RecordingLid {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            current: LidPosition::Closed,
        }
    }
}

impl LidActuator for RecordingLid {
    fn set_position(&mut self, position: LidPosition) {
        self.history.push(position);
        self.current = position;
    }
}

/// Button that replays a script, repeating the last entry forever
pub struct ScriptedButton {
    script: Vec<bool>,
    index: usize,
}

impl ScriptedButton {
    pub fn new(script: Vec<bool>) -> Self {
        assert!(!script.is_empty());
        Self { script, index: 0 }
    }

    /// Never pressed
    pub fn released() -> Self {
        Self::new(std::vec![false])
    }
}

impl ResetInput for ScriptedButton {
    fn is_pressed(&mut self) -> bool {
        let pressed = self.script[self.index.min(self.script.len() - 1)];
        self.index += 1;
        pressed
    }
}
