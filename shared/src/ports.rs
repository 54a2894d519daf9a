//! Boundary traits implemented by the firmware on real peripherals and by the simulator in memory.

use crate::{Channel, Digit, Panel};

/// Button edge direction. The button is active low, so a press starts with a falling edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Falling,
    Rising,
}

/// Sampled button pin level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Asserted,
    Released,
}

/// Two channel analog converter. Completions are delivered through the conversion complete
/// interrupt, which hands the raw sample to [`crate::AnalogSampler::complete`].
pub trait AnalogInput {
    /// Starts the timer that triggers a sampling cycle every `period_ms`.
    fn start_periodic_sampling(&mut self, period_ms: u16);

    /// Starts a single conversion on `channel`.
    fn convert(&mut self, channel: Channel);
}

/// Momentary push button.
pub trait ButtonInput {
    /// Reads the current pin level.
    fn read_level(&self) -> Level;

    /// Enables or disables the edge interrupt. Re-enabling discards any edge latched while it was
    /// disabled.
    fn set_edge_detection(&mut self, enabled: bool);
}

/// Two multiplexed single digit panels sharing one set of segment lines.
pub trait DisplayPanel {
    /// Enables `panel` and disables the other one.
    fn select_panel(&mut self, panel: Panel);

    /// Renders `digit` on the currently selected panel.
    fn write_digit(&mut self, digit: Digit);
}

/// Status LEDs.
pub trait IndicatorOutput {
    fn set_unlocked(&mut self, on: bool);

    fn set_programming(&mut self, on: bool);
}
