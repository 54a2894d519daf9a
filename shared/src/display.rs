use crate::{Reading, ports::DisplayPanel};

/// Display panels, in refresh order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum Panel {
    /// Left panel, shows the high digit.
    High,
    /// Right panel, shows the low digit.
    Low,
}

impl Panel {
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

/// Alternates the two panels on every refresh tick. Driven fast enough, both digits appear lit at
/// the same time.
#[derive(Debug)]
pub struct DisplayMultiplexer {
    active: Panel,
}

impl DisplayMultiplexer {
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            active: Panel::High,
        }
    }

    /// Drives the active panel with its half of `reading` and hands the next tick to the other
    /// panel. Returns the panel that was driven.
    pub fn refresh<D>(&mut self, reading: Reading, display: &mut D) -> Panel
    where
        D: DisplayPanel,
    {
        let panel = self.active;
        let digit = match panel {
            Panel::High => reading.high(),
            Panel::Low => reading.low(),
        };

        display.select_panel(panel);
        display.write_digit(digit);

        self.active = panel.other();
        panel
    }
}
