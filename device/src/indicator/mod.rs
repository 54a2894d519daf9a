mod pins;

use arduino_hal::port::{Pin, mode::Output};
pub use pins::{ProgrammingLedPin, UnlockedLedPin};
use shared::ports::IndicatorOutput;

/// Status LEDs, owned and driven by the main loop only.
#[allow(missing_debug_implementations)]
pub struct Indicators {
    unlocked: Pin<Output, UnlockedLedPin>,
    programming: Pin<Output, ProgrammingLedPin>,
}

impl Indicators {
    #[inline]
    pub fn new(
        unlocked: Pin<Output, UnlockedLedPin>,
        programming: Pin<Output, ProgrammingLedPin>,
    ) -> Self {
        Self {
            unlocked,
            programming,
        }
    }
}

impl IndicatorOutput for Indicators {
    #[inline]
    fn set_unlocked(&mut self, on: bool) {
        if on {
            self.unlocked.set_high();
        } else {
            self.unlocked.set_low();
        }
    }

    #[inline]
    fn set_programming(&mut self, on: bool) {
        if on {
            self.programming.set_high();
        } else {
            self.programming.set_low();
        }
    }
}
