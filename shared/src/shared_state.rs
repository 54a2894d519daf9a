use crate::{Channel, Digit, DigitPair, Reading};

/// State handed from the interrupt producers to the main loop.
///
/// Nothing here synchronizes by itself. The firmware keeps it in an
/// `avr_device::interrupt::Mutex<RefCell<_>>` and touches it only in critical sections.
///
/// The dial reading is published as a pair: the low digit is latched until the high digit of the
/// same sampling cycle completes, and only then do both become visible together with the
/// "reading updated" flag. The consumer therefore never sees one fresh digit next to a stale one.
#[derive(Debug)]
pub struct SharedState {
    /// Last fully sampled pair of digits.
    reading: Reading,
    /// Low digit of the sampling cycle in progress, waiting for its high digit.
    pending_low: Option<Digit>,
    /// Whether a new reading was published since the main loop last looked.
    reading_updated: bool,
    /// Whether a debounced press is waiting to be consumed.
    press_pending: bool,
}

impl SharedState {
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            reading: DigitPair::new(Digit::Zero, Digit::Zero),
            pending_low: None,
            // Forces a lock evaluation on the very first loop iteration.
            reading_updated: true,
            press_pending: false,
        }
    }

    /// Returns the last published reading.
    #[inline]
    #[must_use]
    pub fn reading(&self) -> Reading {
        self.reading
    }

    /// Records one channel's sample and returns whether it completed and published a reading.
    ///
    /// A high sample without a latched low sample is dropped.
    pub fn record_sample(&mut self, channel: Channel, digit: Digit) -> bool {
        match channel {
            Channel::Low => {
                self.pending_low = Some(digit);
                false
            }
            Channel::High => {
                let Some(low) = self.pending_low.take() else {
                    transition!(?digit, "high sample without low sample dropped");
                    return false;
                };

                self.reading = DigitPair::new(low, digit);
                self.reading_updated = true;
                transition!(reading = ?self.reading, "reading published");
                true
            }
        }
    }

    /// Flags a debounced button press. Presses that are not consumed in between coalesce.
    #[inline]
    pub fn raise_press(&mut self) {
        self.press_pending = true;
    }

    /// Takes everything the main loop needs for one iteration, clearing the consumed flags.
    #[inline]
    pub fn take_events(&mut self) -> LoopEvents {
        let events = LoopEvents {
            reading: self.reading,
            reading_updated: self.reading_updated,
            press: self.press_pending,
        };

        self.reading_updated = false;
        self.press_pending = false;
        events
    }
}

/// Snapshot of [`SharedState`] taken by the main loop in a single critical section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopEvents {
    pub reading: Reading,
    pub reading_updated: bool,
    pub press: bool,
}

impl LoopEvents {
    /// Whether the iteration has nothing to act on.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.reading_updated && !self.press
    }
}
