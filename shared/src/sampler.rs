use crate::{Channel, Digit, SharedState};

/// Sequences the two conversions of a sampling cycle and feeds the scaled digits into
/// [`SharedState`].
///
/// `BITS` is the converter resolution.
#[derive(Debug, Default)]
pub struct AnalogSampler<const BITS: u32> {
    /// Channel whose conversion is currently running.
    in_flight: Option<Channel>,
}

impl<const BITS: u32> AnalogSampler<BITS> {
    #[must_use]
    pub const fn new() -> Self {
        Self { in_flight: None }
    }

    /// Starts a sampling cycle and returns the channel to convert first.
    ///
    /// An unfinished previous cycle is abandoned; its latched low digit gets replaced.
    #[inline]
    pub fn begin_cycle(&mut self) -> Channel {
        self.in_flight = Some(Channel::Low);
        Channel::Low
    }

    /// Handles a conversion complete event, returning the channel to convert next, if any.
    ///
    /// Completions with no conversion in flight are ignored.
    pub fn complete(&mut self, raw: u16, state: &mut SharedState) -> Option<Channel> {
        let channel = self.in_flight.take()?;
        let digit = Digit::from_sample::<BITS>(raw);

        state.record_sample(channel, digit);

        self.in_flight = channel.next();
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::AnalogSampler;
    use crate::{Channel, Digit, DigitPair, SharedState};

    #[test]
    fn test_cycle_converts_low_then_high() {
        let mut sampler = AnalogSampler::<12>::new();
        let mut state = SharedState::new();
        let _ = state.take_events();

        assert_eq!(sampler.begin_cycle(), Channel::Low);
        assert_eq!(sampler.complete(0x0C00, &mut state), Some(Channel::High));
        assert!(!state.take_events().reading_updated);

        assert_eq!(sampler.complete(0x0400, &mut state), None);
        let events = state.take_events();
        assert!(events.reading_updated);
        assert_eq!(events.reading, DigitPair::new(Digit::Seven, Digit::Two));
    }

    #[test]
    fn test_spurious_completion_ignored() {
        let mut sampler = AnalogSampler::<12>::new();
        let mut state = SharedState::new();
        let _ = state.take_events();

        assert_eq!(sampler.complete(0x0FFF, &mut state), None);

        sampler.begin_cycle();
        sampler.complete(0x0FFF, &mut state);
        sampler.complete(0x0FFF, &mut state);
        assert_eq!(sampler.complete(0x0000, &mut state), None);

        assert_eq!(state.reading(), DigitPair::new(Digit::Nine, Digit::Nine));
    }

    #[test]
    fn test_restarted_cycle_does_not_tear() {
        let mut sampler = AnalogSampler::<12>::new();
        let mut state = SharedState::new();

        sampler.begin_cycle();
        sampler.complete(0x0200, &mut state);
        // Cycle restarted before the high channel completed.
        sampler.begin_cycle();
        sampler.complete(0x0500, &mut state);
        sampler.complete(0x0000, &mut state);

        assert_eq!(state.reading(), DigitPair::new(Digit::Three, Digit::Zero));
    }
}
