use crate::{Cipher, Digit, DigitPair, LoopEvents, Reading, ports::IndicatorOutput};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockStatus {
    #[default]
    Locked,
    Unlocked,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgrammingState {
    #[default]
    Idle,
    /// The first press was registered; the next one stores the dial reading as the new cipher.
    AwaitingConfirm,
}

/// The lock and cipher reprogramming state machine run by the main loop.
///
/// The lock status is always derived from comparing the dials with the cipher and is never
/// trusted on its own. Reprogramming takes two presses while unlocked: the first one arms it,
/// the second one commits whatever the dials show at that moment.
#[derive(Debug)]
pub struct LockController {
    cipher: Cipher,
    reading: Reading,
    lock_status: LockStatus,
    programming_state: ProgrammingState,
}

impl Default for LockController {
    fn default() -> Self {
        Self::new(DigitPair::DEFAULT_CIPHER)
    }
}

impl LockController {
    #[must_use]
    pub const fn new(cipher: Cipher) -> Self {
        Self {
            cipher,
            reading: DigitPair::new(Digit::Zero, Digit::Zero),
            lock_status: LockStatus::Locked,
            programming_state: ProgrammingState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub fn cipher(&self) -> Cipher {
        self.cipher
    }

    #[inline]
    #[must_use]
    pub fn reading(&self) -> Reading {
        self.reading
    }

    #[inline]
    #[must_use]
    pub fn lock_status(&self) -> LockStatus {
        self.lock_status
    }

    #[inline]
    #[must_use]
    pub fn programming_state(&self) -> ProgrammingState {
        self.programming_state
    }

    /// Drives the indicators to match the current state.
    pub fn init<I>(&self, indicators: &mut I)
    where
        I: IndicatorOutput,
    {
        indicators.set_unlocked(self.lock_status == LockStatus::Unlocked);
        indicators.set_programming(self.programming_state == ProgrammingState::AwaitingConfirm);
    }

    /// Runs one main loop iteration. A new reading is always handled before a press.
    pub fn handle<I>(&mut self, events: LoopEvents, indicators: &mut I)
    where
        I: IndicatorOutput,
    {
        self.reading = events.reading;

        // While a new cipher is being dialed in the lock stays open, otherwise the confirming
        // press would be discarded as soon as the dials leave the old cipher.
        if events.reading_updated && self.programming_state == ProgrammingState::Idle {
            self.evaluate(indicators);
        }

        if events.press {
            self.press(indicators);
        }
    }

    fn press<I>(&mut self, indicators: &mut I)
    where
        I: IndicatorOutput,
    {
        if self.lock_status == LockStatus::Locked {
            transition!("press ignored while locked");
            return;
        }

        match self.programming_state {
            ProgrammingState::Idle => {
                self.programming_state = ProgrammingState::AwaitingConfirm;
                indicators.set_programming(true);
                transition!("cipher programming armed");
            }
            ProgrammingState::AwaitingConfirm => {
                self.cipher = self.reading;
                self.programming_state = ProgrammingState::Idle;
                indicators.set_programming(false);
                transition!(cipher = ?self.cipher, "cipher committed");

                self.evaluate(indicators);
            }
        }
    }

    fn evaluate<I>(&mut self, indicators: &mut I)
    where
        I: IndicatorOutput,
    {
        let lock_status = if self.reading == self.cipher {
            LockStatus::Unlocked
        } else {
            LockStatus::Locked
        };

        if lock_status != self.lock_status {
            transition!(reading = ?self.reading, ?lock_status, "lock status changed");
        }

        self.lock_status = lock_status;
        indicators.set_unlocked(lock_status == LockStatus::Unlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::{LockController, LockStatus, ProgrammingState};
    use crate::{Digit, DigitPair, LoopEvents, Reading, ports::IndicatorOutput};

    #[derive(Default)]
    struct Leds {
        unlocked: bool,
        programming: bool,
    }

    impl IndicatorOutput for Leds {
        fn set_unlocked(&mut self, on: bool) {
            self.unlocked = on;
        }

        fn set_programming(&mut self, on: bool) {
            self.programming = on;
        }
    }

    fn dial(low: u8, high: u8) -> Reading {
        DigitPair::new(
            Digit::try_from(low).unwrap(),
            Digit::try_from(high).unwrap(),
        )
    }

    fn sampled(reading: Reading) -> LoopEvents {
        LoopEvents {
            reading,
            reading_updated: true,
            press: false,
        }
    }

    fn pressed(reading: Reading) -> LoopEvents {
        LoopEvents {
            reading,
            reading_updated: false,
            press: true,
        }
    }

    #[test]
    fn test_default_cipher_locked() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();
        lock.init(&mut leds);

        lock.handle(sampled(dial(0, 0)), &mut leds);

        assert_eq!(lock.lock_status(), LockStatus::Locked);
        assert!(!leds.unlocked);
        assert!(!leds.programming);
    }

    #[test]
    fn test_matching_reading_unlocks() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();

        lock.handle(sampled(dial(3, 0)), &mut leds);
        assert_eq!(lock.lock_status(), LockStatus::Unlocked);
        assert!(leds.unlocked);

        lock.handle(sampled(dial(3, 1)), &mut leds);
        assert_eq!(lock.lock_status(), LockStatus::Locked);
        assert!(!leds.unlocked);
    }

    #[test]
    fn test_reprogramming() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();

        lock.handle(sampled(dial(3, 0)), &mut leds);
        lock.handle(pressed(dial(3, 0)), &mut leds);
        assert_eq!(lock.programming_state(), ProgrammingState::AwaitingConfirm);
        assert!(leds.programming);
        assert_eq!(lock.cipher(), dial(3, 0));

        // Dialing the new cipher does not lock while programming.
        lock.handle(sampled(dial(7, 2)), &mut leds);
        assert_eq!(lock.lock_status(), LockStatus::Unlocked);

        lock.handle(pressed(dial(7, 2)), &mut leds);
        assert_eq!(lock.cipher(), dial(7, 2));
        assert_eq!(lock.programming_state(), ProgrammingState::Idle);
        assert_eq!(lock.lock_status(), LockStatus::Unlocked);
        assert!(!leds.programming);
        assert!(leds.unlocked);

        lock.handle(sampled(dial(3, 0)), &mut leds);
        assert_eq!(lock.lock_status(), LockStatus::Locked);
    }

    #[test]
    fn test_press_while_locked_discarded() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();

        lock.handle(sampled(dial(1, 1)), &mut leds);
        lock.handle(pressed(dial(1, 1)), &mut leds);

        assert_eq!(lock.programming_state(), ProgrammingState::Idle);
        assert_eq!(lock.cipher(), DigitPair::DEFAULT_CIPHER);
        assert!(!leds.programming);
    }

    #[test]
    fn test_reading_handled_before_press() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();

        // The matching reading and the press land in the same iteration.
        lock.handle(
            LoopEvents {
                reading: dial(3, 0),
                reading_updated: true,
                press: true,
            },
            &mut leds,
        );

        assert_eq!(lock.lock_status(), LockStatus::Unlocked);
        assert_eq!(lock.programming_state(), ProgrammingState::AwaitingConfirm);
    }

    #[test]
    fn test_stale_reading_not_evaluated() {
        let mut lock = LockController::default();
        let mut leds = Leds::default();

        lock.handle(sampled(dial(0, 0)), &mut leds);
        lock.handle(
            LoopEvents {
                reading: dial(3, 0),
                reading_updated: false,
                press: false,
            },
            &mut leds,
        );

        assert_eq!(lock.lock_status(), LockStatus::Locked);
    }
}
