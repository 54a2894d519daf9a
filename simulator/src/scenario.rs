use anyhow::ensure;
use clap::ValueEnum;
use shared::{Cipher, Digit, DigitPair, LockStatus, ProgrammingState};
use strum::{Display, EnumIter};

use crate::{
    AnyResult,
    simulation::Outcome,
    stimulus::{Press, Stimulus},
};

/// Bounces per edge the `bounce` scenario uses at least. Four bounces settle within the debounce
/// window.
pub const MIN_SCENARIO_BOUNCES: u8 = 4;

/// Built-in stimulus scripts with a known end state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum Scenario {
    /// Dials left at 00 against the default cipher.
    Locked,
    /// Dials turned to the default cipher.
    Unlock,
    /// Unlock, arm programming, turn the dials to 27 and confirm.
    Reprogram,
    /// Press the button while the dials show a wrong combination.
    LockedPress,
    /// Unlock, then a single press with heavy contact bounce.
    Bounce,
}

/// What a scenario must end in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expectation {
    pub cipher: Cipher,
    pub lock_status: LockStatus,
    pub programming_state: ProgrammingState,
    pub presses: u32,
}

impl Scenario {
    /// Shortest run that lets every step of the scenario play out.
    pub const DURATION_MS: u32 = 2500;

    /// Builds the stimulus, bouncing every press `bounces` times.
    #[must_use]
    pub fn stimulus(self, bounces: u8) -> Stimulus {
        let open = DigitPair::DEFAULT_CIPHER;
        let press = |at_ms| Press::at(at_ms).bouncing(bounces);

        match self {
            Self::Locked => Stimulus::default(),
            Self::Unlock => Stimulus::default().dial(100, open),
            Self::Reprogram => Stimulus::default()
                .dial(100, open)
                .press(press(700))
                .dial(1300, reprogrammed_cipher())
                .press(press(1900)),
            Self::LockedPress => Stimulus::default()
                .dial(100, DigitPair::new(Digit::One, Digit::One))
                .press(press(700)),
            Self::Bounce => Stimulus::default()
                .dial(100, open)
                .press(Press::at(700).bouncing(bounces.max(MIN_SCENARIO_BOUNCES))),
        }
    }

    #[must_use]
    pub fn expectation(self) -> Expectation {
        let (cipher, lock_status, programming_state, presses) = match self {
            Self::Locked => (
                DigitPair::DEFAULT_CIPHER,
                LockStatus::Locked,
                ProgrammingState::Idle,
                0,
            ),
            Self::Unlock => (
                DigitPair::DEFAULT_CIPHER,
                LockStatus::Unlocked,
                ProgrammingState::Idle,
                0,
            ),
            Self::Reprogram => (
                reprogrammed_cipher(),
                LockStatus::Unlocked,
                ProgrammingState::Idle,
                2,
            ),
            Self::LockedPress => (
                DigitPair::DEFAULT_CIPHER,
                LockStatus::Locked,
                ProgrammingState::Idle,
                1,
            ),
            Self::Bounce => (
                DigitPair::DEFAULT_CIPHER,
                LockStatus::Unlocked,
                ProgrammingState::AwaitingConfirm,
                1,
            ),
        };

        Expectation {
            cipher,
            lock_status,
            programming_state,
            presses,
        }
    }

    /// Fails if `outcome` does not match the scenario's expected end state.
    pub fn verify(self, outcome: &Outcome) -> AnyResult<()> {
        let expected = self.expectation();

        ensure!(
            outcome.cipher == expected.cipher,
            "{self}: cipher is {:?}, expected {:?}",
            outcome.cipher,
            expected.cipher
        );
        ensure!(
            outcome.lock_status == expected.lock_status,
            "{self}: lock is {:?}, expected {:?}",
            outcome.lock_status,
            expected.lock_status
        );
        ensure!(
            outcome.programming_state == expected.programming_state,
            "{self}: programming is {:?}, expected {:?}",
            outcome.programming_state,
            expected.programming_state
        );
        ensure!(
            outcome.presses == expected.presses,
            "{self}: {} presses registered, expected {}",
            outcome.presses,
            expected.presses
        );
        ensure!(
            outcome.unlocked_led == (outcome.lock_status == LockStatus::Unlocked),
            "{self}: unlocked indicator out of sync with the lock"
        );
        ensure!(
            outcome.programming_led
                == (outcome.programming_state == ProgrammingState::AwaitingConfirm),
            "{self}: programming indicator out of sync with the lock"
        );

        Ok(())
    }
}

fn reprogrammed_cipher() -> Cipher {
    DigitPair::new(Digit::Seven, Digit::Two)
}
