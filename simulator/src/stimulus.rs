use std::{num::ParseIntError, str::FromStr};

use shared::{DEBOUNCE_WINDOW_MS, Digit, DigitConvError, DigitPair, Reading};
use thiserror::Error as ThisError;

/// Scripted input applied to the virtual board.
#[derive(Clone, Debug, Default)]
pub struct Stimulus {
    pub dial_moves: Vec<DialMove>,
    pub presses: Vec<Press>,
}

impl Stimulus {
    #[must_use]
    pub fn dial(mut self, at_ms: u32, reading: Reading) -> Self {
        self.dial_moves.push(DialMove { at_ms, reading });
        self
    }

    #[must_use]
    pub fn press(mut self, press: Press) -> Self {
        self.presses.push(press);
        self
    }

    pub fn extend(&mut self, dial_moves: &[DialMove], presses: &[Press]) {
        self.dial_moves.extend_from_slice(dial_moves);
        self.presses.extend_from_slice(presses);
    }

    /// Whether nothing is scripted at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dial_moves.is_empty() && self.presses.is_empty()
    }
}

/// Both dials turned to `reading` at `at_ms`.
///
/// Parsed from `<ms>=<high><low>`, the digits in the order the display shows them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialMove {
    pub at_ms: u32,
    pub reading: Reading,
}

impl FromStr for DialMove {
    type Err = StimulusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at_ms, digits) = s
            .split_once('=')
            .ok_or_else(|| StimulusParseError::Format(s.to_owned()))?;

        let &[high, low] = digits.as_bytes() else {
            return Err(StimulusParseError::Format(s.to_owned()));
        };

        let digit = |c: u8| {
            c.checked_sub(b'0')
                .ok_or(StimulusParseError::Format(s.to_owned()))
                .and_then(|d| Digit::try_from(d).map_err(StimulusParseError::from))
        };

        Ok(Self {
            at_ms: at_ms.trim().parse()?,
            reading: DigitPair::new(digit(low)?, digit(high)?),
        })
    }
}

/// A physical button press starting at `at_ms`, held for `hold_ms`.
///
/// Both the press and the release bounce `bounces` times, one millisecond apart. Bouncing is
/// capped at [`Press::MAX_BOUNCES`] so that it settles within the debounce window.
///
/// Parsed from `<ms>[+<hold ms>][~<bounces>]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Press {
    pub at_ms: u32,
    pub hold_ms: u32,
    pub bounces: u8,
}

impl Press {
    pub const DEFAULT_HOLD_MS: u32 = 100;
    /// Every bounce takes two milliseconds to return to the settled level.
    #[allow(clippy::cast_possible_truncation)]
    pub const MAX_BOUNCES: u8 = (DEBOUNCE_WINDOW_MS / 2) as u8;

    #[must_use]
    pub fn at(at_ms: u32) -> Self {
        Self {
            at_ms,
            hold_ms: Self::DEFAULT_HOLD_MS,
            bounces: 0,
        }
    }

    #[must_use]
    pub fn bouncing(mut self, bounces: u8) -> Self {
        self.bounces = bounces;
        self
    }
}

impl FromStr for Press {
    type Err = StimulusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, bounces) = match s.split_once('~') {
            Some((rest, bounces)) => (rest, bounces.trim().parse()?),
            None => (s, 0),
        };

        if bounces > Self::MAX_BOUNCES {
            return Err(StimulusParseError::Bounces(bounces));
        }

        let (at_ms, hold_ms) = match rest.split_once('+') {
            Some((at_ms, hold_ms)) => (at_ms, hold_ms.trim().parse()?),
            None => (rest, Self::DEFAULT_HOLD_MS),
        };

        Ok(Self {
            at_ms: at_ms.trim().parse()?,
            hold_ms,
            bounces,
        })
    }
}

#[derive(Debug, ThisError)]
pub enum StimulusParseError {
    #[error("malformed stimulus `{0}`")]
    Format(String),
    #[error("invalid number: {0}")]
    Number(#[from] ParseIntError),
    #[error("{0} bounces outlast the debounce window, at most {max} fit", max = Press::MAX_BOUNCES)]
    Bounces(u8),
    #[error(transparent)]
    Digit(#[from] DigitConvError),
}
