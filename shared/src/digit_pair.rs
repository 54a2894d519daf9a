use core::fmt;

use crate::Digit;

/// The accepted unlock code.
pub type Cipher = DigitPair;

/// The code currently selected on the dials.
pub type Reading = DigitPair;

/// An ordered pair of digits, one per dial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitPair {
    low: Digit,
    high: Digit,
}

impl DigitPair {
    /// Cipher the lock boots with. Reprogrammed ciphers do not survive a power cycle.
    pub const DEFAULT_CIPHER: Self = Self::new(Digit::Three, Digit::Zero);

    #[must_use]
    pub const fn new(low: Digit, high: Digit) -> Self {
        Self { low, high }
    }

    #[inline]
    #[must_use]
    pub fn low(&self) -> Digit {
        self.low
    }

    #[inline]
    #[must_use]
    pub fn high(&self) -> Digit {
        self.high
    }

    /// Returns the digit fed by the given analog channel.
    #[inline]
    #[must_use]
    pub fn get(&self, channel: Channel) -> Digit {
        match channel {
            Channel::Low => self.low,
            Channel::High => self.high,
        }
    }
}

/// Formats the pair the way the display shows it, high digit first.
impl fmt::Display for DigitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", u8::from(self.high), u8::from(self.low))
    }
}

/// Analog input channels, one per dial, in conversion order.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum Channel {
    /// Channel 0, feeds the low digit.
    Low,
    /// Channel 1, feeds the high digit.
    High,
}

impl Channel {
    /// The channel converted after this one within a sampling cycle, if any.
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Low => Some(Self::High),
            Self::High => None,
        }
    }
}
