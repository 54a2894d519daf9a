use thiserror::Error as ThisError;

/// A single decimal digit, as shown on one display panel and selected by one dial.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum Digit {
    #[default]
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl Digit {
    /// Width of the slice of the raw sample that selects the digit.
    const NIBBLE_BITS: u32 = 4;
    const NIBBLE_MAX: u16 = 0x0F;

    /// Scales a raw `BITS` wide analog sample to a digit.
    ///
    /// Only the most significant nibble of the sample is used and it is mapped linearly from
    /// `0..=15` onto `0..=9`. For a 12 bit converter this is `(raw >> 8) * 9 / 15`.
    ///
    /// Samples wider than `BITS` are clamped to the top of the range instead of wrapping, so any
    /// input yields a valid digit. Converters wider than 16 bits never fill the top nibble of a
    /// `u16` and always read as zero.
    #[must_use]
    pub fn from_sample<const BITS: u32>(raw: u16) -> Self {
        let nibble = raw
            .checked_shr(BITS.saturating_sub(Self::NIBBLE_BITS))
            .unwrap_or(0)
            .min(Self::NIBBLE_MAX);
        // `nibble` is at most 15, so the product fits and the quotient is at most 9.
        #[allow(clippy::cast_possible_truncation)]
        let scaled = (nibble * 9 / 15) as u8;
        Self::try_from(scaled).unwrap_or(Self::Nine)
    }
}

impl From<Digit> for u8 {
    fn from(value: Digit) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for Digit {
    type Error = DigitConvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Digit::Zero),
            1 => Ok(Digit::One),
            2 => Ok(Digit::Two),
            3 => Ok(Digit::Three),
            4 => Ok(Digit::Four),
            5 => Ok(Digit::Five),
            6 => Ok(Digit::Six),
            7 => Ok(Digit::Seven),
            8 => Ok(Digit::Eight),
            9 => Ok(Digit::Nine),
            _ => Err(DigitConvError(value)),
        }
    }
}

#[derive(Clone, Copy, Debug, ThisError)]
#[cfg_attr(test, derive(PartialEq))]
#[error("{0} is not a decimal digit")]
pub struct DigitConvError(u8);
