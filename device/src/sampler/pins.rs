use arduino_hal::hal::port::{PF6, PF7};

/// `A0`, converted on `ADC7`, feeds the low digit.
pub type LowDialPin = PF7;
/// `A1`, converted on `ADC6`, feeds the high digit.
pub type HighDialPin = PF6;
