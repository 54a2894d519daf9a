use arduino_hal::hal::port::{PC7, PF5};

/// `D13`, lit while the dials match the cipher.
pub type UnlockedLedPin = PC7;
/// `A2`, lit while a new cipher is being programmed.
pub type ProgrammingLedPin = PF5;
