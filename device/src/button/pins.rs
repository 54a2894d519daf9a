use arduino_hal::hal::port::PD0;

/// `D3` on the Leonardo pinout, the only pin wired to `INT0`.
pub type ButtonPin = PD0;
