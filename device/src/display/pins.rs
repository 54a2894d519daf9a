use arduino_hal::hal::port::{PB7, PD6};

/// `D11`, cathode of the high digit panel.
pub type HighSelectPin = PB7;
/// `D12`, cathode of the low digit panel.
pub type LowSelectPin = PD6;
