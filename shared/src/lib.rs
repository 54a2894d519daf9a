#![no_std]

/// Emits a `tracing` event for a state transition when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
macro_rules! transition {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! transition {
    ($($arg:tt)*) => {};
}

mod debounce;
mod digit;
mod digit_pair;
mod display;
mod lock;
pub mod ports;
mod sampler;
mod shared_state;

pub use debounce::{ButtonPress, DebounceGuard, DebounceState, GuardAction};
pub use digit::{Digit, DigitConvError};
pub use digit_pair::{Channel, Cipher, DigitPair, Reading};
pub use display::{DisplayMultiplexer, Panel};
pub use lock::{LockController, LockStatus, ProgrammingState};
pub use sampler::AnalogSampler;
pub use shared_state::{LoopEvents, SharedState};

/// Time between two sampling cycles of the dials.
pub const SAMPLE_PERIOD_MS: u16 = 500;
/// Length of the window a button press must survive to be registered.
pub const DEBOUNCE_WINDOW_MS: u16 = 10;
/// Time each display panel stays lit before the other one takes over.
pub const DISPLAY_REFRESH_US: u16 = 2000;
