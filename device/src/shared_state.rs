use core::cell::RefCell;

use avr_device::interrupt::Mutex;
use shared::SharedState;

/// Dial readings and press events handed from the interrupts to the main loop.
pub static SHARED_STATE: Mutex<RefCell<SharedState>> = Mutex::new(RefCell::new(SharedState::new()));
