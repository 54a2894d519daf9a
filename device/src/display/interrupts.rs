use avr_device::interrupt;

use crate::display::DISPLAY_CTX;

#[interrupt(atmega32u4)]
fn TIMER0_COMPA() {
    DISPLAY_CTX.as_inner_mut().refresh();
}
