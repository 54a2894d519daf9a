use avr_device::interrupt;

use crate::button::BUTTON_CTX;

#[interrupt(atmega32u4)]
fn INT0() {
    BUTTON_CTX.as_inner_mut().edge();
}

#[interrupt(atmega32u4)]
fn TIMER3_COMPA() {
    BUTTON_CTX.as_inner_mut().window_expired();
}
