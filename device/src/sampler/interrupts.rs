use avr_device::interrupt;

use crate::sampler::SAMPLER_CTX;

#[interrupt(atmega32u4)]
fn TIMER1_COMPA() {
    SAMPLER_CTX.as_inner_mut().begin_cycle();
}

#[interrupt(atmega32u4)]
fn ADC() {
    SAMPLER_CTX.as_inner_mut().conversion_complete();
}
