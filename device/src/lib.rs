#![no_std]
#![feature(abi_avr_interrupt)]

pub mod button;
pub mod display;
pub mod indicator;
mod interrupt_cell;
pub mod sampler;
pub mod shared_state;
mod timer;
