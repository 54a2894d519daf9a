//! Dial lock firmware.
//!
//! The code was developed for an Arduino Leonardo / Pro Micro with an ATmega32u4 running at 5V.
//! Hardware components used:
//! - TIMER0: display refresh
//! - TIMER1: dial sampling period
//! - TIMER3: button debounce window
//! - ADC: A0 (low dial), A1 (high dial)
//! - INT0: button on D3
//! - Pins: D4-D10 (segments a-g), D11, D12 (panel select), D13, A2 (status LEDs)

#![no_std]
#![no_main]

use arduino_hal::{Pins, hal::Wdt};
use avr_device::{asm::sleep, interrupt};
use device::{
    button::setup_button,
    display::{SevenSegmentPanels, setup_display},
    indicator::Indicators,
    sampler::setup_sampler,
    shared_state::SHARED_STATE,
};
use panic_halt as _;
use shared::LockController;

#[arduino_hal::entry]
fn main() -> ! {
    let peripherals = arduino_hal::Peripherals::take().unwrap();
    // Disable the analog comparator
    peripherals.AC.acsr.write(|w| w.acd().set_bit());
    // Disable the on-chip debug system
    peripherals.CPU.mcucr.write(|w| w.jtd().set_bit());
    // Disable TWI and SPI
    peripherals.TWI.twcr.write(|w| w.twen().clear_bit());
    peripherals.SPI.spcr.write(|w| w.spe().clear_bit());
    peripherals.CPU.prr0.write(|w| w.prtwi().set_bit().prspi().set_bit());
    // Disable USART, USB and the unused TIMER4
    peripherals.USART1.ucsr1b.write(|w| w.rxen1().clear_bit().txen1().clear_bit());
    peripherals.CPU.prr1.write(|w| w.prusart1().set_bit().prtim4().set_bit().prusb().set_bit());
    // Idle sleep mode, any interrupt wakes the main loop up
    peripherals.CPU.smcr.write(|w| w.se().set_bit());

    // The bootloader may leave the watchdog running; nothing here would feed it.
    let mut watchdog = Wdt::new(peripherals.WDT, &peripherals.CPU.mcusr);
    watchdog.stop();

    let Pins {
        a0: low_dial_pin,
        a1: high_dial_pin,
        a2: programming_led_pin,
        d3: button_pin,
        d4: segment_a_pin,
        d5: segment_b_pin,
        d6: segment_c_pin,
        d7: segment_d_pin,
        d8: segment_e_pin,
        d9: segment_f_pin,
        d10: segment_g_pin,
        d11: high_select_pin,
        d12: low_select_pin,
        d13: unlocked_led_pin,
        ..
    } = arduino_hal::pins!(peripherals);

    let mut indicators = Indicators::new(
        unlocked_led_pin.into_output(),
        programming_led_pin.into_output(),
    );

    let panels = SevenSegmentPanels::new(
        [
            segment_a_pin.into_output().downgrade(),
            segment_b_pin.into_output().downgrade(),
            segment_c_pin.into_output().downgrade(),
            segment_d_pin.into_output().downgrade(),
            segment_e_pin.into_output().downgrade(),
            segment_f_pin.into_output().downgrade(),
            segment_g_pin.into_output().downgrade(),
        ],
        high_select_pin.into_output(),
        low_select_pin.into_output(),
    );

    setup_display(&peripherals.TC0, panels);
    setup_button(
        peripherals.EXINT,
        peripherals.TC3,
        button_pin.into_pull_up_input(),
    );
    let mut adc = arduino_hal::Adc::new(peripherals.ADC, Default::default());
    let low_dial = low_dial_pin.into_analog_input(&mut adc);
    let high_dial = high_dial_pin.into_analog_input(&mut adc);
    setup_sampler(adc, low_dial, high_dial, peripherals.TC1);

    let mut lock = LockController::default();
    lock.init(&mut indicators);

    // Enable interrupts globally.
    unsafe { interrupt::enable() };

    loop {
        // Take whatever the interrupts produced.
        //
        // NOTE: We try to keep the critical section as short as possible here and drive the
        //       indicators afterwards.
        let events = interrupt::free(|cs| SHARED_STATE.borrow(cs).borrow_mut().take_events());

        if events.is_idle() {
            // The display refresh wakes us up at least every couple of milliseconds.
            sleep();
            continue;
        }

        lock.handle(events, &mut indicators);
    }
}
