mod interrupts;
mod pins;

use arduino_hal::{
    pac::{EXINT, TC3},
    port::{
        Pin,
        mode::{Input, PullUp},
    },
};
use avr_device::interrupt;
pub use pins::ButtonPin;
use shared::{
    DEBOUNCE_WINDOW_MS, DebounceGuard, GuardAction,
    ports::{ButtonInput, Edge, Level},
};

use crate::{interrupt_cell::InterruptCell, shared_state::SHARED_STATE, timer};

/// Button context that gets setup prior to enabling interrupts and is used exclusively from the
/// `INT0` and `TIMER3_COMPA` interrupts.
static BUTTON_CTX: InterruptCell<ButtonContext> = InterruptCell::uninit();

/// `INT0` bit in the external interrupt mask and flag registers.
const INT0_MASK: u8 = 1 << 0;

/// Timer comparison value formula: 16 MHz / (1024 * (1 + 155)) = ~100 Hz
#[allow(clippy::cast_lossless)]
const DEBOUNCE_COMPARE: u16 = timer::compare_value(1024, DEBOUNCE_WINDOW_MS as u64 * 1000);

/// Sets up `INT0` to fire on the falling edge of the button pin and `TIMER3_COMPA` as the one-shot
/// debounce timer, then constructs the [`InterruptCell`] used within the interrupts.
pub fn setup_button(exint: EXINT, timer: TC3, pin: Pin<Input<PullUp>, ButtonPin>) {
    // Falling edge
    exint.eicra.write(|w| w.isc0().bits(0b10));

    // CTC on OCR3A, left without a clock source until a window opens.
    timer.tccr3a.reset();
    timer.tccr3b.write(|w| w.wgm3().bits(0b01));
    timer.ocr3a.write(|w| w.bits(DEBOUNCE_COMPARE));
    timer.timsk3.write(|w| w.ocie3a().set_bit());

    let mut button = Button { exint, pin };
    button.set_edge_detection(true);

    BUTTON_CTX.init(ButtonContext {
        button,
        window: DebounceTimer(timer),
        guard: DebounceGuard::new(),
    });
}

/// The active low push button and its edge interrupt.
struct Button {
    exint: EXINT,
    pin: Pin<Input<PullUp>, ButtonPin>,
}

impl ButtonInput for Button {
    #[inline]
    fn read_level(&self) -> Level {
        if self.pin.is_low() {
            Level::Asserted
        } else {
            Level::Released
        }
    }

    fn set_edge_detection(&mut self, enabled: bool) {
        if enabled {
            // Drop any edge latched while the interrupt was masked.
            self.exint.eifr.write(|w| w.intf().bits(INT0_MASK));
            self.exint
                .eimsk
                .modify(|r, w| w.int().bits(r.int().bits() | INT0_MASK));
        } else {
            self.exint
                .eimsk
                .modify(|r, w| w.int().bits(r.int().bits() & !INT0_MASK));
        }
    }
}

/// `TIMER3` used as a one-shot: the clock source only gets connected while a window is open.
struct DebounceTimer(TC3);

impl DebounceTimer {
    #[inline]
    fn start(&self) {
        self.0.tcnt3.write(|w| w.bits(0));
        self.0.tccr3b.modify(|_, w| w.cs3().prescale_1024());
    }

    #[inline]
    fn stop(&self) {
        self.0.tccr3b.modify(|_, w| w.cs3().no_clock());
    }
}

/// Contains components used exclusively in the `INT0` and `TIMER3_COMPA` interrupts.
struct ButtonContext {
    button: Button,
    window: DebounceTimer,
    guard: DebounceGuard,
}

impl ButtonContext {
    /// Handles a falling edge on the button pin.
    #[inline]
    fn edge(&mut self) {
        if self.guard.on_edge(Edge::Falling) == GuardAction::StartWindow {
            self.button.set_edge_detection(false);
            self.window.start();
        }
    }

    /// Handles the end of the debounce window, flagging a press if the button is still down.
    #[inline]
    fn window_expired(&mut self) {
        self.window.stop();

        if self.guard.on_expiry(self.button.read_level()).is_some() {
            interrupt::free(|cs| SHARED_STATE.borrow(cs).borrow_mut().raise_press());
        }

        self.button.set_edge_detection(true);
    }
}
