mod interrupts;
mod pins;

use arduino_hal::{
    hal::port::Dynamic,
    pac::TC0,
    port::{Pin, mode::Output},
};
use avr_device::interrupt;
pub use pins::{HighSelectPin, LowSelectPin};
use shared::{DISPLAY_REFRESH_US, Digit, DisplayMultiplexer, Panel, ports::DisplayPanel};

use crate::{interrupt_cell::InterruptCell, shared_state::SHARED_STATE, timer};

/// Display context that gets setup prior to enabling interrupts and is used exclusively from the
/// `TIMER0_COMPA` interrupt.
static DISPLAY_CTX: InterruptCell<DisplayContext> = InterruptCell::uninit();

/// Timer comparison value formula: 16 MHz / (256 * (1 + 124)) = 500 Hz
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
const REFRESH_COMPARE: u8 = timer::compare_value(256, DISPLAY_REFRESH_US as u64) as u8;

/// Segments lit for every digit, bit 0 is segment `a` through bit 6 for segment `g`.
const SEGMENT_PATTERNS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

/// Sets up `TIMER0_COMPA` to trigger every [`DISPLAY_REFRESH_US`] and constructs the
/// [`InterruptCell`] used exclusively within it.
pub fn setup_display(timer: &TC0, panels: SevenSegmentPanels) {
    // CTC on OCR0A
    timer.tccr0a.write(|w| w.wgm0().bits(0b10));
    timer.tccr0b.write(|w| w.cs0().prescale_256());
    timer.ocr0a.write(|w| w.bits(REFRESH_COMPARE));

    // Enable the timer interrupt
    timer.timsk0.write(|w| w.ocie0a().set_bit());

    DISPLAY_CTX.init(DisplayContext {
        panels,
        multiplexer: DisplayMultiplexer::new(),
    });
}

/// Two common cathode seven segment digits sharing their segment lines.
#[allow(missing_debug_implementations)]
pub struct SevenSegmentPanels {
    /// Segments `a` through `g`.
    segments: [Pin<Output, Dynamic>; 7],
    high_select: Pin<Output, HighSelectPin>,
    low_select: Pin<Output, LowSelectPin>,
}

impl SevenSegmentPanels {
    /// Both panels start disabled.
    #[inline]
    pub fn new(
        segments: [Pin<Output, Dynamic>; 7],
        mut high_select: Pin<Output, HighSelectPin>,
        mut low_select: Pin<Output, LowSelectPin>,
    ) -> Self {
        high_select.set_high();
        low_select.set_high();

        Self {
            segments,
            high_select,
            low_select,
        }
    }
}

impl DisplayPanel for SevenSegmentPanels {
    /// Cathodes are sinked through the select pins, so a low pin enables its panel.
    fn select_panel(&mut self, panel: Panel) {
        match panel {
            Panel::High => {
                self.low_select.set_high();
                self.high_select.set_low();
            }
            Panel::Low => {
                self.high_select.set_high();
                self.low_select.set_low();
            }
        }
    }

    fn write_digit(&mut self, digit: Digit) {
        let pattern = SEGMENT_PATTERNS[usize::from(u8::from(digit))];

        for (index, segment) in self.segments.iter_mut().enumerate() {
            if pattern & (1 << index) == 0 {
                segment.set_low();
            } else {
                segment.set_high();
            }
        }
    }
}

/// Contains components used exclusively in the `TIMER0_COMPA` interrupt.
struct DisplayContext {
    panels: SevenSegmentPanels,
    multiplexer: DisplayMultiplexer,
}

impl DisplayContext {
    /// Drives the next panel with the latest reading. Meant to be ran once per refresh period.
    #[inline]
    fn refresh(&mut self) {
        let reading = interrupt::free(|cs| SHARED_STATE.borrow(cs).borrow().reading());
        self.multiplexer.refresh(reading, &mut self.panels);
    }
}
