mod interrupts;
mod pins;

use arduino_hal::{
    Adc,
    pac::{ADC, TC1},
    port::{Pin, mode::Analog},
};
use avr_device::interrupt;
pub use pins::{HighDialPin, LowDialPin};
use shared::{AnalogSampler, Channel, SAMPLE_PERIOD_MS, ports::AnalogInput};

use crate::{interrupt_cell::InterruptCell, shared_state::SHARED_STATE, timer};

/// Resolution of the on-chip converter.
const ADC_RESOLUTION_BITS: u32 = 10;

/// Sampler context that gets setup prior to enabling interrupts and is used exclusively from the
/// `TIMER1_COMPA` and `ADC` interrupts.
static SAMPLER_CTX: InterruptCell<SamplerContext> = InterruptCell::uninit();

/// Sets up `TIMER1_COMPA` to trigger a sampling cycle of both dials every [`SAMPLE_PERIOD_MS`] and
/// enables the conversion complete interrupt, then constructs the [`InterruptCell`] used within
/// the interrupts.
pub fn setup_sampler(
    adc: Adc,
    low_dial: Pin<Analog, LowDialPin>,
    high_dial: Pin<Analog, HighDialPin>,
    timer: TC1,
) {
    // The HAL driver only polls, so the interrupt gets enabled on top of its configuration.
    //
    // SAFETY: `adc` owns the peripheral and `ADIE` is left alone by the driver.
    unsafe { (*ADC::ptr()).adcsra.modify(|_, w| w.adie().set_bit()) };

    let mut converter = Converter {
        adc,
        low_dial,
        high_dial,
        timer,
        in_flight: None,
    };
    converter.start_periodic_sampling(SAMPLE_PERIOD_MS);

    SAMPLER_CTX.init(SamplerContext {
        converter,
        sampler: AnalogSampler::new(),
    });
}

/// The converter, both dial inputs and the timer pacing them.
struct Converter {
    adc: Adc,
    low_dial: Pin<Analog, LowDialPin>,
    high_dial: Pin<Analog, HighDialPin>,
    timer: TC1,
    in_flight: Option<Channel>,
}

impl Converter {
    /// Collects the result of the conversion in flight, if it is done.
    #[inline]
    fn finish(&mut self) -> Option<u16> {
        let raw = match self.in_flight? {
            Channel::Low => self.adc.read_nonblocking(&self.low_dial).ok()?,
            Channel::High => self.adc.read_nonblocking(&self.high_dial).ok()?,
        };

        self.in_flight = None;
        Some(raw)
    }
}

impl AnalogInput for Converter {
    /// Timer comparison value formula: 16 MHz / (256 * (1 + 31249)) = 2 Hz
    fn start_periodic_sampling(&mut self, period_ms: u16) {
        const PRESCALER: u64 = 256;

        // CTC on OCR1A
        self.timer.tccr1a.reset();
        self.timer
            .tccr1b
            .write(|w| w.wgm1().bits(0b01).cs1().prescale_256());

        let compare = timer::compare_value(PRESCALER, u64::from(period_ms) * 1000);
        self.timer.ocr1a.write(|w| w.bits(compare));

        // Enable the timer interrupt
        self.timer.timsk1.write(|w| w.ocie1a().set_bit());
    }

    /// Selects the channel and starts the conversion. The first non-blocking read of an idle
    /// converter never yields a sample.
    fn convert(&mut self, channel: Channel) {
        let started = match channel {
            Channel::Low => self.adc.read_nonblocking(&self.low_dial),
            Channel::High => self.adc.read_nonblocking(&self.high_dial),
        };

        if started.is_err() {
            self.in_flight = Some(channel);
        }
    }
}

/// Contains components used exclusively in the `TIMER1_COMPA` and `ADC` interrupts.
struct SamplerContext {
    converter: Converter,
    sampler: AnalogSampler<ADC_RESOLUTION_BITS>,
}

impl SamplerContext {
    /// Starts converting the first channel. Meant to be ran once per sampling period.
    #[inline]
    fn begin_cycle(&mut self) {
        let channel = self.sampler.begin_cycle();
        self.converter.convert(channel);
    }

    /// Hands the finished conversion to the shared state and starts the next one, if any.
    #[inline]
    fn conversion_complete(&mut self) {
        let Some(raw) = self.converter.finish() else {
            return;
        };

        let next = interrupt::free(|cs| {
            let shared_state = &mut *SHARED_STATE.borrow(cs).borrow_mut();
            self.sampler.complete(raw, shared_state)
        });

        if let Some(channel) = next {
            self.converter.convert(channel);
        }
    }
}
