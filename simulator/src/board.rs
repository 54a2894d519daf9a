use circular_buffer::CircularBuffer;
use shared::{
    Channel, Digit, DigitPair, Panel, Reading,
    ports::{AnalogInput, ButtonInput, DisplayPanel, Edge, IndicatorOutput, Level},
};

/// Resolution of the virtual analog converter.
pub const SAMPLE_BITS: u32 = 12;

/// Number of panel writes kept around for inspection.
const TRACE_LEN: usize = 64;

/// A single digit rendered on a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelWrite {
    pub at_ms: u32,
    pub panel: Panel,
    pub digit: Digit,
}

/// In-memory stand-in for the lock hardware.
///
/// Dials are modeled as ideal voltage dividers that always sample in the middle of their digit's
/// bucket. The button is active low and starts released.
#[derive(Debug)]
pub struct VirtualBoard {
    now_ms: u32,
    dials: Reading,
    level: Level,
    edge_detection: bool,
    sampling_period_ms: Option<u16>,
    conversion: Option<Channel>,
    selected: Option<Panel>,
    trace: CircularBuffer<TRACE_LEN, PanelWrite>,
    unlocked: bool,
    programming: bool,
}

impl Default for VirtualBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualBoard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            dials: DigitPair::new(Digit::Zero, Digit::Zero),
            level: Level::Released,
            edge_detection: false,
            sampling_period_ms: None,
            conversion: None,
            selected: None,
            trace: CircularBuffer::new(),
            unlocked: false,
            programming: false,
        }
    }

    pub fn set_now(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    pub fn turn_dials(&mut self, reading: Reading) {
        tracing::debug!(at_ms = self.now_ms, ?reading, "dials turned");
        self.dials = reading;
    }

    /// Drives the button pin, returning the edge an enabled edge interrupt would see.
    pub fn drive_button(&mut self, level: Level) -> Option<Edge> {
        let edge = match (self.level, level) {
            (Level::Released, Level::Asserted) => Edge::Falling,
            (Level::Asserted, Level::Released) => Edge::Rising,
            _ => return None,
        };

        self.level = level;
        self.edge_detection.then_some(edge)
    }

    /// Whether a sampling cycle is due at the current time.
    #[must_use]
    pub fn sampling_due(&self) -> bool {
        self.sampling_period_ms
            .is_some_and(|period| self.now_ms % u32::from(period) == 0)
    }

    /// Finishes the conversion in flight, if any, returning the raw sample.
    pub fn finish_conversion(&mut self) -> Option<u16> {
        self.conversion
            .take()
            .map(|channel| Self::raw_sample(self.dials.get(channel)))
    }

    /// Raw converter output for a dial pointing at `digit`, in the middle of the digit's bucket.
    #[must_use]
    pub fn raw_sample(digit: Digit) -> u16 {
        let nibble = (u16::from(u8::from(digit)) * 15).div_ceil(9);
        (nibble << (SAMPLE_BITS - 4)) | (1 << (SAMPLE_BITS - 5))
    }

    #[must_use]
    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub fn programming(&self) -> bool {
        self.programming
    }

    /// Most recent panel writes, oldest first.
    pub fn trace(&self) -> impl Iterator<Item = &PanelWrite> {
        self.trace.iter()
    }

    /// The last digit written to `panel`.
    #[must_use]
    pub fn shown(&self, panel: Panel) -> Option<Digit> {
        self.trace
            .iter()
            .rev()
            .find(|write| write.panel == panel)
            .map(|write| write.digit)
    }

    /// Checks that the panels strictly alternate in the trace and that every write follows the
    /// previous one within `max_gap_ms`.
    #[must_use]
    pub fn panels_alternate(&self, max_gap_ms: u32) -> bool {
        self.trace
            .iter()
            .zip(self.trace.iter().skip(1))
            .all(|(prev, next)| {
                prev.panel != next.panel && next.at_ms.saturating_sub(prev.at_ms) <= max_gap_ms
            })
    }
}

impl AnalogInput for VirtualBoard {
    fn start_periodic_sampling(&mut self, period_ms: u16) {
        self.sampling_period_ms = Some(period_ms.max(1));
    }

    fn convert(&mut self, channel: Channel) {
        self.conversion = Some(channel);
    }
}

impl ButtonInput for VirtualBoard {
    fn read_level(&self) -> Level {
        self.level
    }

    fn set_edge_detection(&mut self, enabled: bool) {
        self.edge_detection = enabled;
    }
}

impl DisplayPanel for VirtualBoard {
    fn select_panel(&mut self, panel: Panel) {
        self.selected = Some(panel);
    }

    fn write_digit(&mut self, digit: Digit) {
        let Some(panel) = self.selected else {
            tracing::warn!(at_ms = self.now_ms, "digit written with no panel selected");
            return;
        };

        self.trace.push_back(PanelWrite {
            at_ms: self.now_ms,
            panel,
            digit,
        });
    }
}

impl IndicatorOutput for VirtualBoard {
    fn set_unlocked(&mut self, on: bool) {
        if self.unlocked != on {
            tracing::info!(at_ms = self.now_ms, on, "unlocked indicator");
        }

        self.unlocked = on;
    }

    fn set_programming(&mut self, on: bool) {
        if self.programming != on {
            tracing::info!(at_ms = self.now_ms, on, "programming indicator");
        }

        self.programming = on;
    }
}

#[cfg(test)]
mod tests {
    use shared::{
        Channel, Digit, DigitPair, Panel,
        ports::{AnalogInput, ButtonInput, DisplayPanel, Edge, Level},
    };

    use super::{SAMPLE_BITS, VirtualBoard};

    #[test]
    fn test_raw_samples_land_on_their_digit() {
        for digit in (0..=9).map(|d| Digit::try_from(d).unwrap()) {
            let raw = VirtualBoard::raw_sample(digit);
            assert_eq!(Digit::from_sample::<SAMPLE_BITS>(raw), digit);
        }
    }

    #[test]
    fn test_conversion_reads_requested_dial() {
        let mut board = VirtualBoard::new();
        board.turn_dials(DigitPair::new(Digit::Seven, Digit::Two));
        assert_eq!(board.finish_conversion(), None);

        board.convert(Channel::High);
        let raw = board.finish_conversion().unwrap();
        assert_eq!(Digit::from_sample::<SAMPLE_BITS>(raw), Digit::Two);
        assert_eq!(board.finish_conversion(), None);
    }

    #[test]
    fn test_edges_only_seen_when_enabled() {
        let mut board = VirtualBoard::new();
        assert_eq!(board.drive_button(Level::Asserted), None);
        assert_eq!(board.read_level(), Level::Asserted);

        board.set_edge_detection(true);
        assert_eq!(board.drive_button(Level::Asserted), None);
        assert_eq!(board.drive_button(Level::Released), Some(Edge::Rising));
        assert_eq!(board.drive_button(Level::Asserted), Some(Edge::Falling));
    }

    #[test]
    fn test_trace_alternation() {
        let mut board = VirtualBoard::new();

        for (at_ms, panel) in [(0, Panel::High), (2, Panel::Low), (4, Panel::High)] {
            board.set_now(at_ms);
            board.select_panel(panel);
            board.write_digit(Digit::One);
        }

        assert!(board.panels_alternate(2));
        assert!(!board.panels_alternate(1));
        assert_eq!(board.shown(Panel::High), Some(Digit::One));

        board.set_now(5);
        board.write_digit(Digit::Two);
        assert!(!board.panels_alternate(2));
    }
}
