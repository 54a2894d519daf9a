use std::collections::BTreeMap;

use shared::{
    AnalogSampler, Cipher, DEBOUNCE_WINDOW_MS, DISPLAY_REFRESH_US, DebounceGuard,
    DisplayMultiplexer, GuardAction, LockController, LockStatus, ProgrammingState, Reading,
    SAMPLE_PERIOD_MS, SharedState,
    ports::{AnalogInput, ButtonInput, Edge, Level},
};

use crate::{
    board::{SAMPLE_BITS, VirtualBoard},
    stimulus::{Press, Stimulus},
};

/// Milliseconds between two display refreshes.
#[allow(clippy::cast_lossless)]
pub const DISPLAY_REFRESH_MS: u32 = DISPLAY_REFRESH_US as u32 / 1000;

/// Snapshot of the lock at the end of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub at_ms: u32,
    pub cipher: Cipher,
    pub reading: Reading,
    pub lock_status: LockStatus,
    pub programming_state: ProgrammingState,
    pub unlocked_led: bool,
    pub programming_led: bool,
    /// Presses that survived debouncing.
    pub presses: u32,
}

/// Runs the lock logic against a [`VirtualBoard`] on a one millisecond clock.
///
/// Every tick goes through the same order the firmware's interrupts would fire in: stimulus,
/// button edge, debounce window expiry, analog conversions, display refresh and finally a single
/// main loop iteration.
#[derive(Debug)]
pub struct Simulation {
    now_ms: u32,
    board: VirtualBoard,
    state: SharedState,
    sampler: AnalogSampler<SAMPLE_BITS>,
    guard: DebounceGuard,
    window_expires_at: Option<u32>,
    multiplexer: DisplayMultiplexer,
    lock: LockController,
    dial_moves: BTreeMap<u32, Reading>,
    button_levels: BTreeMap<u32, Level>,
    presses: u32,
}

impl Simulation {
    #[must_use]
    pub fn new(stimulus: &Stimulus) -> Self {
        Self::with_lock(stimulus, LockController::default())
    }

    #[must_use]
    pub fn with_lock(stimulus: &Stimulus, lock: LockController) -> Self {
        let mut board = VirtualBoard::new();
        board.start_periodic_sampling(SAMPLE_PERIOD_MS);
        board.set_edge_detection(true);
        lock.init(&mut board);

        let dial_moves = stimulus
            .dial_moves
            .iter()
            .map(|dial_move| (dial_move.at_ms, dial_move.reading))
            .collect();

        let mut button_levels = BTreeMap::new();
        for press in &stimulus.presses {
            button_levels.extend(waveform(press));
        }

        Self {
            now_ms: 0,
            board,
            state: SharedState::new(),
            sampler: AnalogSampler::new(),
            guard: DebounceGuard::new(),
            window_expires_at: None,
            multiplexer: DisplayMultiplexer::new(),
            lock,
            dial_moves,
            button_levels,
            presses: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &VirtualBoard {
        &self.board
    }

    #[must_use]
    pub fn lock(&self) -> &LockController {
        &self.lock
    }

    /// Advances the clock by `duration_ms` ticks.
    pub fn run_for(&mut self, duration_ms: u32) {
        for _ in 0..duration_ms {
            self.tick();
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome {
            at_ms: self.now_ms,
            cipher: self.lock.cipher(),
            reading: self.lock.reading(),
            lock_status: self.lock.lock_status(),
            programming_state: self.lock.programming_state(),
            unlocked_led: self.board.unlocked(),
            programming_led: self.board.programming(),
            presses: self.presses,
        }
    }

    fn tick(&mut self) {
        let now = self.now_ms;
        self.board.set_now(now);

        if let Some(reading) = self.dial_moves.remove(&now) {
            self.board.turn_dials(reading);
        }

        if let Some(level) = self.button_levels.remove(&now) {
            // The edge interrupt only triggers on falling edges.
            if self.board.drive_button(level) == Some(Edge::Falling)
                && self.guard.on_edge(Edge::Falling) == GuardAction::StartWindow
            {
                self.board.set_edge_detection(false);
                self.window_expires_at = Some(now + u32::from(DEBOUNCE_WINDOW_MS));
            }
        }

        if self.window_expires_at == Some(now) {
            self.window_expires_at = None;

            if self.guard.on_expiry(self.board.read_level()).is_some() {
                self.presses += 1;
                tracing::debug!(at_ms = now, "press confirmed");
                self.state.raise_press();
            }

            self.board.set_edge_detection(true);
        }

        // A conversion started on the previous tick completes before a new cycle may start.
        if let Some(raw) = self.board.finish_conversion() {
            if let Some(next) = self.sampler.complete(raw, &mut self.state) {
                self.board.convert(next);
            }
        }

        if self.board.sampling_due() {
            let channel = self.sampler.begin_cycle();
            self.board.convert(channel);
        }

        if now % DISPLAY_REFRESH_MS == 0 {
            self.multiplexer.refresh(self.state.reading(), &mut self.board);
        }

        let events = self.state.take_events();
        if !events.is_idle() {
            self.lock.handle(events, &mut self.board);
        }

        self.now_ms += 1;
    }
}

/// Button levels over time for a press, including its contact bounce on both edges.
fn waveform(press: &Press) -> impl Iterator<Item = (u32, Level)> {
    let bounce_ms = 2 * u32::from(press.bounces.min(Press::MAX_BOUNCES));
    let pressed_at = press.at_ms;
    let released_at = pressed_at + press.hold_ms.max(bounce_ms + 1);

    let bounces = move |start: u32, settled: Level, opposite: Level| {
        (1..=bounce_ms).map(move |offset| {
            let level = if offset % 2 == 1 { opposite } else { settled };
            (start + offset, level)
        })
    };

    std::iter::once((pressed_at, Level::Asserted))
        .chain(bounces(pressed_at, Level::Asserted, Level::Released))
        .chain(std::iter::once((released_at, Level::Released)))
        .chain(bounces(released_at, Level::Released, Level::Asserted))
}
