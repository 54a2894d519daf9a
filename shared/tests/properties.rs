//! Property tests for the invariants the lock relies on.

use proptest::prelude::*;
use shared::{
    AnalogSampler, ButtonPress, DebounceGuard, Digit, DigitPair, DisplayMultiplexer, GuardAction,
    LockController, LockStatus, LoopEvents, Panel, ProgrammingState, Reading, SharedState,
    ports::{DisplayPanel, Edge, IndicatorOutput, Level},
};

#[derive(Debug, Default)]
struct Leds {
    unlocked: bool,
    programming: bool,
    unlocked_toggles: usize,
}

impl IndicatorOutput for Leds {
    fn set_unlocked(&mut self, on: bool) {
        if self.unlocked != on {
            self.unlocked_toggles += 1;
        }
        self.unlocked = on;
    }

    fn set_programming(&mut self, on: bool) {
        self.programming = on;
    }
}

#[derive(Debug, Default)]
struct Panels {
    selected: Option<Panel>,
    writes: Vec<(Panel, Digit)>,
}

impl DisplayPanel for Panels {
    fn select_panel(&mut self, panel: Panel) {
        self.selected = Some(panel);
    }

    fn write_digit(&mut self, digit: Digit) {
        self.writes.push((self.selected.unwrap(), digit));
    }
}

fn digit() -> impl Strategy<Value = Digit> {
    (0u8..=9).prop_map(|d| Digit::try_from(d).unwrap())
}

fn reading() -> impl Strategy<Value = Reading> {
    (digit(), digit()).prop_map(|(low, high)| DigitPair::new(low, high))
}

/// 12 bit sample that scales back to `digit`.
fn sample_for(digit: Digit) -> u16 {
    let nibble = (u16::from(u8::from(digit)) * 15).div_ceil(9);
    (nibble << 8) | 0x80
}

#[derive(Clone, Debug)]
enum LoopOp {
    Sample(Reading),
    Press,
}

fn loop_op() -> impl Strategy<Value = LoopOp> {
    prop_oneof![
        3 => reading().prop_map(LoopOp::Sample),
        1 => Just(LoopOp::Press),
    ]
}

proptest! {
    /// While not reprogramming, the lock is open exactly when the last evaluated reading matches
    /// the cipher, and the indicator follows.
    #[test]
    fn lock_open_iff_reading_matches_cipher(ops in proptest::collection::vec(loop_op(), 1..64)) {
        let mut lock = LockController::default();
        let mut leds = Leds::default();
        lock.init(&mut leds);

        let mut current = DigitPair::default();

        for op in ops {
            let events = match op {
                LoopOp::Sample(reading) => {
                    current = reading;
                    LoopEvents { reading, reading_updated: true, press: false }
                }
                LoopOp::Press => LoopEvents { reading: current, reading_updated: false, press: true },
            };

            let cipher_before = lock.cipher();
            let status_before = lock.lock_status();
            let programming_before = lock.programming_state();
            lock.handle(events, &mut leds);

            if events.press && status_before == LockStatus::Locked {
                prop_assert_eq!(lock.cipher(), cipher_before);
                prop_assert_eq!(lock.programming_state(), programming_before);
            }

            if lock.programming_state() == ProgrammingState::Idle {
                prop_assert_eq!(
                    lock.lock_status() == LockStatus::Unlocked,
                    lock.reading() == lock.cipher()
                );
            } else {
                prop_assert_eq!(lock.lock_status(), LockStatus::Unlocked);
                prop_assert_eq!(lock.cipher(), cipher_before);
            }

            prop_assert_eq!(leds.unlocked, lock.lock_status() == LockStatus::Unlocked);
            prop_assert_eq!(
                leds.programming,
                lock.programming_state() == ProgrammingState::AwaitingConfirm
            );
        }
    }

    /// Re-evaluating an unchanged reading never toggles the lock.
    #[test]
    fn repeated_evaluation_is_idempotent(reading in reading(), repeats in 1usize..20) {
        let mut lock = LockController::default();
        let mut leds = Leds::default();
        let events = LoopEvents { reading, reading_updated: true, press: false };

        lock.handle(events, &mut leds);
        let status = lock.lock_status();
        let toggles = leds.unlocked_toggles;

        for _ in 0..repeats {
            lock.handle(events, &mut leds);
            prop_assert_eq!(lock.lock_status(), status);
        }
        prop_assert_eq!(leds.unlocked_toggles, toggles);
    }

    /// Every press, however much it bounces inside the window, yields exactly one event.
    #[test]
    fn bounced_presses_yield_one_event_each(bounces in proptest::collection::vec(0usize..16, 1..10)) {
        let mut guard = DebounceGuard::new();
        let mut presses = 0;
        let expected = bounces.len();

        for bounce in bounces {
            prop_assert_eq!(guard.on_edge(Edge::Falling), GuardAction::StartWindow);
            for _ in 0..bounce {
                prop_assert_eq!(guard.on_edge(Edge::Rising), GuardAction::Ignore);
                prop_assert_eq!(guard.on_edge(Edge::Falling), GuardAction::Ignore);
            }

            if guard.on_expiry(Level::Asserted) == Some(ButtonPress) {
                presses += 1;
            }

            // Release.
            prop_assert_eq!(guard.on_edge(Edge::Rising), GuardAction::Ignore);
        }

        prop_assert_eq!(presses, expected);
    }

    /// Any two consecutive refresh ticks drive both panels with the latest reading.
    #[test]
    fn both_panels_driven_every_two_ticks(readings in proptest::collection::vec(reading(), 2..40)) {
        let mut mux = DisplayMultiplexer::new();
        let mut panels = Panels::default();

        for reading in &readings {
            mux.refresh(*reading, &mut panels);
        }

        for (window, readings) in panels.writes.windows(2).zip(readings.windows(2)) {
            let (first, second) = (window[0], window[1]);
            prop_assert_ne!(first.0, second.0);

            for ((panel, digit), reading) in [first, second].into_iter().zip(readings) {
                let expected = match panel {
                    Panel::High => reading.high(),
                    Panel::Low => reading.low(),
                };
                prop_assert_eq!(digit, expected);
            }
        }
    }

    /// The main loop only ever observes pairs that were sampled within one cycle, wherever it
    /// runs between the two channel completions.
    #[test]
    fn sampled_pairs_never_tear(
        cycles in proptest::collection::vec((reading(), any::<bool>(), any::<bool>()), 1..32)
    ) {
        let mut sampler = AnalogSampler::<12>::new();
        let mut state = SharedState::new();
        let _ = state.take_events();
        let mut published = vec![DigitPair::default()];

        for (reading, poll_between, complete_high) in cycles {
            let channel = sampler.begin_cycle();
            let next = sampler.complete(sample_for(reading.get(channel)), &mut state);

            if poll_between {
                let events = state.take_events();
                prop_assert!(published.contains(&events.reading));
            }

            if let (Some(channel), true) = (next, complete_high) {
                sampler.complete(sample_for(reading.get(channel)), &mut state);
                published.push(reading);
            }

            let events = state.take_events();
            prop_assert!(published.contains(&events.reading));
            prop_assert_eq!(events.reading, *published.last().unwrap());
        }
    }
}
