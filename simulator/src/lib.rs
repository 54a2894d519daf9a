mod board;
mod scenario;
mod simulation;
mod stimulus;

pub use anyhow::Result as AnyResult;
pub use board::{PanelWrite, SAMPLE_BITS, VirtualBoard};
pub use scenario::{Expectation, MIN_SCENARIO_BOUNCES, Scenario};
pub use simulation::{DISPLAY_REFRESH_MS, Outcome, Simulation};
pub use stimulus::{DialMove, Press, Stimulus, StimulusParseError};
use tracing::instrument;

/// Runs `stimulus` for `duration_ms` and logs where the lock ended up.
#[instrument(skip(stimulus))]
pub fn run(label: &str, stimulus: &Stimulus, duration_ms: u32) -> Outcome {
    let mut simulation = Simulation::new(stimulus);
    simulation.run_for(duration_ms);

    let outcome = simulation.outcome();
    let board = simulation.board();

    if !board.panels_alternate(DISPLAY_REFRESH_MS) {
        tracing::warn!("display panels were not refreshed in turn");
    }

    tracing::info!(
        cipher = %outcome.cipher,
        reading = %outcome.reading,
        lock = ?outcome.lock_status,
        programming = ?outcome.programming_state,
        presses = outcome.presses,
        "finished at {} ms",
        outcome.at_ms
    );

    outcome
}
