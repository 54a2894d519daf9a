use anyhow::{Context, bail};
use clap::Parser;
use simulator::{AnyResult, DialMove, Press, Scenario, Stimulus};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

/// Runs the dial lock logic against a virtual board.
///
/// Without a scenario or extra stimulus every built-in scenario is played in turn.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Built-in scenario to play.
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,
    /// Dial move to add, as `<ms>=<high><low>`.
    #[arg(long = "dial", value_name = "MS=HL")]
    dial_moves: Vec<DialMove>,
    /// Button press to add, as `<ms>[+<hold ms>][~<bounces>]`.
    #[arg(long = "press", value_name = "MS[+HOLD][~BOUNCES]")]
    presses: Vec<Press>,
    /// Contact bounces on every edge of the scenario presses.
    #[arg(
        short,
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(..=i64::from(Press::MAX_BOUNCES)),
    )]
    bounces: u8,
    /// Virtual time to run for.
    #[arg(short, long, default_value_t = Scenario::DURATION_MS)]
    duration_ms: u32,
    /// Fail unless every scenario ends in its expected state.
    #[arg(long)]
    check: bool,
}

fn main() -> AnyResult<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut extra = Stimulus::default();
    extra.extend(&args.dial_moves, &args.presses);

    let scenarios: Vec<_> = match args.scenario {
        Some(scenario) => vec![scenario],
        None if !extra.is_empty() => Vec::new(),
        None => Scenario::iter().collect(),
    };

    if scenarios.is_empty() {
        simulator::run("custom", &extra, args.duration_ms);

        if args.check {
            tracing::warn!("nothing to check without a scenario");
        }

        return Ok(());
    }

    let mut failures = 0;

    for scenario in scenarios {
        let mut stimulus = scenario.stimulus(args.bounces);
        stimulus.extend(&extra.dial_moves, &extra.presses);

        let outcome = simulator::run(&scenario.to_string(), &stimulus, args.duration_ms);

        if !args.check {
            continue;
        }

        if !extra.is_empty() {
            tracing::warn!(%scenario, "extra stimulus given, skipping check");
            continue;
        }

        if let Err(e) = scenario.verify(&outcome) {
            tracing::error!("{e}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} scenario(s) did not end in their expected state");
    }

    Ok(())
}
