#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line scenario runner for the hex-evac simulation.
//!
//! Builds one of the built-in evacuation scenarios, runs ticks until the
//! crowd has evacuated or the tick budget is exhausted, and prints per-tick
//! evacuation counts along the way. All randomness flows from a single
//! seeded ChaCha8 stream, so a given command line replays identically.

mod scenarios;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hex_evac_core::MovementPolicy;
use hex_evac_system_movement::{BoltzmannPolicy, RankedPolicy};
use hex_evac_world::query;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scenarios::{ExitLayout, ScenarioConfig, ScenarioKind};

/// Movement policies selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    /// Distance-ranked descent with a rationality mix.
    Ranked,
    /// Boltzmann-weighted sampling over all viable neighbors.
    Boltzmann,
}

/// Pedestrian evacuation simulation on a hexagonal grid.
#[derive(Parser, Debug)]
#[command(name = "hex-evac")]
struct Args {
    /// Scenario to run.
    #[arg(value_enum)]
    scenario: ScenarioKind,

    /// Door layout for the hall scenarios.
    #[arg(long, value_enum, default_value = "opposite")]
    exits: ExitLayout,

    /// Movement policy driving the crowd.
    #[arg(long, value_enum, default_value = "ranked")]
    policy: PolicyKind,

    /// Probability of taking the best candidate under the ranked policy.
    #[arg(long, default_value_t = RankedPolicy::DEFAULT_RATIONALITY)]
    rationality: f64,

    /// Field-sensitivity coefficient under the boltzmann policy.
    #[arg(long, default_value_t = BoltzmannPolicy::DEFAULT_SENSITIVITY)]
    sensitivity: f64,

    /// Seed for the run's random stream.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Crowd size override; each scenario has its own default.
    #[arg(long)]
    agents: Option<usize>,

    /// Maximum number of ticks before the run gives up.
    #[arg(long, default_value_t = 1000)]
    max_ticks: u32,

    /// Add interior pillar obstacles near the long doors (circular only).
    #[arg(long)]
    pillars: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let config = ScenarioConfig {
        kind: args.scenario,
        exits: args.exits,
        agents: args.agents,
        pillars: args.pillars,
    };
    let (mut world, placed) = scenarios::build(&config, &mut rng)?;

    let policy: Box<dyn MovementPolicy> = match args.policy {
        PolicyKind::Ranked => Box::new(RankedPolicy::new(args.rationality)),
        PolicyKind::Boltzmann => Box::new(BoltzmannPolicy::new(args.sensitivity)),
    };

    let (width, height) = query::dimensions(&world);
    println!(
        "grid {width}x{height}, {placed} agents, {} target cells, seed {}",
        query::targets(&world).len(),
        args.seed
    );

    let mut evacuated_total = 0;
    for tick in 1..=args.max_ticks {
        let evacuated = world.step(policy.as_ref(), &mut rng);
        evacuated_total += evacuated;
        if evacuated > 0 {
            println!(
                "tick {tick}: {evacuated} evacuated, {} remain",
                query::agent_count(&world)
            );
        }
        if query::agent_count(&world) == 0 {
            println!("evacuation complete after {tick} ticks ({evacuated_total} agents out)");
            return Ok(());
        }
    }

    println!(
        "tick budget exhausted: {evacuated_total} out, {} remain",
        query::agent_count(&world)
    );
    Ok(())
}
