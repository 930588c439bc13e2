//! Headless Swarm Runner
//!
//! Spawns a population of entities, wounds and provokes a few of them, and
//! steps the engine at a fixed cadence, printing an event summary.

use std::cell::Cell;
use std::rc::Rc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use packmind::behavior::catalog::BehaviorKind;
use packmind::core::config::EngineConfig;
use packmind::core::types::Vec3;
use packmind::entity::EntityOverrides;
use packmind::events::{EventTopic, InboundEvent};
use packmind::modifier::{
    AggressionModifier, FixedAggression, FixedLevel, ProgressionModifier,
};
use packmind::path::DirectPathfinder;
use packmind::simulation::Simulation;

/// Headless swarm runner - deterministic engine runs for tuning
#[derive(Parser, Debug)]
#[command(name = "swarm_sim")]
#[command(about = "Run the behavior engine headless and output an event summary")]
struct Args {
    /// Number of entities to spawn
    #[arg(long, default_value_t = 24)]
    entities: usize,

    /// Number of 60 Hz ticks to run
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// Progression level applied to every entity
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    ticks: u64,
    entities: usize,
    behavior_changes: u64,
    attacks: u64,
    flee_starts: u64,
    flee_completes: u64,
    final_behaviors: Vec<(String, usize)>,
    seed: u64,
}

const FRAME_MS: f64 = 1000.0 / 60.0;

fn counter(simulation: &mut Simulation, topic: EventTopic) -> Rc<Cell<u64>> {
    let count = Rc::new(Cell::new(0));
    let count_clone = Rc::clone(&count);
    simulation.bus().subscribe(topic, move |_| {
        count_clone.set(count_clone.get() + 1);
    });
    count
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| rand::random());
    let mut rng = StdRng::seed_from_u64(seed);

    tracing::info!(
        "Starting swarm run: {} entities, {} ticks, seed {seed}",
        args.entities,
        args.ticks
    );

    let mut simulation =
        Simulation::new(EngineConfig::default(), Box::new(DirectPathfinder), seed)
            .expect("default config is valid");

    simulation.add_modifier(Box::new(ProgressionModifier::new(Box::new(FixedLevel(
        args.level,
    )))));
    simulation.add_modifier(Box::new(AggressionModifier::new(Box::new(
        FixedAggression(1.0),
    ))));

    let behavior_changes = counter(&mut simulation, EventTopic::BehaviorChanged);
    let attacks = counter(&mut simulation, EventTopic::Attack);
    let flee_starts = counter(&mut simulation, EventTopic::FleeStart);
    let flee_completes = counter(&mut simulation, EventTopic::FleeComplete);

    let mut ids = Vec::with_capacity(args.entities);
    for _ in 0..args.entities {
        let position = Vec3::new(
            rng.gen_range(-20.0..20.0),
            0.0,
            rng.gen_range(-20.0..20.0),
        );
        ids.push(simulation.add_entity(EntityOverrides {
            position: Some(position),
            ..Default::default()
        }));
    }

    // Provoke a skirmish: the first entity hunts the second, the last one
    // takes a beating
    if ids.len() >= 2 {
        simulation.post(InboundEvent::PlayerDetected { entity: ids[0], player: ids[1] });
    }
    if let Some(&victim) = ids.last() {
        simulation.post(InboundEvent::EntityDamaged { entity: victim, damage: 75.0 });
    }

    for _ in 0..args.ticks {
        simulation.step(FRAME_MS);
    }

    let mut tally: std::collections::BTreeMap<String, usize> = Default::default();
    for entity in simulation.entities() {
        let name = match entity.current_behavior {
            BehaviorKind::Idle => "idle",
            BehaviorKind::Patrol => "patrol",
            BehaviorKind::Flock => "flock",
            BehaviorKind::Combat => "combat",
            BehaviorKind::Flee => "flee",
        };
        *tally.entry(name.to_string()).or_default() += 1;
    }

    let summary = RunSummary {
        ticks: args.ticks,
        entities: args.entities,
        behavior_changes: behavior_changes.get(),
        attacks: attacks.get(),
        flee_starts: flee_starts.get(),
        flee_completes: flee_completes.get(),
        final_behaviors: tally.into_iter().collect(),
        seed,
    };

    if args.format == "text" {
        println!("ticks:            {}", summary.ticks);
        println!("entities:         {}", summary.entities);
        println!("behavior changes: {}", summary.behavior_changes);
        println!("attacks:          {}", summary.attacks);
        println!("flee starts:      {}", summary.flee_starts);
        println!("flee completes:   {}", summary.flee_completes);
        for (behavior, count) in &summary.final_behaviors {
            println!("  {behavior}: {count}");
        }
    } else {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::error!("Failed to serialize summary: {error}"),
        }
    }
}
