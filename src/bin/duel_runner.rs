//! Headless Duel Runner
//!
//! Runs cpu-vs-cpu matches and outputs a JSON or text summary.

use clap::Parser;
use clinch::combat::technique::TechniqueTable;
use clinch::core::config::DuelConfig;
use clinch::core::types::Side;
use clinch::duel::{DuelEngine, Progress, SideSetup};
use clinch::policy::ControlPolicy;
use serde::Serialize;

/// Headless Duel Runner - cpu vs cpu matches
#[derive(Parser, Debug)]
#[command(name = "duel_runner")]
#[command(about = "Run cpu vs cpu duels and output a result summary")]
struct Args {
    /// Side one tier: weak, medium or strong
    #[arg(long, default_value = "medium")]
    side1: String,

    /// Side two tier: weak, medium or strong
    #[arg(long, default_value = "medium")]
    side2: String,

    /// Side one display name
    #[arg(long, default_value = "Player 1")]
    name1: String,

    /// Side two display name
    #[arg(long, default_value = "Player 2")]
    name2: String,

    /// Technique table file
    #[arg(long, default_value = "data/techniques.toml")]
    table: String,

    /// Maximum turns before giving up (runaway guard)
    #[arg(long, default_value_t = 1000)]
    max_turns: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every event as it happens
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct DuelResult {
    match_id: String,
    winner: Option<String>,
    turns: u64,
    side1_hp: i32,
    side2_hp: i32,
    seed: u64,
}

fn parse_tier(raw: &str) -> ControlPolicy {
    match raw {
        "weak" => ControlPolicy::CpuWeak,
        "medium" => ControlPolicy::CpuMedium,
        "strong" => ControlPolicy::CpuStrong,
        other => {
            eprintln!("Warning: unknown tier '{}', using medium", other);
            ControlPolicy::CpuMedium
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("clinch=warn")
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let table = TechniqueTable::load(&args.table).unwrap_or_else(|e| {
        eprintln!("Warning: failed to load table '{}': {}", args.table, e);
        eprintln!("Running without techniques (fallback damage only)");
        TechniqueTable::empty()
    });

    let mut engine = DuelEngine::new(
        SideSetup::new(args.name1.clone(), parse_tier(&args.side1)),
        SideSetup::new(args.name2.clone(), parse_tier(&args.side2)),
        table,
        DuelConfig::default(),
        seed,
    );

    let mut printed = 0;
    while !engine.is_finished() && engine.turn() < args.max_turns {
        let progress = engine.advance();

        if args.verbose {
            for event in &engine.events()[printed..] {
                eprintln!("  [{:02}] {}", event.turn, event.description);
            }
            printed = engine.events().len();
        }

        match progress {
            Progress::AwaitingStance { side, .. } | Progress::AwaitingDownChoice { side, .. } => {
                // Both sides are scripted, so nothing can unblock this.
                eprintln!("Error: side {:?} requires human input; aborting", side);
                std::process::exit(1);
            }
            Progress::TurnComplete | Progress::Finished { .. } => {}
        }
    }

    let winner = engine.winner().map(|side| match side {
        Side::One => args.name1.clone(),
        Side::Two => args.name2.clone(),
    });
    let result = DuelResult {
        match_id: format!("{}", engine.match_id().0),
        winner,
        turns: engine.turn(),
        side1_hp: engine.side(Side::One).hp,
        side2_hp: engine.side(Side::Two).hp,
        seed,
    };

    match args.format.as_str() {
        "json" => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize result: {}", e),
        },
        "text" => {
            println!("Duel Result");
            println!("===========");
            match &result.winner {
                Some(name) => println!("Winner: {}", name),
                None if engine.is_finished() => println!("Winner: none (technical draw)"),
                None => println!("Winner: none (turn limit reached)"),
            }
            println!("Turns: {}", result.turns);
            println!("{}: {} hp", args.name1, result.side1_hp);
            println!("{}: {} hp", args.name2, result.side2_hp);
            println!("Seed: {}", result.seed);
        }
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
    }
}
