//! Clinch - Entry Point
//!
//! Interactive human-vs-cpu match over stdin. Presents the legal stance
//! and down-attack menus whenever the engine suspends, and paces the
//! narration between events.

use clinch::combat::stance::Stance;
use clinch::combat::technique::TechniqueTable;
use clinch::core::config::DuelConfig;
use clinch::core::error::Result;
use clinch::core::types::Side;
use clinch::duel::{DuelEngine, Progress, SideSetup};
use clinch::policy::ControlPolicy;

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("clinch=info")
        .init();

    println!("=== CLINCH ===");
    println!("A best-of-one stance duel. Pick a stance each turn; knock the");
    println!("other side down and keep the pressure on.");
    println!();

    let name = prompt("Your name (default Challenger): ")?;
    let name = if name.is_empty() { "Challenger".to_string() } else { name };

    let tier = prompt("Opponent difficulty [weak/medium/strong] (default medium): ")?;
    let control = match tier.as_str() {
        "weak" => ControlPolicy::CpuWeak,
        "strong" => ControlPolicy::CpuStrong,
        "" | "medium" => ControlPolicy::CpuMedium,
        other => {
            eprintln!("Unknown difficulty '{}', using medium", other);
            ControlPolicy::CpuMedium
        }
    };

    let table = TechniqueTable::load("data/techniques.toml").unwrap_or_else(|e| {
        tracing::warn!("failed to load technique table: {}", e);
        eprintln!("Warning: running without a technique table ({})", e);
        TechniqueTable::empty()
    });

    let config = DuelConfig::default();
    let delay = Duration::from_millis(config.step_delay_ms);
    let mut engine = DuelEngine::new(
        SideSetup::new(name, ControlPolicy::Human),
        SideSetup::new("Kaza the Wall", control),
        table,
        config,
        rand::random(),
    );

    let mut printed = 0;
    loop {
        let progress = engine.advance();
        printed = print_new_events(&engine, printed, delay);

        match progress {
            Progress::AwaitingStance { side, legal } => {
                let stance = ask_stance(&legal)?;
                if let Err(e) = engine.submit_stance(side, stance) {
                    eprintln!("{}", e);
                }
            }
            Progress::AwaitingDownChoice { side, choices } => {
                println!("{} is down. Press the advantage:", engine.side(side.opponent()).name);
                let index = ask_index(choices.len(), |i| format!("{}", choices[i]))?;
                if let Err(e) = engine.submit_down_choice(side, choices[index]) {
                    eprintln!("{}", e);
                }
            }
            Progress::TurnComplete => {
                println!(
                    "-- turn {} done: {} {} hp / {} {} hp --",
                    engine.turn(),
                    engine.side(Side::One).name,
                    engine.side(Side::One).hp,
                    engine.side(Side::Two).name,
                    engine.side(Side::Two).hp,
                );
            }
            Progress::Finished { winner } => {
                match winner {
                    Some(side) => println!("Winner: {}", engine.side(side).name),
                    None => println!("Technical draw."),
                }
                break;
            }
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn ask_stance(legal: &[Stance]) -> Result<Stance> {
    println!("Choose your stance:");
    let index = ask_index(legal.len(), |i| format!("{}", legal[i]))?;
    Ok(legal[index])
}

/// Numbered menu prompt; re-asks until a valid index arrives
fn ask_index(len: usize, label: impl Fn(usize) -> String) -> Result<usize> {
    for i in 0..len {
        println!("  {}) {}", i + 1, label(i));
    }
    loop {
        let input = prompt("> ")?;
        match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= len => return Ok(n - 1),
            _ => println!("Enter a number from 1 to {}", len),
        }
    }
}

fn print_new_events(engine: &DuelEngine, printed: usize, delay: Duration) -> usize {
    let events = engine.events();
    for event in &events[printed..] {
        println!("{:02}: {}", event.turn, event.description);
        thread::sleep(delay);
    }
    events.len()
}
