//! Dungeon Combat - Entry Point
//!
//! Loads a scenario, runs the encounter on a tokio runtime and prints the
//! result as JSON or as a readable log.

use dungeon_combat::combat::{run_combat, CombatResult, Scenario};
use dungeon_combat::core::config::CombatConfig;
use dungeon_combat::core::error::Result;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Run one dungeon encounter from a scenario file
#[derive(Parser, Debug)]
#[command(name = "dungeon-combat")]
#[command(about = "Resolve a turn-based dungeon encounter deterministically")]
struct Args {
    /// Scenario TOML (party, monsters, flags, scripted actions)
    #[arg(long)]
    scenario: PathBuf,

    /// Seed override; the scenario seed or a fresh one is used otherwise
    #[arg(long)]
    seed: Option<String>,

    /// Turn ceiling override
    #[arg(long)]
    max_turns: Option<u32>,

    /// Combat tuning TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Monsters open with a free round
    #[arg(long, conflicts_with = "surprise")]
    ambush: bool,

    /// Party opens with a free round
    #[arg(long)]
    surprise: bool,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dungeon_combat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }

    let scenario = Scenario::load(&args.scenario)?;
    let mut options = scenario.session_options(config);
    if let Some(seed) = &args.seed {
        options.seed = Some(seed.clone());
    }
    if args.ambush {
        options.ambush = true;
        options.surprise = false;
    }
    if args.surprise {
        options.surprise = true;
        options.ambush = false;
    }

    let session = scenario.build_session(options)?;
    let armory = scenario.armory();

    let rt = Runtime::new()?;
    let result = rt.block_on(run_combat(session, &armory));

    print_result(&result, args.format)
}

fn print_result(result: &CombatResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Text => {
            println!("=== {} (seed {}) ===", result.room_id, result.seed);
            println!("{}", result.summary());
            for member in &result.final_party {
                println!("  {} {}/{} hp", member.name, member.hp, member.max_hp);
            }
        }
    }
    Ok(())
}
