#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a scripted Snake JezzBall round.

mod render;
mod replay;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use snake_jezzball_core::{AppleKind, GameConfig};
use snake_jezzball_system_scoring::{RoundOutcome, Scoreboard};
use snake_jezzball_world::{query, World};

#[derive(Debug, Parser)]
#[command(name = "snake-jezzball")]
#[command(version, about = "Headless Snake JezzBall simulation driven by an input script")]
struct Cli {
    /// TOML file overriding the default game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for apple placement
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Grid width, overriding the configuration file
    #[arg(long)]
    columns: Option<u32>,

    /// Grid height, overriding the configuration file
    #[arg(long)]
    rows: Option<u32>,

    /// Conquered share required to win, overriding the configuration file
    #[arg(long)]
    target: Option<f32>,

    /// Input script: U/D/L/R turn, W toggles walls, X restarts, '.' waits; digits repeat
    #[arg(long, default_value = "")]
    script: String,

    /// Simulated milliseconds per frame (defaults to the move interval)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Skip printing the final grid
    #[arg(long)]
    no_grid: bool,
}

/// Entry point for the Snake JezzBall command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let frame = Duration::from_millis(cli.tick_ms.unwrap_or(config.move_interval_ms));
    let frames = script::parse(&cli.script).context("failed to parse input script")?;

    let mut world = World::new(config, cli.seed).context("failed to build the world")?;
    let scoring = replay::replay(&mut world, frames, frame)?;

    print_summary(&world, scoring.scoreboard());
    if !cli.no_grid {
        print!("{}", render::text_grid(&query::snapshot(&world)));
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse configuration {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(target) = cli.target {
        config.target_percentage = target;
    }
    Ok(config)
}

fn print_summary(world: &World, scoreboard: &Scoreboard) {
    let outcome = match scoreboard.outcome() {
        Some(RoundOutcome::Won) => "won".to_owned(),
        Some(RoundOutcome::Lost(collision)) => format!("lost ({})", collision.reason()),
        None => "in progress".to_owned(),
    };

    println!("outcome:    {outcome}");
    println!("ticks:      {}", query::tick_index(world));
    println!("score:      {}", scoreboard.score());
    println!(
        "apples:     {} (normal {}, golden {}, shrink {})",
        scoreboard.total_apples(),
        scoreboard.apples_eaten(AppleKind::Normal),
        scoreboard.apples_eaten(AppleKind::Golden),
        scoreboard.apples_eaten(AppleKind::Shrink)
    );
    println!("walls:      {}", scoreboard.walls_placed());
    println!(
        "territory:  {:.1}% in {} conquests",
        query::territory(world).percentage() * 100.0,
        scoreboard.conquests()
    );
    println!("length:     {}", query::snake(world).len());
}
