//! Headless dungeon run.
//!
//! Builds the runtime from built-in or on-disk content, drives it with a
//! scripted policy and logs a summary. Everything is reproducible from the
//! seed.
//!
//! ```bash
//! RUST_LOG=info cargo run -p dungeon-sim -- --seed 42 --class rogue --steps 200
//! ```

mod policy;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use game_content::{ContentFactory, builtin};
use game_core::{CharacterClass, GameState, Player};
use runtime::{FileCheckpointRepository, Runtime, RuntimeConfig};

use policy::ScriptedPolicy;

#[derive(Debug, Parser)]
#[command(name = "dungeon-sim", about = "Run a seeded dungeon crawl without a frontend")]
struct Args {
    /// RNG seed for the run.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum number of commands to submit.
    #[arg(long, default_value_t = 150)]
    steps: usize,

    #[arg(long, default_value = "warrior")]
    class: CharacterClass,

    #[arg(long, default_value = "Wanderer")]
    name: String,

    /// Directory with config.toml, pieces.ron and bestiary.ron. Built-in content when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Save a final checkpoint to this directory.
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let content = match &args.data_dir {
        Some(dir) => ContentFactory::new(dir).load_bundle()?,
        None => builtin::bundle()?,
    };
    info!(
        pieces = content.pieces.len(),
        enemies = content.bestiary.len(),
        "Content loaded"
    );

    let state = GameState::new(args.seed, Player::new(args.name.clone(), args.class));
    let mut builder = Runtime::builder()
        .config(RuntimeConfig::default())
        .content(content.clone())
        .initial_state(state)
        .provider(ScriptedPolicy::new(content));
    if let Some(dir) = &args.checkpoint_dir {
        let repository = FileCheckpointRepository::new(dir)
            .with_context(|| format!("opening checkpoint directory {}", dir.display()))?;
        builder = builder.repository(Arc::new(repository));
    }

    let mut runtime = builder.build().await?;
    let handle = runtime.handle();

    info!(seed = args.seed, class = %args.class, "Starting run");
    let submitted = runtime.run(args.steps).await?;

    let state = handle.query_state().await?;
    if args.checkpoint_dir.is_some() {
        let checkpoint = handle.checkpoint(format!("seed-{}", args.seed)).await?;
        info!(label = %checkpoint.label, "Final checkpoint saved");
    }

    info!(
        submitted,
        nonce = state.nonce,
        floor = state.floor,
        level = state.player.level,
        gold = state.player.gold,
        health = state.player.stats.health(),
        defeated = state.is_defeated(),
        digest = %hex::encode(state.digest()?),
        "Run finished"
    );
    for entry in state.journal.entries().iter().rev().take(5).rev() {
        info!(nonce = entry.nonce, "{}", entry.text);
    }

    drop(handle);
    runtime.shutdown().await?;
    Ok(())
}
