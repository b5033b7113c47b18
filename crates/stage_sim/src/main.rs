//! # stage_sim: simulated host
//!
//! Plays the part of the game server for a staged scene: activates the
//! extension from a scene file given on the command line, joins scripted
//! connections and drives a fixed-rate tick loop.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments and initialise logging.
//! 2. Activate the extension (refusal stops the process with an error).
//! 3. Join `--players` connections.
//! 4. Tick until `--duration` simulated seconds have passed, then unload.

mod tick;
mod world;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stage_config::Document;
use stage_host::Team;
use stage_scene::Scene;
use tick::{SimServer, TickConfig};

#[derive(Parser)]
#[command(name = "stage_sim", about = "Run a staged scene against a simulated server")]
struct Args {
    /// Path to the scene configuration file
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Ticks per second
    #[arg(long, default_value_t = 20.0)]
    tick_rate: f64,

    /// Simulated seconds to run for
    #[arg(short, long, default_value_t = 30.0)]
    duration: f64,

    /// Number of connections that join as players
    #[arg(short, long, default_value_t = 2)]
    players: u32,

    /// Number of connections that join as observers
    #[arg(long, default_value_t = 0)]
    observers: u32,

    /// Seconds between scripted nudges of a live tank (0 = never)
    #[arg(long, default_value_t = 0.0)]
    nudge_interval: f64,

    /// Issue `scene reset` at this simulated time
    #[arg(long)]
    reset_at: Option<f64>,

    /// Print the parsed scene as JSON and exit
    #[arg(long)]
    dump_scene: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stage_sim=info,stage_scene=info".into()),
        )
        .init();

    let args = Args::parse();

    if args.dump_scene {
        let path = args.scene.as_deref().context("--dump-scene needs --scene")?;
        let doc = Document::load(path)?;
        let scene = Scene::from_document(&doc)?;
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    let config = TickConfig {
        tick_rate: args.tick_rate,
        duration: args.duration,
        nudge_interval: args.nudge_interval,
        reset_at: args.reset_at,
    };

    let mut server = SimServer::start(config, args.scene.as_deref())?;

    for n in 0..args.players {
        server.join(&format!("player{n}"), Team::Rogue);
    }
    for n in 0..args.observers {
        server.join(&format!("observer{n}"), Team::Observer);
    }

    server.run_async().await?;
    server.shutdown();

    info!(ticks = server.tick_id(), "simulated server shut down");
    Ok(())
}
