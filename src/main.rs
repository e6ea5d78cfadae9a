//! Headless skycarpet session flown by an autopilot.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;
use skycarpet::plugin::step_simulation_system;
use skycarpet::{
    init_logging, ControlInput, FlightPlugin, FlightStats, PilotInput, SimConfig, SimulationState,
    TerrainSampler,
};

/// Headless carpet flight session flown by an autopilot
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON configuration file; defaults apply to anything it omits
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for terrain, nodes and bots
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

/// Cruises forward in a slow weave, holds a comfortable altitude and fires
/// whenever the cooldown allows.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn autopilot_system(time: Res<Time>, state: Res<SimulationState>, mut input: ResMut<PilotInput>) {
    let simulation = &state.0;
    let local = simulation.local();
    let ground = simulation
        .terrain()
        .sample_height(local.position.x, local.position.z);
    let cruise = ground + simulation.config().flight.safety_threshold * 4.0;
    let can_cast = simulation.spells().cooldown_remaining(local.id) <= 0.0;
    input.0 = ControlInput {
        forward: 1.0,
        right: (time.elapsed_secs() * 0.5).sin() * 0.3,
        up: ((cruise - local.position.y) * 0.1).clamp(-1.0, 1.0),
        boosting: false,
        cast_request: can_cast.then_some(0),
    };
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(args.fps > 0, "--fps must be positive");

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / f64::from(args.fps),
        )))
        .add_plugins(FlightPlugin {
            config,
            seed: args.seed,
        })
        .add_systems(Update, autopilot_system.before(step_simulation_system));
    app.finish();
    app.cleanup();

    info!("flying {} frames at {} fps (seed {})", args.ticks, args.fps, args.seed);
    for _ in 0..args.ticks {
        app.update();
    }

    let stats = *app.world().resource::<FlightStats>();
    let simulation = &app.world().resource::<SimulationState>().0;
    let local = simulation.local();
    info!(
        "session finished: {} ticks, {} nodes ({} mana), {} impacts, {} regenerations",
        stats.ticks,
        stats.nodes_collected,
        stats.mana_collected,
        stats.impacts,
        stats.regenerations
    );
    info!(
        "pilot at ({:.1}, {:.1}, {:.1}) with {} mana and {} health; {} remote actors",
        local.position.x,
        local.position.y,
        local.position.z,
        local.mana,
        local.health.current(),
        simulation.roster().remote_count()
    );
    Ok(())
}
