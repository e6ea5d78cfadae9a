//! Bevy plugin driving the simulation from the frame clock.
//!
//! The plugin owns a [`Simulation`] and a loopback update channel as
//! resources and steps both once per `Update`. Host-facing outcomes are
//! raised as observer events so rendering or audio can react without
//! polling the tick report.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info};

use crate::config::SimConfig;
use crate::input::ControlInput;
use crate::net::{LoopbackChannel, UpdateChannel};
use crate::simulation::{Simulation, TickReport};

/// The running simulation.
#[derive(Resource, Debug, Clone)]
pub struct SimulationState(pub Simulation);

/// Controls to apply on the next frame.
///
/// `cast_request` is consumed by the frame that reads it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PilotInput(pub ControlInput);

/// Update channel connecting the simulation to remote players.
#[derive(Resource, Debug, Clone)]
pub struct RemoteFeed(pub LoopbackChannel);

/// Running totals kept by the plugin's observers.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightStats {
    /// Frames the simulation was stepped.
    pub ticks: u64,
    /// Mana nodes picked up.
    pub nodes_collected: u64,
    /// Sum of collected node values.
    pub mana_collected: u64,
    /// Projectile impacts raised.
    pub impacts: u64,
    /// World generations entered.
    pub regenerations: u64,
}

/// The local actor picked up a mana node.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ManaCollected {
    /// Where the node hovered.
    pub position: Vec3,
    /// Mana the node granted.
    pub value: u32,
}

/// A projectile struck terrain or an actor.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ImpactFx {
    /// Impact point.
    pub position: Vec3,
    /// RGB colour of the spell.
    pub color_hint: u32,
}

/// A new world generation replaced the previous one.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldRegenerated {
    /// Number of the generation just entered.
    pub generation: u32,
}

/// Installs the simulation resources, observers and per-frame system.
#[derive(Debug, Clone, Default)]
pub struct FlightPlugin {
    /// Tuning for the simulation.
    pub config: SimConfig,
    /// Seed for world generation; the loopback channel uses `seed + 1`.
    pub seed: u64,
}

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        let simulation = Simulation::new(self.config.clone(), self.seed);
        let channel = LoopbackChannel::new(&self.config.network, self.seed.wrapping_add(1));
        app.insert_resource(SimulationState(simulation))
            .insert_resource(RemoteFeed(channel))
            .init_resource::<PilotInput>()
            .init_resource::<FlightStats>();

        app.add_observer(record_mana);
        app.add_observer(record_impact);
        app.add_observer(record_regeneration);
        app.add_systems(Update, step_simulation_system);
    }
}

/// Advances the simulation by the frame delta and raises its events.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn step_simulation_system(
    time: Res<Time>,
    mut state: ResMut<SimulationState>,
    mut input: ResMut<PilotInput>,
    mut feed: ResMut<RemoteFeed>,
    mut stats: ResMut<FlightStats>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    let simulation = &mut state.0;
    simulation.pump(&mut feed.0, dt);
    let report = simulation.tick(dt, time.elapsed_secs(), &input.0);
    input.0.cast_request = None;
    feed.0.publish(&report.local_update);
    stats.ticks += 1;
    trigger_report(&mut commands, &report, simulation.generation());
}

fn trigger_report(commands: &mut Commands, report: &TickReport, generation: u32) {
    for node in &report.collected {
        commands.trigger(ManaCollected {
            position: node.position,
            value: node.value,
        });
    }
    for impact in &report.impacts {
        commands.trigger(ImpactFx {
            position: impact.position,
            color_hint: impact.color_hint,
        });
    }
    if report.regenerated {
        commands.trigger(WorldRegenerated { generation });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_mana(event: On<ManaCollected>, mut stats: ResMut<FlightStats>) {
    let ManaCollected { position, value } = *event.event();
    debug!("mana node worth {value} collected at {position:?}");
    stats.nodes_collected += 1;
    stats.mana_collected += u64::from(value);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_impact(event: On<ImpactFx>, mut stats: ResMut<FlightStats>) {
    let ImpactFx {
        position,
        color_hint,
    } = *event.event();
    debug!("impact at {position:?} (colour {color_hint:06x})");
    stats.impacts += 1;
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_regeneration(event: On<WorldRegenerated>, mut stats: ResMut<FlightStats>) {
    info!("entered world generation {}", event.event().generation);
    stats.regenerations += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use rstest::{fixture, rstest};
    use std::time::Duration;

    static_assertions::assert_impl_all!(SimulationState: Send, Sync);

    #[fixture]
    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
        app.add_plugins(FlightPlugin {
            config: SimConfig::default(),
            seed: 5,
        });
        app
    }

    #[rstest]
    fn plugin_inserts_resources(app: App) {
        assert!(app.world().contains_resource::<SimulationState>());
        assert!(app.world().contains_resource::<PilotInput>());
        assert!(app.world().contains_resource::<RemoteFeed>());
        assert!(app.world().contains_resource::<FlightStats>());
    }

    #[rstest]
    fn updates_step_the_simulation_and_feed(mut app: App) {
        app.world_mut().resource_mut::<PilotInput>().0 = ControlInput {
            forward: 1.0,
            cast_request: Some(0),
            ..ControlInput::default()
        };
        let start = app.world().resource::<SimulationState>().0.local().position;
        for _ in 0..10 {
            app.update();
        }
        let state = &app.world().resource::<SimulationState>().0;
        assert_ne!(state.local().position, start);
        assert_eq!(
            state.roster().remote_count(),
            SimConfig::default().network.bot_count
        );
        assert_eq!(app.world().resource::<FlightStats>().ticks, 10);
        assert_eq!(app.world().resource::<PilotInput>().0.cast_request, None);
        assert!(app.world().resource::<RemoteFeed>().0.last_published().is_some());
    }

    #[rstest]
    fn collection_reaches_the_observer(mut app: App) {
        let node = app
            .world()
            .resource::<SimulationState>()
            .0
            .resources()
            .nodes()
            .first()
            .map(|node| node.position)
            .expect("default config scatters nodes");
        app.world_mut()
            .resource_mut::<SimulationState>()
            .0
            .roster_mut()
            .local_mut()
            .reset_motion(node);
        app.update();
        let stats = app.world().resource::<FlightStats>();
        assert!(stats.nodes_collected >= 1);
        assert!(stats.mana_collected >= 5);
    }
}
