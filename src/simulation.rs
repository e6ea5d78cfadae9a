//! Per-frame orchestration of the flight core.
//!
//! [`Simulation`] owns the terrain, mana nodes, spells, roster and world
//! transition, and runs them in a fixed order every tick: controls, flight,
//! node collection, spells, then the boundary check. While the world is
//! transitioning only the fade advances; the pilot is frozen until the new
//! world fades in.

use glam::Vec3;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actor::{Actor, ActorId, AltitudeBand, Roster};
use crate::config::SimConfig;
use crate::constants::MAX_TERRAIN_SEED;
use crate::input::{apply_controls, ControlInput};
use crate::net::{LocalUpdate, RemoteEvent, UpdateChannel};
use crate::numeric::{finite_or, sanitize_dt};
use crate::physics::FlightModel;
use crate::resources::{CollectedNode, ResourceField};
use crate::spells::{CastOutcome, SpellEvent, SpellModel};
use crate::terrain::{HeightField, TerrainSampler};
use crate::transition::{TransitionState, WorldTransitionController};

/// Identifier of the locally piloted actor.
pub const LOCAL_ACTOR_ID: ActorId = ActorId(1);

/// Cosmetic impact for the host to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvent {
    /// Impact point.
    pub position: Vec3,
    /// RGB colour of the spell.
    pub color_hint: u32,
}

/// Everything the host needs after one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// State of the local actor to publish to other players.
    pub local_update: LocalUpdate,
    /// Nodes the local actor collected.
    pub collected: Vec<CollectedNode>,
    /// Terrain and actor impacts.
    pub impacts: Vec<ImpactEvent>,
    /// Every spell event, including expiries and shield timeouts.
    pub spell_events: Vec<SpellEvent>,
    /// Outcome of this tick's cast request, if there was one.
    pub cast: Option<CastOutcome>,
    /// Whether the world was regenerated during this tick.
    pub regenerated: bool,
    /// Transition phase after the tick.
    pub transition: TransitionState,
}

/// State replaced or reset when the world regenerates.
#[derive(Debug, Clone)]
struct World {
    terrain: HeightField,
    resources: ResourceField,
    spells: SpellModel,
    roster: Roster,
    rng: ChaCha8Rng,
    generation: u32,
}

impl World {
    fn regenerate(&mut self, config: &SimConfig) {
        let seed = self.rng.gen_range(0.0..MAX_TERRAIN_SEED);
        self.terrain.regenerate(seed);
        self.resources.populate(
            config.nodes.count,
            config.world.size,
            &self.terrain,
            &mut self.rng,
        );
        self.spells.clear_projectiles();
        let spawn = spawn_point(config, &self.terrain);
        self.roster.local_mut().reset_motion(spawn);
        self.generation += 1;
        info!(
            "world generation {} created from seed {seed:.3}",
            self.generation
        );
    }
}

/// Centre of the world at a safe altitude above the terrain.
fn spawn_point<T: TerrainSampler + ?Sized>(config: &SimConfig, terrain: &T) -> Vec3 {
    let ground = terrain.sample_height(0.0, 0.0);
    let band = AltitudeBand {
        min_clearance: config.flight.min_clearance,
        ceiling: config.flight.max_altitude,
    };
    Vec3::new(0.0, band.clamp(ground + config.flight.safety_threshold, ground), 0.0)
}

/// The complete single-player-plus-remotes simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    flight: FlightModel,
    transition: WorldTransitionController,
    world: World,
    elapsed: f32,
}

impl Simulation {
    /// Builds the first world generation from `seed`.
    ///
    /// The same `config` and `seed` always produce the same terrain, nodes
    /// and regeneration sequence.
    ///
    /// # Examples
    /// ```
    /// use skycarpet::config::SimConfig;
    /// use skycarpet::input::ControlInput;
    /// use skycarpet::Simulation;
    ///
    /// let mut sim = Simulation::new(SimConfig::default(), 7);
    /// let report = sim.tick(1.0 / 60.0, 1.0 / 60.0, &ControlInput::default());
    /// assert!(!report.regenerated);
    /// ```
    #[must_use]
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let terrain_seed = rng.gen_range(0.0..MAX_TERRAIN_SEED);
        let terrain = HeightField::with_resolution(
            terrain_seed,
            config.world.size,
            config.world.height_scale,
            config.world.grid_resolution,
        );
        let mut resources = ResourceField::new(config.nodes.clone());
        resources.populate(config.nodes.count, config.world.size, &terrain, &mut rng);
        let local = Actor::new(
            LOCAL_ACTOR_ID,
            spawn_point(&config, &terrain),
            config.spells.max_health,
        );
        info!("simulation started with terrain seed {terrain_seed:.3}");
        Self {
            flight: FlightModel::new(config.flight.clone()),
            transition: WorldTransitionController::new(
                config.world.boundary_buffer,
                config.world.transition_rate,
            ),
            world: World {
                terrain,
                resources,
                spells: SpellModel::new(config.spells.clone()),
                roster: Roster::new(local),
                rng,
                generation: 0,
            },
            config,
            elapsed: 0.0,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current terrain.
    #[must_use]
    pub const fn terrain(&self) -> &HeightField {
        &self.world.terrain
    }

    /// Mana nodes of the current generation.
    #[must_use]
    pub const fn resources(&self) -> &ResourceField {
        &self.world.resources
    }

    /// Spell and projectile state.
    #[must_use]
    pub const fn spells(&self) -> &SpellModel {
        &self.world.spells
    }

    /// Local and remote actors.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.world.roster
    }

    /// Mutable roster, for hosts that teleport or script actors.
    pub const fn roster_mut(&mut self) -> &mut Roster {
        &mut self.world.roster
    }

    /// The locally piloted actor.
    #[must_use]
    pub const fn local(&self) -> &Actor {
        self.world.roster.local()
    }

    /// World transition state.
    #[must_use]
    pub const fn transition(&self) -> &WorldTransitionController {
        &self.transition
    }

    /// Number of regenerations so far.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.world.generation
    }

    /// Host time reported with the last tick.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Runs one frame.
    ///
    /// `dt` is clamped to `[0, max_tick_dt]`; non-finite values count as
    /// zero. `elapsed` is the host's cumulative clock and is only recorded.
    pub fn tick(&mut self, dt: f32, elapsed: f32, input: &ControlInput) -> TickReport {
        let step_dt = sanitize_dt(dt, self.config.max_tick_dt);
        self.elapsed = finite_or(elapsed, self.elapsed);

        let mut collected = Vec::new();
        let mut spell_events = Vec::new();
        let mut cast = None;
        let mut regenerated = false;

        if self.transition.is_transitioning() {
            let world = &mut self.world;
            let config = &self.config;
            self.transition.advance(step_dt, || {
                world.regenerate(config);
                regenerated = true;
            });
        } else {
            let world = &mut self.world;
            let local = world.roster.local_mut();
            apply_controls(&self.flight, local, input);
            self.flight.step(local, &world.terrain, step_dt);

            collected = world
                .resources
                .check_collection(local.position, self.config.nodes.collect_radius);
            let gained = collected
                .iter()
                .fold(0_u32, |total, node| total.saturating_add(node.value));
            local.mana = local.mana.saturating_add(gained);

            if let Some(slot) = input.cast_request {
                cast = Some(world.spells.cast(local, slot));
            }

            let mut actors = world.roster.actors_mut();
            spell_events = world.spells.update(step_dt, &world.terrain, &mut actors);

            let position = world.roster.local().position;
            self.transition
                .check_boundary(position, self.config.world.size);
        }

        self.world.roster.smooth_remotes(
            self.config.network.interpolation_factor,
            &self.world.terrain,
            self.flight.altitude_band(),
        );

        let impacts = spell_events
            .iter()
            .filter_map(SpellEvent::impact)
            .map(|(position, color_hint)| ImpactEvent {
                position,
                color_hint,
            })
            .collect();

        TickReport {
            local_update: self.local_update(),
            collected,
            impacts,
            spell_events,
            cast,
            regenerated,
            transition: self.transition.state(),
        }
    }

    /// Snapshot of the local actor for publishing.
    #[must_use]
    pub fn local_update(&self) -> LocalUpdate {
        let local = self.local();
        LocalUpdate {
            id: local.id,
            position: local.position,
            rotation_y: local.orientation.yaw,
            mana: local.mana,
            health: local.health.current(),
        }
    }

    /// Applies one event from the update channel.
    ///
    /// Joining actors appear at the world centre at a safe altitude until
    /// their first snapshot arrives.
    pub fn apply_remote(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Joined { id } => {
                let spawn = spawn_point(&self.config, &self.world.terrain);
                self.world.roster.join(ActorId(id), spawn);
            }
            RemoteEvent::Left { id } => {
                self.world.roster.leave(ActorId(id));
            }
            RemoteEvent::Snapshot(snapshot) => {
                self.world.roster.apply_snapshot(&snapshot);
            }
        }
    }

    /// Drains `channel` and applies every pending event. Returns how many
    /// events were applied.
    pub fn pump<C: UpdateChannel + ?Sized>(&mut self, channel: &mut C, dt: f32) -> usize {
        let events = channel.poll(sanitize_dt(dt, self.config.max_tick_dt));
        let count = events.len();
        for event in events {
            self.apply_remote(event);
        }
        if count > 0 {
            debug!("applied {count} remote events");
        }
        count
    }
}
