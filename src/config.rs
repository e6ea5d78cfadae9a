//! Simulation configuration.
//!
//! Every tuning value the core uses lives in [`SimConfig`]. Each section
//! derives `serde` with `#[serde(default)]` so a JSON file only needs to name
//! the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ALTITUDE_FORCE, BANK_DECAY, BANK_LATERAL_FORCE, BANK_RESPONSE, BOOST_MULTIPLIER, BOT_ALTITUDE,
    BOT_COUNT, BOT_JITTER, BOT_RING_RADIUS, BOT_UPDATE_INTERVAL, BOUNCE_THRESHOLD,
    BOUNDARY_BUFFER, CARPET_MASS, COLLECT_RADIUS, DRAG_COEFFICIENT, FORWARD_FORCE, GRAVITY,
    GRAVITY_SCALE, GRID_RESOLUTION, HEIGHT_SCALE, INERTIA, MAX_ALTITUDE, MAX_BANK, MAX_HEALTH,
    MAX_SPEED, MAX_TICK_DT, MAX_VERTICAL_RATE, MIN_CLEARANCE, NODE_COUNT, NODE_HOVER_HEIGHT,
    NODE_MAX_VALUE, NODE_MIN_VALUE, NODE_RADIUS, NODE_SPREAD, PROJECTILE_HIT_RADIUS,
    PROJECTILE_LIFETIME, PROJECTILE_SPAWN_OFFSET, REMOTE_INTERPOLATION, RESTITUTION,
    SHIELD_DURATION, SIDE_FORCE, TERRAIN_AVOIDANCE_STRENGTH, TERRAIN_SAFETY_THRESHOLD,
    TILT_SMOOTHING, TRANSITION_RATE, TURN_RATE, VERTICAL_RATE_DECAY, WORLD_SIZE,
};
use crate::spells::{ShieldPolicy, SpellKind};

/// Failure raised while loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for [`SimConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is outside its legal domain.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
}

/// Terrain extent, boundary and transition tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square world, centred on the origin.
    pub size: f32,
    /// Peak elevation multiplier applied to the summed noise.
    pub height_scale: f32,
    /// Height samples per side of the cached grid.
    pub grid_resolution: usize,
    /// Distance inside the world edge at which a transition starts.
    pub boundary_buffer: f32,
    /// Fade progress per second.
    pub transition_rate: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: WORLD_SIZE,
            height_scale: HEIGHT_SCALE,
            grid_resolution: GRID_RESOLUTION,
            boundary_buffer: BOUNDARY_BUFFER,
            transition_rate: TRANSITION_RATE,
        }
    }
}

/// Carpet flight model tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Downward acceleration before attenuation.
    pub gravity: f32,
    /// Fraction of `gravity` a carpet feels.
    pub gravity_scale: f32,
    /// Quadratic drag coefficient.
    pub drag_coefficient: f32,
    /// Per-tick velocity retention after integration.
    pub inertia: f32,
    /// Per-tick bank angle retention.
    pub bank_decay: f32,
    /// Per-tick vertical rate retention.
    pub vertical_rate_decay: f32,
    /// Speed cap without boost.
    pub max_speed: f32,
    /// Speed cap and forward force multiplier while boosting.
    pub boost_multiplier: f32,
    /// Lowest allowed height above the terrain.
    pub min_clearance: f32,
    /// Absolute altitude ceiling.
    pub max_altitude: f32,
    /// Height above the terrain below which avoidance lift kicks in.
    pub safety_threshold: f32,
    /// Lift per unit of clearance deficit.
    pub avoidance_strength: f32,
    /// Impact speed above which a floor hit bounces.
    pub bounce_threshold: f32,
    /// Fraction of impact speed kept by a bounce.
    pub restitution: f32,
    /// Largest visual tilt, in radians.
    pub max_bank: f32,
    /// Bank angle gained per unit of side force.
    pub bank_response: f32,
    /// Lateral force per radian of bank.
    pub bank_lateral_force: f32,
    /// Yaw rate per radian of bank.
    pub turn_rate: f32,
    /// Cap on climb and descent rate.
    pub max_vertical_rate: f32,
    /// Exponential smoothing factor for visual tilt.
    pub tilt_smoothing: f32,
    /// Carpet mass used to turn forces into acceleration.
    pub mass: f32,
    /// Force from full forward input.
    pub forward_force: f32,
    /// Force from full strafe input.
    pub side_force: f32,
    /// Force from full climb input.
    pub altitude_force: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_scale: GRAVITY_SCALE,
            drag_coefficient: DRAG_COEFFICIENT,
            inertia: INERTIA,
            bank_decay: BANK_DECAY,
            vertical_rate_decay: VERTICAL_RATE_DECAY,
            max_speed: MAX_SPEED,
            boost_multiplier: BOOST_MULTIPLIER,
            min_clearance: MIN_CLEARANCE,
            max_altitude: MAX_ALTITUDE,
            safety_threshold: TERRAIN_SAFETY_THRESHOLD,
            avoidance_strength: TERRAIN_AVOIDANCE_STRENGTH,
            bounce_threshold: BOUNCE_THRESHOLD,
            restitution: RESTITUTION,
            max_bank: MAX_BANK,
            bank_response: BANK_RESPONSE,
            bank_lateral_force: BANK_LATERAL_FORCE,
            turn_rate: TURN_RATE,
            max_vertical_rate: MAX_VERTICAL_RATE,
            tilt_smoothing: TILT_SMOOTHING,
            mass: CARPET_MASS,
            forward_force: FORWARD_FORCE,
            side_force: SIDE_FORCE,
            altitude_force: ALTITUDE_FORCE,
        }
    }
}

/// Mana node placement and collection tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Nodes scattered per world generation.
    pub count: usize,
    /// Node collision radius.
    pub radius: f32,
    /// Height of a node above the terrain.
    pub hover_height: f32,
    /// Fraction of the world, around the centre, that nodes are scattered over.
    pub spread: f32,
    /// Smallest mana value a node can carry.
    pub min_value: u32,
    /// Largest mana value a node can carry.
    pub max_value: u32,
    /// Collector radius of the local actor.
    pub collect_radius: f32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            count: NODE_COUNT,
            radius: NODE_RADIUS,
            hover_height: NODE_HOVER_HEIGHT,
            spread: NODE_SPREAD,
            min_value: NODE_MIN_VALUE,
            max_value: NODE_MAX_VALUE,
            collect_radius: COLLECT_RADIUS,
        }
    }
}

/// One row of the spell table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpellSpec {
    /// Projectile family, or the shield.
    pub kind: SpellKind,
    /// Damage dealt on actor impact; ignored for shields.
    pub damage: u16,
    /// Projectile speed; ignored for shields.
    pub speed: f32,
    /// Seconds the caster must wait before the next cast.
    pub cooldown: f32,
    /// RGB colour forwarded with impact events for cosmetic feedback.
    pub color_hint: u32,
}

/// Spell table and projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    /// Castable spells, indexed by slot.
    pub table: Vec<SpellSpec>,
    /// Seconds a projectile flies before it fizzles.
    pub projectile_lifetime: f32,
    /// Distance ahead of the caster where projectiles spawn.
    pub spawn_offset: f32,
    /// Distance at which a projectile strikes an actor.
    pub hit_radius: f32,
    /// Seconds a shield lasts.
    pub shield_duration: f32,
    /// Whether shields absorb damage.
    pub shield_policy: ShieldPolicy,
    /// Health every actor starts with.
    pub max_health: u16,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            table: vec![
                SpellSpec {
                    kind: SpellKind::Fireball,
                    damage: 20,
                    speed: 60.0,
                    cooldown: 0.5,
                    color_hint: 0x00ff_5500,
                },
                SpellSpec {
                    kind: SpellKind::Frost,
                    damage: 15,
                    speed: 80.0,
                    cooldown: 0.3,
                    color_hint: 0x0066_ccff,
                },
                SpellSpec {
                    kind: SpellKind::Lightning,
                    damage: 35,
                    speed: 120.0,
                    cooldown: 1.5,
                    color_hint: 0x00ff_ff66,
                },
                SpellSpec {
                    kind: SpellKind::Shield,
                    damage: 0,
                    speed: 0.0,
                    cooldown: 5.0,
                    color_hint: 0x0066_ff99,
                },
            ],
            projectile_lifetime: PROJECTILE_LIFETIME,
            spawn_offset: PROJECTILE_SPAWN_OFFSET,
            hit_radius: PROJECTILE_HIT_RADIUS,
            shield_duration: SHIELD_DURATION,
            shield_policy: ShieldPolicy::default(),
            max_health: MAX_HEALTH,
        }
    }
}

/// Simulated multiplayer tuning for the loopback channel and remote smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Simulated remote players on the loopback channel.
    pub bot_count: usize,
    /// Largest offset of a bot snapshot from its anchor.
    pub bot_jitter: f32,
    /// Altitude bots report.
    pub bot_altitude: f32,
    /// Radius of the ring bot anchors sit on.
    pub bot_ring_radius: f32,
    /// Seconds between bot snapshots.
    pub update_interval: f32,
    /// Fraction of the gap to its target a remote closes per tick.
    pub interpolation_factor: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bot_count: BOT_COUNT,
            bot_jitter: BOT_JITTER,
            bot_altitude: BOT_ALTITUDE,
            bot_ring_radius: BOT_RING_RADIUS,
            update_interval: BOT_UPDATE_INTERVAL,
            interpolation_factor: REMOTE_INTERPOLATION,
        }
    }
}

/// Complete configuration for a [`crate::Simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Terrain and boundary.
    pub world: WorldConfig,
    /// Flight model.
    pub flight: FlightConfig,
    /// Mana nodes.
    pub nodes: NodeConfig,
    /// Spells and projectiles.
    pub spells: SpellConfig,
    /// Remote players.
    pub network: NetworkConfig,
    /// Largest `dt` integrated by a single tick.
    pub max_tick_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            flight: FlightConfig::default(),
            nodes: NodeConfig::default(),
            spells: SpellConfig::default(),
            network: NetworkConfig::default(),
            max_tick_dt: MAX_TICK_DT,
        }
    }
}

impl SimConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value fails [`SimConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use skycarpet::config::SimConfig;
    /// let cfg = SimConfig::from_json_str(r#"{ "world": { "size": 500.0 } }"#).unwrap();
    /// assert_eq!(cfg.world.size, 500.0);
    /// assert_eq!(cfg.world.height_scale, 60.0);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`SimConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the values the simulation cannot clamp into a usable state.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("world.size", self.world.size)?;
        positive("world.transition_rate", self.world.transition_rate)?;
        if !(self.world.height_scale.is_finite() && self.world.height_scale >= 0.0) {
            return Err(invalid(
                "world.height_scale",
                format!(
                    "must be finite and non-negative, got {}",
                    self.world.height_scale
                ),
            ));
        }
        if self.world.grid_resolution < 2 {
            return Err(invalid(
                "world.grid_resolution",
                format!("must be at least 2, got {}", self.world.grid_resolution),
            ));
        }
        if self.world.boundary_buffer < 0.0 || self.world.boundary_buffer >= self.world.size / 2.0
        {
            return Err(invalid(
                "world.boundary_buffer",
                format!(
                    "must lie in [0, {}), got {}",
                    self.world.size / 2.0,
                    self.world.boundary_buffer
                ),
            ));
        }
        positive("flight.max_speed", self.flight.max_speed)?;
        if self.flight.max_altitude <= self.flight.min_clearance {
            return Err(invalid(
                "flight.max_altitude",
                format!(
                    "must exceed min_clearance ({}), got {}",
                    self.flight.min_clearance, self.flight.max_altitude
                ),
            ));
        }
        if self.nodes.min_value == 0 || self.nodes.min_value > self.nodes.max_value {
            return Err(invalid(
                "nodes.min_value",
                format!(
                    "must be positive and not exceed max_value ({}), got {}",
                    self.nodes.max_value, self.nodes.min_value
                ),
            ));
        }
        if self.spells.table.is_empty() {
            return Err(invalid("spells.table", "must contain at least one spell".into()));
        }
        if self.spells.max_health == 0 {
            return Err(invalid("spells.max_health", "must be positive".into()));
        }
        positive("max_tick_dt", self.max_tick_dt)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}
