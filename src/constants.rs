//! Default tuning constants for the flight and world-interaction model.
//!
//! These values seed [`crate::config::SimConfig::default`]. They are tuning
//! numbers rather than derived quantities, so callers that want a different
//! balance should override them through configuration instead of editing
//! this module.

/// Side length of the square world, in world units.
pub const WORLD_SIZE: f32 = 1000.0;
/// Multiplier applied to the normalised noise sum to obtain elevation.
pub const HEIGHT_SCALE: f32 = 60.0;
/// Samples per side of the cached height grid.
pub const GRID_RESOLUTION: usize = 100;
/// Distance from the world edge at which a transition starts.
pub const BOUNDARY_BUFFER: f32 = 50.0;
/// Transition alpha gained per second; a full transition spans `2 / rate`.
pub const TRANSITION_RATE: f32 = 1.0;
/// Upper bound on randomly drawn terrain seeds.
pub const MAX_TERRAIN_SEED: f64 = 1000.0;

/// Full-strength gravity before attenuation.
pub const GRAVITY: f32 = 9.8;
/// Fraction of gravity the floating carpet feels.
pub const GRAVITY_SCALE: f32 = 0.1;
/// Quadratic drag coefficient.
pub const DRAG_COEFFICIENT: f32 = 0.002;
/// Per-tick velocity retention.
pub const INERTIA: f32 = 0.98;
/// Per-tick bank angle retention.
pub const BANK_DECAY: f32 = 0.95;
/// Per-tick vertical rate retention.
pub const VERTICAL_RATE_DECAY: f32 = 0.9;
/// Speed cap without boost.
pub const MAX_SPEED: f32 = 50.0;
/// Multiplier on forward force and speed cap while boosting.
pub const BOOST_MULTIPLIER: f32 = 2.0;
/// Minimum height above terrain.
pub const MIN_CLEARANCE: f32 = 2.0;
/// Hard altitude ceiling.
pub const MAX_ALTITUDE: f32 = 200.0;
/// Height above terrain below which the avoidance lift engages.
pub const TERRAIN_SAFETY_THRESHOLD: f32 = 8.0;
/// Lift per unit of clearance deficit.
pub const TERRAIN_AVOIDANCE_STRENGTH: f32 = 4.0;
/// Downward impact speed above which the carpet bounces off the floor.
pub const BOUNCE_THRESHOLD: f32 = 5.0;
/// Fraction of impact speed returned by a bounce.
pub const RESTITUTION: f32 = 0.3;
/// Maximum bank and visual tilt, in radians (45 degrees).
pub const MAX_BANK: f32 = std::f32::consts::FRAC_PI_4;
/// Bank change per unit of side force.
pub const BANK_RESPONSE: f32 = 0.002;
/// Lateral acceleration per radian of bank.
pub const BANK_LATERAL_FORCE: f32 = 10.0;
/// Yaw rate per radian of bank, in radians per second.
pub const TURN_RATE: f32 = 1.5;
/// Largest magnitude the vertical rate may reach.
pub const MAX_VERTICAL_RATE: f32 = 20.0;
/// Exponential smoothing rate for visual tilt, per second.
pub const TILT_SMOOTHING: f32 = 5.0;
/// Carpet mass used to convert forces to accelerations.
pub const CARPET_MASS: f32 = 1.0;
/// Forward force applied at full forward input.
pub const FORWARD_FORCE: f32 = 30.0;
/// Side force applied at full lateral input.
pub const SIDE_FORCE: f32 = 20.0;
/// Altitude force applied at full vertical input.
pub const ALTITUDE_FORCE: f32 = 15.0;

/// Mana nodes scattered per world generation.
pub const NODE_COUNT: usize = 50;
/// Collision radius of a mana node.
pub const NODE_RADIUS: f32 = 2.0;
/// Height of a node above the terrain.
pub const NODE_HOVER_HEIGHT: f32 = 3.0;
/// Fraction of the world extent used for node placement.
pub const NODE_SPREAD: f32 = 0.8;
/// Smallest node reward.
pub const NODE_MIN_VALUE: u32 = 5;
/// Largest node reward.
pub const NODE_MAX_VALUE: u32 = 25;
/// Radius around the actor used for collection.
pub const COLLECT_RADIUS: f32 = 3.0;

/// Seconds a projectile lives before expiring.
pub const PROJECTILE_LIFETIME: f32 = 3.0;
/// Distance ahead of the caster at which projectiles spawn.
pub const PROJECTILE_SPAWN_OFFSET: f32 = 2.0;
/// Distance at which a projectile hits an actor.
pub const PROJECTILE_HIT_RADIUS: f32 = 3.0;
/// Seconds a shield buff lasts.
pub const SHIELD_DURATION: f32 = 5.0;
/// Health of a freshly spawned actor.
pub const MAX_HEALTH: u16 = 100;

/// Bots announced by the loopback channel.
pub const BOT_COUNT: usize = 3;
/// Maximum horizontal jitter applied to bot snapshots.
pub const BOT_JITTER: f32 = 2.0;
/// Altitude bots report.
pub const BOT_ALTITUDE: f32 = 90.0;
/// Distance of bot anchors from the world centre.
pub const BOT_RING_RADIUS: f32 = 60.0;
/// Seconds between bot snapshot batches.
pub const BOT_UPDATE_INTERVAL: f32 = 0.1;
/// Fraction of the remaining gap closed per tick by remote smoothing.
pub const REMOTE_INTERPOLATION: f32 = 0.1;

/// Largest `dt` a single tick will integrate.
pub const MAX_TICK_DT: f32 = 0.1;
