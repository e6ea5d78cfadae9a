//! Convenience constructors for flight-related records used in tests.

use glam::Vec3;
use skycarpet::actor::{Actor, ActorId};
use skycarpet::terrain::TerrainSampler;
use skycarpet::MAX_HEALTH;

/// Terrain at a constant elevation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatTerrain(pub f32);

impl TerrainSampler for FlatTerrain {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Terrain rising linearly along +X: `height = base + slope * x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampTerrain {
    pub base: f32,
    pub slope: f32,
}

impl TerrainSampler for RampTerrain {
    fn sample_height(&self, x: f32, _z: f32) -> f32 {
        self.base + self.slope * x
    }
}

/// Create an actor at rest with full default health.
///
/// # Examples
/// ```
/// use test_utils::physics::actor_at;
/// let actor = actor_at(3, 1.0, 2.0, 3.0);
/// assert_eq!(actor.id.0, 3);
/// assert_eq!(actor.position.y, 2.0);
/// ```
pub fn actor_at(id: u64, x: f32, y: f32, z: f32) -> Actor {
    Actor::new(ActorId(id), Vec3::new(x, y, z), MAX_HEALTH)
}

/// Create an actor facing `yaw` radians.
pub fn actor_facing(id: u64, position: Vec3, yaw: f32) -> Actor {
    let mut actor = Actor::new(ActorId(id), position, MAX_HEALTH);
    actor.orientation.yaw = yaw;
    actor
}
