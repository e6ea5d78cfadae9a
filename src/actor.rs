//! Carpet-riding actors and the roster that separates local from remote.
//!
//! Exactly one [`Actor`] is local and integrated by the flight model. Remote
//! actors live in [`RemoteActor`] wrappers and only ever move by smoothing
//! toward the last snapshot received over the update channel.

use glam::Vec3;
use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::net::RemoteSnapshot;
use crate::numeric::finite_or;
use crate::terrain::TerrainSampler;
use crate::vector_math::lerp_angle;

/// Stable actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl ActorId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

/// Heading and presentation tilt, in radians.
///
/// `yaw` is physical. `pitch` and `roll` are visual only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Heading about +Y; zero faces `-Z`.
    pub yaw: f32,
    /// Nose-up tilt.
    pub pitch: f32,
    /// Right-wing-down tilt.
    pub roll: f32,
}

/// Health bounded to `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: u16,
    max: u16,
}

impl Health {
    /// Full health with the given maximum.
    #[must_use]
    pub const fn full(max: u16) -> Self {
        Self { current: max, max }
    }

    /// Current health.
    #[must_use]
    pub const fn current(self) -> u16 {
        self.current
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(self) -> u16 {
        self.max
    }

    /// Sets health, clamped to `[0, max]`.
    pub fn set(&mut self, value: u16) {
        self.current = value.min(self.max);
    }

    /// Subtracts `amount`, saturating at zero. Returns the health removed.
    ///
    /// # Examples
    /// ```
    /// use skycarpet::actor::Health;
    /// let mut health = Health::full(100);
    /// assert_eq!(health.apply_damage(30), 30);
    /// assert_eq!(health.apply_damage(500), 70);
    /// assert_eq!(health.current(), 0);
    /// ```
    pub fn apply_damage(&mut self, amount: u16) -> u16 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Whether health has reached zero.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.current == 0
    }
}

/// Timed shield buff attached by the shield spell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shield {
    /// Seconds until the shield expires.
    pub remaining: f32,
}

/// Complete state of one carpet rider.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Stable identifier shared with the update channel.
    pub id: ActorId,
    /// World position; `y` is altitude.
    pub position: Vec3,
    /// Heading plus visual tilt.
    pub orientation: Orientation,
    /// Units per second.
    pub velocity: Vec3,
    /// Per-tick force accumulator; cleared at the end of every flight step.
    pub acceleration: Vec3,
    /// Climb/descent rate driven by altitude input.
    pub vertical_rate: f32,
    /// Physical bank angle; source of lateral force and banked turning.
    pub bank_angle: f32,
    /// Raises the speed cap by the boost multiplier while set.
    pub boosting: bool,
    /// Mana gathered from nodes.
    pub mana: u32,
    /// Bounded hit points.
    pub health: Health,
    /// Spell table row of the most recent cast.
    pub spell_slot: usize,
    /// Active shield, if any.
    pub shield: Option<Shield>,
}

impl Actor {
    /// Creates an actor at rest facing `-Z`.
    #[must_use]
    pub fn new(id: ActorId, position: Vec3, max_health: u16) -> Self {
        debug!("creating actor {} at {position:?}", id.0);
        Self {
            id,
            position,
            orientation: Orientation::default(),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            vertical_rate: 0.0,
            bank_angle: 0.0,
            boosting: false,
            mana: 0,
            health: Health::full(max_health),
            spell_slot: 0,
            shield: None,
        }
    }

    /// Places the actor at `position` with all motion state cleared.
    pub fn reset_motion(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.vertical_rate = 0.0;
        self.bank_angle = 0.0;
        self.orientation.pitch = 0.0;
        self.orientation.roll = 0.0;
    }
}

/// Target state last received for a remote actor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RemoteTarget {
    position: Vec3,
    yaw: f32,
}

/// A remote actor: state is smoothed toward snapshots, never integrated.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteActor {
    actor: Actor,
    target: RemoteTarget,
}

impl RemoteActor {
    fn new(actor: Actor) -> Self {
        let target = RemoteTarget {
            position: actor.position,
            yaw: actor.orientation.yaw,
        };
        Self { actor, target }
    }

    /// Current smoothed state.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Last received target position.
    #[must_use]
    pub const fn target_position(&self) -> Vec3 {
        self.target.position
    }

    /// Merges a snapshot. Missing or non-finite fields keep their old value.
    ///
    /// Position and yaw become smoothing targets; mana and health apply
    /// immediately because they are discrete.
    pub fn apply_snapshot(&mut self, snapshot: &RemoteSnapshot) {
        let old = self.target.position;
        self.target.position = Vec3::new(
            snapshot.x.map_or(old.x, |v| finite_or(v, old.x)),
            snapshot.y.map_or(old.y, |v| finite_or(v, old.y)),
            snapshot.z.map_or(old.z, |v| finite_or(v, old.z)),
        );
        if let Some(yaw) = snapshot.rotation_y {
            self.target.yaw = finite_or(yaw, self.target.yaw);
        }
        if let Some(mana) = snapshot.mana {
            self.actor.mana = mana;
        }
        if let Some(health) = snapshot.health {
            self.actor.health.set(health);
        }
    }

    /// Moves `factor` of the way toward the target, then keeps the result
    /// inside the legal altitude band above `terrain`.
    pub fn smooth<T: TerrainSampler + ?Sized>(
        &mut self,
        factor: f32,
        terrain: &T,
        bounds: AltitudeBand,
    ) {
        let t = finite_or(factor, 0.0).clamp(0.0, 1.0);
        let mut next = self.actor.position.lerp(self.target.position, t);
        next.y = bounds.clamp(next.y, terrain.sample_height(next.x, next.z));
        self.actor.position = next;
        self.actor.orientation.yaw = lerp_angle(self.actor.orientation.yaw, self.target.yaw, t);
    }
}

/// Legal altitude band relative to the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeBand {
    /// Lowest allowed height above the terrain.
    pub min_clearance: f32,
    /// Absolute altitude cap.
    pub ceiling: f32,
}

impl AltitudeBand {
    /// Clamps `y` into `[ground + min_clearance, ceiling]`; the floor wins
    /// when the terrain lifts it above the ceiling.
    #[must_use]
    pub const fn clamp(self, y: f32, ground: f32) -> f32 {
        let floor = ground + self.min_clearance;
        y.min(self.ceiling).max(floor)
    }
}

/// Owner of the single local actor and all remote actors.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    local: Actor,
    remote: HashMap<ActorId, RemoteActor>,
    max_health: u16,
}

impl Roster {
    /// Creates a roster around the local actor.
    #[must_use]
    pub fn new(local: Actor) -> Self {
        let max_health = local.health.max();
        Self {
            local,
            remote: HashMap::new(),
            max_health,
        }
    }

    /// The locally integrated actor.
    #[must_use]
    pub const fn local(&self) -> &Actor {
        &self.local
    }

    /// Mutable access to the locally integrated actor.
    pub const fn local_mut(&mut self) -> &mut Actor {
        &mut self.local
    }

    /// Looks up a remote actor.
    #[must_use]
    pub fn remote(&self, id: ActorId) -> Option<&RemoteActor> {
        self.remote.get(&id)
    }

    /// Number of remote actors.
    #[must_use]
    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    /// Iterates remote actors in unspecified order.
    pub fn remotes(&self) -> impl Iterator<Item = &RemoteActor> {
        self.remote.values()
    }

    /// Registers a remote actor. Joining with the local id or an existing
    /// id is ignored.
    pub fn join(&mut self, id: ActorId, position: Vec3) -> bool {
        if id == self.local.id || self.remote.contains_key(&id) {
            debug!("ignoring duplicate join for actor {}", id.0);
            return false;
        }
        debug!("remote actor {} joined", id.0);
        self.remote
            .insert(id, RemoteActor::new(Actor::new(id, position, self.max_health)));
        true
    }

    /// Removes a remote actor. Returns whether it was present.
    pub fn leave(&mut self, id: ActorId) -> bool {
        let removed = self.remote.remove(&id).is_some();
        if removed {
            debug!("remote actor {} left", id.0);
        }
        removed
    }

    /// Routes a snapshot to its remote actor. Unknown ids are ignored.
    pub fn apply_snapshot(&mut self, snapshot: &RemoteSnapshot) -> bool {
        match self.remote.get_mut(&ActorId(snapshot.id)) {
            Some(remote) => {
                remote.apply_snapshot(snapshot);
                true
            }
            None => {
                debug!("snapshot for unknown actor {} ignored", snapshot.id);
                false
            }
        }
    }

    /// Smooths every remote actor toward its target.
    pub fn smooth_remotes<T: TerrainSampler + ?Sized>(
        &mut self,
        factor: f32,
        terrain: &T,
        bounds: AltitudeBand,
    ) {
        for remote in self.remote.values_mut() {
            remote.smooth(factor, terrain, bounds);
        }
    }

    /// Mutable references to every actor, local first, remotes by id.
    ///
    /// The stable order keeps projectile hit resolution reproducible.
    pub fn actors_mut(&mut self) -> Vec<&mut Actor> {
        let mut remotes: Vec<&mut RemoteActor> = self.remote.values_mut().collect();
        remotes.sort_by_key(|remote| remote.actor.id);
        let mut all = Vec::with_capacity(remotes.len() + 1);
        all.push(&mut self.local);
        all.extend(remotes.into_iter().map(|remote| &mut remote.actor));
        all
    }

    /// Removes every remote actor.
    pub fn clear_remotes(&mut self) {
        self.remote.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    struct Flat(f32);

    impl TerrainSampler for Flat {
        fn sample_height(&self, _x: f32, _z: f32) -> f32 {
            self.0
        }
    }

    const BAND: AltitudeBand = AltitudeBand {
        min_clearance: 2.0,
        ceiling: 200.0,
    };

    #[fixture]
    fn roster() -> Roster {
        let mut roster = Roster::new(Actor::new(ActorId(1), Vec3::new(0.0, 50.0, 0.0), 100));
        assert!(roster.join(ActorId(2), Vec3::new(10.0, 50.0, 10.0)));
        roster
    }

    fn snapshot(id: u64) -> RemoteSnapshot {
        RemoteSnapshot {
            id,
            ..RemoteSnapshot::default()
        }
    }

    #[rstest]
    fn duplicate_and_local_joins_are_ignored(mut roster: Roster) {
        assert!(!roster.join(ActorId(2), Vec3::ZERO));
        assert!(!roster.join(ActorId(1), Vec3::ZERO));
        assert_eq!(roster.remote_count(), 1);
    }

    #[rstest]
    fn partial_snapshot_leaves_missing_fields_unchanged(mut roster: Roster) {
        let update = RemoteSnapshot {
            x: Some(20.0),
            health: Some(40),
            ..snapshot(2)
        };
        assert!(roster.apply_snapshot(&update));
        let remote = roster.remote(ActorId(2)).expect("remote present");
        assert_eq!(remote.target_position(), Vec3::new(20.0, 50.0, 10.0));
        assert_eq!(remote.actor().health.current(), 40);
        assert_eq!(remote.actor().mana, 0);
    }

    #[rstest]
    fn non_finite_snapshot_fields_are_ignored(mut roster: Roster) {
        let update = RemoteSnapshot {
            y: Some(f32::NAN),
            rotation_y: Some(f32::INFINITY),
            ..snapshot(2)
        };
        roster.apply_snapshot(&update);
        let remote = roster.remote(ActorId(2)).expect("remote present");
        assert_eq!(remote.target_position().y, 50.0);
    }

    #[rstest]
    fn unknown_snapshot_is_ignored(mut roster: Roster) {
        assert!(!roster.apply_snapshot(&snapshot(99)));
    }

    #[rstest]
    fn smoothing_moves_a_fraction_of_the_gap(mut roster: Roster) {
        roster.apply_snapshot(&RemoteSnapshot {
            x: Some(20.0),
            ..snapshot(2)
        });
        roster.smooth_remotes(0.1, &Flat(0.0), BAND);
        let remote = roster.remote(ActorId(2)).expect("remote present");
        assert_relative_eq!(remote.actor().position.x, 11.0, epsilon = 1e-5);
    }

    #[rstest]
    fn smoothing_respects_altitude_band(mut roster: Roster) {
        roster.apply_snapshot(&RemoteSnapshot {
            y: Some(-100.0),
            ..snapshot(2)
        });
        for _ in 0..100 {
            roster.smooth_remotes(0.5, &Flat(10.0), BAND);
        }
        let remote = roster.remote(ActorId(2)).expect("remote present");
        assert_relative_eq!(remote.actor().position.y, 12.0);
    }

    #[rstest]
    fn actors_mut_lists_local_first(mut roster: Roster) {
        roster.join(ActorId(5), Vec3::ZERO);
        let ids: Vec<ActorId> = roster.actors_mut().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![ActorId(1), ActorId(2), ActorId(5)]);
    }

    #[rstest]
    fn health_set_is_clamped() {
        let mut health = Health::full(100);
        health.set(250);
        assert_eq!(health.current(), 100);
        assert!(!health.is_depleted());
    }
}
