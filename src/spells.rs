//! Spell casting, projectiles and shields.
//!
//! Each actor carries a single cooldown, armed by whichever spell it last
//! cast. Damaging spells launch a [`Projectile`] that flies straight along
//! the caster's heading until it expires, drops below the terrain, or comes
//! within the hit radius of an actor other than its owner, whichever is
//! checked first in that order. The shield spell attaches a timed
//! [`Shield`] instead of spawning anything.

use glam::Vec3;
use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, Shield};
use crate::config::{SpellConfig, SpellSpec};
use crate::numeric::sanitize_dt;
use crate::terrain::TerrainSampler;
use crate::vector_math::forward_from_yaw;

/// Spell families available in the spell table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellKind {
    /// Slow, heavy projectile.
    Fireball,
    /// Quick, light projectile.
    Frost,
    /// Fastest and hardest-hitting projectile, on a long cooldown.
    Lightning,
    /// Protective buff on the caster.
    Shield,
}

impl SpellKind {
    /// Whether casting attaches a shield rather than launching a projectile.
    #[must_use]
    pub const fn is_shield(self) -> bool {
        matches!(self, Self::Shield)
    }

    /// Lower-case display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fireball => "fireball",
            Self::Frost => "frost",
            Self::Lightning => "lightning",
            Self::Shield => "shield",
        }
    }
}

/// Decides how much of a projectile's damage reaches its target.
pub trait DamagePolicy {
    /// Damage to subtract from `target`'s health for a hit worth `damage`.
    fn incoming_damage(&self, target: &Actor, damage: u16) -> u16;
}

/// Built-in damage policies keyed on the target's shield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShieldPolicy {
    /// Shields are cosmetic; hits always land in full.
    #[default]
    Ignore,
    /// An active shield absorbs the whole hit.
    Absorb,
}

impl DamagePolicy for ShieldPolicy {
    fn incoming_damage(&self, target: &Actor, damage: u16) -> u16 {
        match self {
            Self::Ignore => damage,
            Self::Absorb if target.shield.is_some() => 0,
            Self::Absorb => damage,
        }
    }
}

/// Identifier of a live projectile, unique within one [`SpellModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(pub u64);

/// A spell in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Identifier unique within the owning model.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec3,
    /// Units per second.
    pub velocity: Vec3,
    /// Seconds left before the projectile fizzles.
    pub lifetime: f32,
    /// Damage offered to the damage policy on an actor hit.
    pub damage: u16,
    /// Caster; never hit by its own projectile.
    pub owner: ActorId,
    /// Spell family.
    pub kind: SpellKind,
    /// RGB colour carried into impact events.
    pub color_hint: u32,
}

/// Result of a cast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// A projectile was launched.
    Launched(ProjectileId),
    /// A shield was attached to the caster.
    Shielded,
    /// The caster's cooldown has not elapsed; nothing happened.
    OnCooldown,
    /// The spell table is empty; nothing happened.
    Rejected,
}

/// Something that happened during [`SpellModel::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpellEvent {
    /// A projectile ran out of lifetime.
    Expired {
        /// The fizzled projectile.
        projectile: ProjectileId,
        /// Where it fizzled.
        position: Vec3,
    },
    /// A projectile dropped below the terrain surface.
    TerrainImpact {
        /// The projectile that hit the ground.
        projectile: ProjectileId,
        /// Impact point.
        position: Vec3,
        /// RGB colour of the spell.
        color_hint: u32,
    },
    /// A projectile struck an actor.
    ActorImpact {
        /// The projectile that struck.
        projectile: ProjectileId,
        /// The actor that was hit.
        target: ActorId,
        /// Impact point.
        position: Vec3,
        /// Health actually removed after the damage policy and saturation.
        damage: u16,
        /// RGB colour of the spell.
        color_hint: u32,
    },
    /// An actor's shield ran out.
    ShieldExpired {
        /// The actor whose shield expired.
        actor: ActorId,
    },
}

impl SpellEvent {
    /// Position and colour of impacts the host should render.
    #[must_use]
    pub const fn impact(&self) -> Option<(Vec3, u32)> {
        match *self {
            Self::TerrainImpact {
                position,
                color_hint,
                ..
            }
            | Self::ActorImpact {
                position,
                color_hint,
                ..
            } => Some((position, color_hint)),
            Self::Expired { .. } | Self::ShieldExpired { .. } => None,
        }
    }
}

/// Cooldowns, projectiles and shields for every actor.
#[derive(Debug, Clone)]
pub struct SpellModel<P = ShieldPolicy> {
    config: SpellConfig,
    policy: P,
    cooldowns: HashMap<ActorId, f32>,
    projectiles: Vec<Projectile>,
    next_id: u64,
}

impl SpellModel<ShieldPolicy> {
    /// Creates a model using the shield policy named in `config`.
    #[must_use]
    pub fn new(config: SpellConfig) -> Self {
        let policy = config.shield_policy;
        Self::with_policy(config, policy)
    }
}

impl<P: DamagePolicy> SpellModel<P> {
    /// Creates a model with a custom damage policy.
    #[must_use]
    pub fn with_policy(config: SpellConfig, policy: P) -> Self {
        Self {
            config,
            policy,
            cooldowns: HashMap::new(),
            projectiles: Vec::new(),
            next_id: 0,
        }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &SpellConfig {
        &self.config
    }

    /// Live projectiles in launch order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Seconds until `actor` may cast again; zero when idle.
    #[must_use]
    pub fn cooldown_remaining(&self, actor: ActorId) -> f32 {
        self.cooldowns.get(&actor).copied().unwrap_or(0.0)
    }

    /// Drops every live projectile without reporting it.
    pub fn clear_projectiles(&mut self) {
        if !self.projectiles.is_empty() {
            debug!("clearing {} projectiles", self.projectiles.len());
        }
        self.projectiles.clear();
    }

    /// The table row `slot` selects, clamped to the last row.
    #[must_use]
    pub fn spell_for_slot(&self, slot: usize) -> Option<&SpellSpec> {
        let last = self.config.table.len().checked_sub(1)?;
        self.config.table.get(slot.min(last))
    }

    /// Casts the spell in `slot` for `actor`.
    ///
    /// The slot is clamped to the table and stored as the actor's current
    /// slot. A cast during cooldown does nothing.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use skycarpet::actor::{Actor, ActorId};
    /// use skycarpet::config::SpellConfig;
    /// use skycarpet::spells::{CastOutcome, SpellModel};
    ///
    /// let mut spells = SpellModel::new(SpellConfig::default());
    /// let mut caster = Actor::new(ActorId(1), Vec3::new(0.0, 50.0, 0.0), 100);
    /// assert!(matches!(spells.cast(&mut caster, 0), CastOutcome::Launched(_)));
    /// assert_eq!(spells.cast(&mut caster, 0), CastOutcome::OnCooldown);
    /// ```
    pub fn cast(&mut self, actor: &mut Actor, slot: usize) -> CastOutcome {
        if self.cooldown_remaining(actor.id) > 0.0 {
            return CastOutcome::OnCooldown;
        }
        let Some(last) = self.config.table.len().checked_sub(1) else {
            debug!("actor {} cast with an empty spell table", actor.id.0);
            return CastOutcome::Rejected;
        };
        actor.spell_slot = slot.min(last);
        let Some(&entry) = self.config.table.get(actor.spell_slot) else {
            return CastOutcome::Rejected;
        };
        self.cooldowns.insert(actor.id, entry.cooldown.max(0.0));

        if entry.kind.is_shield() {
            actor.shield = Some(Shield {
                remaining: self.config.shield_duration,
            });
            debug!("actor {} raised a shield", actor.id.0);
            return CastOutcome::Shielded;
        }

        let forward = forward_from_yaw(actor.orientation.yaw);
        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        self.projectiles.push(Projectile {
            id,
            position: actor.position + forward * self.config.spawn_offset,
            velocity: forward * entry.speed,
            lifetime: self.config.projectile_lifetime,
            damage: entry.damage,
            owner: actor.id,
            kind: entry.kind,
            color_hint: entry.color_hint,
        });
        debug!(
            "actor {} launched {} projectile {}",
            actor.id.0,
            entry.kind.name(),
            id.0
        );
        CastOutcome::Launched(id)
    }

    /// Advances cooldowns, shields and projectiles by `dt` seconds.
    ///
    /// `actors` is searched in order for projectile hits, so the first
    /// non-owner within the hit radius takes the damage.
    pub fn update<T: TerrainSampler + ?Sized>(
        &mut self,
        dt: f32,
        terrain: &T,
        actors: &mut [&mut Actor],
    ) -> Vec<SpellEvent> {
        let step_dt = sanitize_dt(dt, f32::MAX);
        let mut events = Vec::new();

        self.cooldowns.retain(|_, remaining| {
            *remaining -= step_dt;
            *remaining > 0.0
        });
        tick_shields(step_dt, actors, &mut events);

        let in_flight = std::mem::take(&mut self.projectiles);
        for mut projectile in in_flight {
            projectile.position += projectile.velocity * step_dt;
            projectile.lifetime -= step_dt;
            match self.resolve(&projectile, terrain, actors) {
                Some(event) => events.push(event),
                None => self.projectiles.push(projectile),
            }
        }
        events
    }

    /// Termination check for one advanced projectile: expiry, then terrain,
    /// then the first non-owner actor in range.
    fn resolve<T: TerrainSampler + ?Sized>(
        &self,
        projectile: &Projectile,
        terrain: &T,
        actors: &mut [&mut Actor],
    ) -> Option<SpellEvent> {
        if projectile.lifetime <= 0.0 {
            debug!("projectile {} expired", projectile.id.0);
            return Some(SpellEvent::Expired {
                projectile: projectile.id,
                position: projectile.position,
            });
        }

        let ground = terrain.sample_height(projectile.position.x, projectile.position.z);
        if projectile.position.y < ground {
            debug!("projectile {} hit terrain", projectile.id.0);
            return Some(SpellEvent::TerrainImpact {
                projectile: projectile.id,
                position: projectile.position,
                color_hint: projectile.color_hint,
            });
        }

        let radius = self.config.hit_radius;
        let target = actors.iter_mut().find(|actor| {
            actor.id != projectile.owner && actor.position.distance(projectile.position) < radius
        })?;
        let incoming = self.policy.incoming_damage(&**target, projectile.damage);
        let removed = target.health.apply_damage(incoming);
        debug!(
            "projectile {} hit actor {} for {removed}",
            projectile.id.0, target.id.0
        );
        Some(SpellEvent::ActorImpact {
            projectile: projectile.id,
            target: target.id,
            position: projectile.position,
            damage: removed,
            color_hint: projectile.color_hint,
        })
    }
}

fn tick_shields(dt: f32, actors: &mut [&mut Actor], events: &mut Vec<SpellEvent>) {
    for actor in actors.iter_mut() {
        let Some(shield) = actor.shield.as_mut() else {
            continue;
        };
        shield.remaining -= dt;
        if shield.remaining <= 0.0 {
            actor.shield = None;
            debug!("shield on actor {} expired", actor.id.0);
            events.push(SpellEvent::ShieldExpired { actor: actor.id });
        }
    }
}
