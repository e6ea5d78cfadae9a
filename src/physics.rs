//! Carpet flight model.
//!
//! [`FlightModel`] integrates the local actor once per tick: forces are
//! accumulated through the `apply_*` primitives and the environmental terms
//! in [`FlightModel::step`], integrated with inertia and a speed cap, then
//! the result is clamped into the legal altitude band. Visual tilt is
//! derived last and never feeds back into the physics.

use glam::Vec3;
use log::warn;

use crate::actor::{Actor, AltitudeBand};
use crate::config::FlightConfig;
use crate::numeric::{finite_or, sanitize_dt};
use crate::terrain::TerrainSampler;
use crate::vector_math::{forward_from_yaw, right_from_yaw, sanitize_vec, smooth_toward, wrap_angle};

/// Smallest acceptable mass to avoid numerically unstable accelerations.
const MIN_MASS: f32 = 1e-6;

/// Computes acceleration from a force vector and mass.
///
/// Returns `None` if `mass` is non-positive or effectively zero (see
/// [`MIN_MASS`]). The calculation applies `F=ma` for each component
/// independently.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use skycarpet::applied_acceleration;
/// let a = applied_acceleration(Vec3::new(7.0, -14.0, 21.0), 7.0).unwrap();
/// assert!((a.x - 1.0).abs() < 1e-6);
/// assert!((a.y + 2.0).abs() < 1e-6);
/// assert!((a.z - 3.0).abs() < 1e-6);
/// assert!(applied_acceleration(Vec3::X, 0.0).is_none());
/// ```
#[must_use]
pub fn applied_acceleration(force: Vec3, mass: f32) -> Option<Vec3> {
    if mass.is_finite() && mass > MIN_MASS {
        Some(force / mass)
    } else {
        None
    }
}

/// Integrates carpet motion for one actor at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightModel {
    config: FlightConfig,
}

impl FlightModel {
    /// Creates a model with the given tuning.
    #[must_use]
    pub const fn new(config: FlightConfig) -> Self {
        Self { config }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Legal altitude band enforced after every step.
    #[must_use]
    pub const fn altitude_band(&self) -> AltitudeBand {
        AltitudeBand {
            min_clearance: self.config.min_clearance,
            ceiling: self.config.max_altitude,
        }
    }

    /// Current speed cap, raised while boosting.
    #[must_use]
    pub const fn speed_cap(&self, actor: &Actor) -> f32 {
        if actor.boosting {
            self.config.max_speed * self.config.boost_multiplier
        } else {
            self.config.max_speed
        }
    }

    fn accumulate(&self, actor: &mut Actor, force: Vec3) {
        match applied_acceleration(force, self.config.mass) {
            Some(accel) => actor.acceleration += accel,
            None => warn!(
                "force on actor {} ignored: carpet mass {} is not positive",
                actor.id.0, self.config.mass
            ),
        }
    }

    /// Pushes the actor along its heading. Negative magnitudes brake.
    pub fn apply_forward_force(&self, actor: &mut Actor, magnitude: f32) {
        let force = forward_from_yaw(actor.orientation.yaw) * finite_or(magnitude, 0.0);
        self.accumulate(actor, force);
    }

    /// Pushes the actor sideways and leans the carpet into the push.
    ///
    /// Positive magnitudes push right and bank right; the bank angle is
    /// clamped to `max_bank`.
    pub fn apply_side_force(&self, actor: &mut Actor, magnitude: f32) {
        let push = finite_or(magnitude, 0.0);
        let force = right_from_yaw(actor.orientation.yaw) * push;
        self.accumulate(actor, force);
        let max_bank = self.config.max_bank;
        actor.bank_angle =
            (actor.bank_angle + push * self.config.bank_response).clamp(-max_bank, max_bank);
    }

    /// Adjusts the climb rate, clamped to `max_vertical_rate`.
    pub fn apply_altitude_force(&self, actor: &mut Actor, magnitude: f32) {
        let delta = match applied_acceleration(Vec3::Y * finite_or(magnitude, 0.0), self.config.mass)
        {
            Some(accel) => accel.y,
            None => {
                warn!(
                    "altitude force on actor {} ignored: carpet mass {} is not positive",
                    actor.id.0, self.config.mass
                );
                return;
            }
        };
        let limit = self.config.max_vertical_rate;
        actor.vertical_rate = (actor.vertical_rate + delta).clamp(-limit, limit);
    }

    /// Advances the actor by `dt` seconds over `terrain`.
    pub fn step<T: TerrainSampler + ?Sized>(&self, actor: &mut Actor, terrain: &T, dt: f32) {
        let cfg = &self.config;
        let step_dt = sanitize_dt(dt, f32::MAX);
        actor.position = sanitize_vec(actor.position);
        actor.velocity = sanitize_vec(actor.velocity);
        actor.acceleration = sanitize_vec(actor.acceleration);

        self.accumulate_environment(actor, terrain);

        // Banked turn: the carpet yaws toward the side it leans into.
        actor.orientation.yaw =
            wrap_angle(actor.orientation.yaw - actor.bank_angle * cfg.turn_rate * step_dt);
        actor.bank_angle *= cfg.bank_decay;
        actor.vertical_rate *= cfg.vertical_rate_decay;

        actor.velocity += actor.acceleration * step_dt;
        actor.velocity *= cfg.inertia;
        actor.velocity = actor.velocity.clamp_length_max(self.speed_cap(actor));
        actor.position += actor.velocity * step_dt;

        self.enforce_altitude(actor, terrain);
        self.update_tilt(actor, step_dt);

        actor.acceleration = Vec3::ZERO;
    }

    fn accumulate_environment<T: TerrainSampler + ?Sized>(&self, actor: &mut Actor, terrain: &T) {
        let cfg = &self.config;
        let mut accel = Vec3::new(0.0, -cfg.gravity * cfg.gravity_scale, 0.0);

        let ground = terrain.sample_height(actor.position.x, actor.position.z);
        let clearance = actor.position.y - ground;
        if clearance < cfg.safety_threshold {
            accel.y += (cfg.safety_threshold - clearance) * cfg.avoidance_strength;
        }

        // Quadratic drag: magnitude drag * |v|^2, opposing v.
        accel -= actor.velocity * actor.velocity.length() * cfg.drag_coefficient;

        accel += right_from_yaw(actor.orientation.yaw) * actor.bank_angle * cfg.bank_lateral_force;
        accel.y += actor.vertical_rate;

        actor.acceleration += accel;
    }

    fn enforce_altitude<T: TerrainSampler + ?Sized>(&self, actor: &mut Actor, terrain: &T) {
        let cfg = &self.config;
        let ground = terrain.sample_height(actor.position.x, actor.position.z);
        let floor = ground + cfg.min_clearance;

        if actor.position.y < floor {
            actor.position.y = floor;
            if actor.velocity.y < 0.0 {
                let impact = -actor.velocity.y;
                actor.velocity.y = if impact > cfg.bounce_threshold {
                    impact * cfg.restitution
                } else {
                    0.0
                };
            }
        } else if actor.position.y > cfg.max_altitude {
            actor.position.y = cfg.max_altitude.max(floor);
            actor.velocity.y = actor.velocity.y.min(0.0);
            actor.vertical_rate = actor.vertical_rate.min(0.0);
        }
    }

    fn update_tilt(&self, actor: &mut Actor, dt: f32) {
        let cfg = &self.config;
        let max_tilt = cfg.max_bank;
        let reference = cfg.max_speed.max(f32::EPSILON);
        let forward_speed = actor.velocity.dot(forward_from_yaw(actor.orientation.yaw));
        let lateral_speed = actor.velocity.dot(right_from_yaw(actor.orientation.yaw));

        let target_pitch = (-forward_speed / reference * max_tilt * 0.5).clamp(-max_tilt, max_tilt);
        let target_roll =
            (-actor.bank_angle - lateral_speed / reference * max_tilt * 0.5).clamp(-max_tilt, max_tilt);

        actor.orientation.pitch =
            smooth_toward(actor.orientation.pitch, target_pitch, cfg.tilt_smoothing, dt)
                .clamp(-max_tilt, max_tilt);
        actor.orientation.roll =
            smooth_toward(actor.orientation.roll, target_roll, cfg.tilt_smoothing, dt)
                .clamp(-max_tilt, max_tilt);
    }
}
