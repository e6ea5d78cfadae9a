//! Translation of host controls into flight forces.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::numeric::clamp_axis;
use crate::physics::FlightModel;

/// Pilot controls sampled by the host once per frame.
///
/// Axes are expected in `[-1, 1]`; anything else is clamped and non-finite
/// values count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlInput {
    /// Positive flies forward, negative brakes/reverses.
    pub forward: f32,
    /// Positive strafes and banks right.
    pub right: f32,
    /// Positive climbs.
    pub up: f32,
    /// Hold to boost.
    pub boosting: bool,
    /// Spell slot to cast this tick, if any.
    pub cast_request: Option<usize>,
}

/// Feeds `input` to the flight model as forces on `actor`.
///
/// Boosting scales the forward force and, through the actor's boost flag,
/// the speed cap.
pub fn apply_controls(flight: &FlightModel, actor: &mut Actor, input: &ControlInput) {
    let cfg = flight.config();
    actor.boosting = input.boosting;

    let forward = clamp_axis(input.forward);
    if forward != 0.0 {
        let boost = if input.boosting {
            cfg.boost_multiplier
        } else {
            1.0
        };
        flight.apply_forward_force(actor, forward * cfg.forward_force * boost);
    }
    let right = clamp_axis(input.right);
    if right != 0.0 {
        flight.apply_side_force(actor, right * cfg.side_force);
    }
    let up = clamp_axis(input.up);
    if up != 0.0 {
        flight.apply_altitude_force(actor, up * cfg.altitude_force);
    }
}
