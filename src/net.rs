//! Remote actor update channel.
//!
//! There is no wire protocol: remote players are simulated by bots whose
//! positions jitter around fixed anchors. The types here describe what a
//! real transport would have to carry, and [`LoopbackChannel`] provides the
//! in-process stand-in.

use std::collections::VecDeque;

use glam::Vec3;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::config::NetworkConfig;

/// State received for a remote actor.
///
/// Every field but `id` is optional; a missing field leaves the matching
/// attribute unchanged.
///
/// # Examples
/// ```
/// use skycarpet::net::RemoteSnapshot;
/// let snap: RemoteSnapshot = serde_json::from_str(r#"{ "id": 4, "x": 1.5, "rotationY": 0.3 }"#).unwrap();
/// assert_eq!(snap.x, Some(1.5));
/// assert_eq!(snap.rotation_y, Some(0.3));
/// assert_eq!(snap.health, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSnapshot {
    /// Remote actor the snapshot belongs to.
    pub id: u64,
    /// World X.
    pub x: Option<f32>,
    /// Altitude.
    pub y: Option<f32>,
    /// World Z.
    pub z: Option<f32>,
    /// Yaw, in radians.
    pub rotation_y: Option<f32>,
    /// Mana total.
    pub mana: Option<u32>,
    /// Current health.
    pub health: Option<u16>,
}

/// Inbound notification from the update channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RemoteEvent {
    /// A remote player entered the session.
    Joined {
        /// Identifier of the new player.
        id: u64,
    },
    /// A remote player left the session.
    Left {
        /// Identifier of the departed player.
        id: u64,
    },
    /// Fresh state for a known remote player.
    Snapshot(RemoteSnapshot),
}

/// Outbound state of the local actor, published once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalUpdate {
    /// Local actor identifier.
    pub id: ActorId,
    /// World position.
    pub position: Vec3,
    /// Yaw, in radians.
    pub rotation_y: f32,
    /// Mana total.
    pub mana: u32,
    /// Current health.
    pub health: u16,
}

/// Position/rotation/state exchange with other players.
///
/// Delivery only needs to be eventual; implementations may batch or drop
/// intermediate snapshots.
pub trait UpdateChannel {
    /// Hands the local actor's state to the transport.
    fn publish(&mut self, update: &LocalUpdate);

    /// Collects events that arrived since the previous poll.
    fn poll(&mut self, dt: f32) -> Vec<RemoteEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bot {
    id: u64,
    anchor: Vec3,
}

/// In-process channel that simulates bots with jittered positions.
///
/// The first poll announces every bot; afterwards each bot reports a
/// snapshot every `update_interval` seconds.
#[derive(Debug, Clone)]
pub struct LoopbackChannel {
    bots: Vec<Bot>,
    jitter: f32,
    interval: f32,
    since_last: f32,
    announced: bool,
    queued: VecDeque<RemoteEvent>,
    last_published: Option<LocalUpdate>,
    rng: ChaCha8Rng,
}

/// Bot ids start here so they never collide with the local actor.
pub const FIRST_BOT_ID: u64 = 1000;

impl LoopbackChannel {
    /// Builds the channel with bots evenly spaced on a ring around the origin.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Bot counts are tiny compared to f32's exact integer range."
    )]
    #[must_use]
    pub fn new(config: &NetworkConfig, seed: u64) -> Self {
        let count = config.bot_count;
        let bots = (0..count)
            .map(|index| {
                let angle = std::f32::consts::TAU * index as f32 / count.max(1) as f32;
                Bot {
                    id: FIRST_BOT_ID + index as u64,
                    anchor: Vec3::new(
                        config.bot_ring_radius * angle.cos(),
                        config.bot_altitude,
                        config.bot_ring_radius * angle.sin(),
                    ),
                }
            })
            .collect();
        Self {
            bots,
            jitter: config.bot_jitter.abs(),
            interval: config.update_interval.max(0.0),
            since_last: 0.0,
            announced: false,
            queued: VecDeque::new(),
            last_published: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Injects an event to be returned by the next poll.
    pub fn push(&mut self, event: RemoteEvent) {
        self.queued.push_back(event);
    }

    /// The most recent local update handed to [`UpdateChannel::publish`].
    #[must_use]
    pub const fn last_published(&self) -> Option<&LocalUpdate> {
        self.last_published.as_ref()
    }

    /// Ids of the simulated bots.
    pub fn bot_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.bots.iter().map(|bot| bot.id)
    }

    fn jittered_snapshot(&mut self, bot: Bot) -> RemoteSnapshot {
        let (dx, dz) = if self.jitter > 0.0 {
            (
                self.rng.gen_range(-self.jitter..=self.jitter),
                self.rng.gen_range(-self.jitter..=self.jitter),
            )
        } else {
            (0.0, 0.0)
        };
        let yaw = self
            .rng
            .gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        RemoteSnapshot {
            id: bot.id,
            x: Some(bot.anchor.x + dx),
            y: Some(bot.anchor.y),
            z: Some(bot.anchor.z + dz),
            rotation_y: Some(yaw),
            mana: None,
            health: None,
        }
    }
}

impl UpdateChannel for LoopbackChannel {
    fn publish(&mut self, update: &LocalUpdate) {
        self.last_published = Some(*update);
    }

    fn poll(&mut self, dt: f32) -> Vec<RemoteEvent> {
        let mut events: Vec<RemoteEvent> = self.queued.drain(..).collect();
        if !self.announced {
            self.announced = true;
            events.extend(self.bots.iter().map(|bot| RemoteEvent::Joined { id: bot.id }));
        }

        self.since_last += if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.since_last >= self.interval {
            // Keep the partial interval so reports stay on cadence.
            self.since_last = if self.interval > 0.0 {
                self.since_last % self.interval
            } else {
                0.0
            };
            let bots = self.bots.clone();
            for bot in bots {
                let snapshot = self.jittered_snapshot(bot);
                events.push(RemoteEvent::Snapshot(snapshot));
            }
        }
        if !events.is_empty() {
            debug!("loopback channel delivering {} events", events.len());
        }
        events
    }
}
