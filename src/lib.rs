#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the skycarpet flight core.
//!
//! Terrain generation, carpet flight physics, mana collection, spells and
//! world regeneration, orchestrated per frame by [`Simulation`] and wired
//! into Bevy by [`FlightPlugin`].
pub mod actor;
pub mod config;
pub mod constants;
pub mod input;
pub mod logging;
pub mod net;
pub mod numeric;
pub mod physics;
pub mod plugin;
pub mod resources;
pub mod simulation;
pub mod spells;
pub mod terrain;
pub mod transition;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use actor::{Actor, ActorId, Roster};
pub use config::{ConfigError, SimConfig};
pub use input::{apply_controls, ControlInput};
pub use logging::init as init_logging;
pub use net::{LoopbackChannel, RemoteEvent, RemoteSnapshot, UpdateChannel};
pub use physics::{applied_acceleration, FlightModel};
pub use plugin::{FlightPlugin, FlightStats, PilotInput, SimulationState};
pub use resources::{CollectedNode, ResourceField};
pub use simulation::{Simulation, TickReport};
pub use spells::{CastOutcome, DamagePolicy, ShieldPolicy, SpellKind, SpellModel};
pub use terrain::{HeightField, TerrainSampler};
pub use transition::{TransitionState, WorldTransitionController};
pub use vector_math::{forward_from_yaw, vec_normalize};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use skycarpet::prelude::*;
    //! ```

    pub use crate::applied_acceleration;
    pub use crate::ControlInput;
    pub use crate::FlightModel;
    pub use crate::HeightField;
    pub use crate::SimConfig;
    pub use crate::Simulation;
    pub use crate::TerrainSampler;
    pub use glam::Vec3;
}
