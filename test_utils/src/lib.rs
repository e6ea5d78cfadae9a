//! Utility helpers for tests.
//!
//! Terrain stand-ins and actor builders live in [`physics`]; configuration
//! presets and a headless Bevy app in [`world`].

pub mod physics;
pub mod world;

pub use physics::{actor_at, FlatTerrain, RampTerrain};
pub use world::{flight_test_app, quiet_config};
