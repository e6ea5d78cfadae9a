//! Configuration presets and a headless app for integration tests.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skycarpet::config::SimConfig;
use skycarpet::FlightPlugin;

/// Default tuning without bots, so remote traffic only comes from the test.
pub fn quiet_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.network.bot_count = 0;
    config
}

/// Build an app running [`FlightPlugin`] on a fixed `frame` clock.
///
/// `finish` and `cleanup` have already run; call `update` to step.
pub fn flight_test_app(config: SimConfig, seed: u64, frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(frame));
    app.add_plugins(FlightPlugin { config, seed });
    app.finish();
    app.cleanup();
    app
}
