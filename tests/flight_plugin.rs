//! Headless Bevy app driving the simulation through `FlightPlugin`.
use std::time::Duration;

use glam::Vec3;
use rstest::{fixture, rstest};
use skycarpet::actor::ActorId;
use skycarpet::net::{RemoteEvent, RemoteSnapshot};
use skycarpet::plugin::{FlightStats, RemoteFeed, SimulationState};
use test_utils::{flight_test_app, quiet_config};

use bevy::prelude::App;

#[fixture]
fn app() -> App {
    skycarpet::logging::init_for_tests();
    flight_test_app(quiet_config(), 2, Duration::from_millis(20))
}

#[rstest]
fn remote_players_join_move_and_leave(mut app: App) {
    {
        let mut feed = app.world_mut().resource_mut::<RemoteFeed>();
        feed.0.push(RemoteEvent::Joined { id: 42 });
        feed.0.push(RemoteEvent::Snapshot(RemoteSnapshot {
            id: 42,
            x: Some(30.0),
            z: Some(-30.0),
            ..RemoteSnapshot::default()
        }));
    }
    app.update();
    let first = {
        let state = &app.world().resource::<SimulationState>().0;
        let remote = state.roster().remote(ActorId(42)).expect("remote joined");
        assert!(remote.actor().position.x > 0.0);
        remote.actor().position
    };
    for _ in 0..50 {
        app.update();
    }
    let later = app
        .world()
        .resource::<SimulationState>()
        .0
        .roster()
        .remote(ActorId(42))
        .expect("remote still present")
        .actor()
        .position;
    assert!(later.x > first.x);
    assert!((later.x - 30.0).abs() < 1.0);

    app.world_mut()
        .resource_mut::<RemoteFeed>()
        .0
        .push(RemoteEvent::Left { id: 42 });
    app.update();
    assert_eq!(
        app.world()
            .resource::<SimulationState>()
            .0
            .roster()
            .remote_count(),
        0
    );
}

#[rstest]
fn regeneration_reaches_the_observer(mut app: App) {
    app.world_mut()
        .resource_mut::<SimulationState>()
        .0
        .roster_mut()
        .local_mut()
        .reset_motion(Vec3::new(-495.0, 150.0, 0.0));
    for _ in 0..200 {
        app.update();
    }
    let stats = *app.world().resource::<FlightStats>();
    assert_eq!(stats.regenerations, 1);
    assert_eq!(stats.ticks, 200);
    let state = &app.world().resource::<SimulationState>().0;
    assert_eq!(state.generation(), 1);
}
