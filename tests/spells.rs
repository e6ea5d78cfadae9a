//! Spell casting and projectile resolution.
use std::collections::HashSet;

use glam::Vec3;
use rstest::{fixture, rstest};
use skycarpet::actor::Actor;
use skycarpet::config::SpellConfig;
use skycarpet::spells::{CastOutcome, ProjectileId, SpellEvent, SpellModel};
use test_utils::physics::actor_facing;
use test_utils::{actor_at, FlatTerrain};

#[fixture]
fn spells() -> SpellModel {
    SpellModel::new(SpellConfig::default())
}

#[rstest]
fn recast_inside_cooldown_spawns_nothing(mut spells: SpellModel) {
    let mut caster = actor_at(1, 0.0, 50.0, 0.0);
    let ground = FlatTerrain(0.0);
    assert!(matches!(spells.cast(&mut caster, 0), CastOutcome::Launched(_)));
    spells.update(0.05, &ground, &mut [&mut caster]);
    assert_eq!(spells.cast(&mut caster, 0), CastOutcome::OnCooldown);
    spells.update(0.05, &ground, &mut [&mut caster]);
    assert_eq!(spells.cast(&mut caster, 0), CastOutcome::OnCooldown);
    assert_eq!(spells.projectiles().len(), 1);
}

#[rstest]
fn terrain_impact_precedes_actor_impact(mut spells: SpellModel) {
    let mut caster = actor_at(1, 0.0, 1.0, 0.0);
    let mut target = actor_at(2, 0.0, 1.0, -3.0);
    spells.cast(&mut caster, 0);
    let events = spells.update(0.01, &FlatTerrain(4.0), &mut [&mut caster, &mut target]);
    assert!(matches!(events.as_slice(), [SpellEvent::TerrainImpact { .. }]));
    assert_eq!(target.health.current(), target.health.max());
}

#[rstest]
fn first_actor_in_order_takes_the_hit(mut spells: SpellModel) {
    let mut caster = actor_at(1, 0.0, 50.0, 0.0);
    let mut first = actor_at(2, 0.5, 50.0, -4.0);
    let mut second = actor_at(3, -0.5, 50.0, -4.0);
    spells.cast(&mut caster, 0);
    spells.update(
        0.01,
        &FlatTerrain(0.0),
        &mut [&mut caster, &mut first, &mut second],
    );
    assert!(first.health.current() < first.health.max());
    assert_eq!(second.health.current(), second.health.max());
}

fn terminal_id(event: &SpellEvent) -> Option<ProjectileId> {
    match *event {
        SpellEvent::Expired { projectile, .. }
        | SpellEvent::TerrainImpact { projectile, .. }
        | SpellEvent::ActorImpact { projectile, .. } => Some(projectile),
        SpellEvent::ShieldExpired { .. } => None,
    }
}

#[rstest]
fn every_projectile_terminates_at_most_once() {
    let mut config = SpellConfig::default();
    for spell in &mut config.table {
        spell.cooldown = 0.0;
    }
    let mut spells = SpellModel::new(config);
    let mut caster = actor_facing(1, Vec3::new(0.0, 20.0, 0.0), 0.0);
    let mut crowd: Vec<Actor> = (0..6)
        .map(|i| actor_at(10 + i, -30.0 + 12.0 * i as f32, 20.0, -40.0))
        .collect();
    let terrain = FlatTerrain(5.0);

    let mut launched = 0;
    let mut terminated = HashSet::new();
    for tick in 0..400 {
        caster.orientation.yaw = (tick as f32 * 0.05).sin() * 0.8;
        caster.position.y = 20.0 + (tick as f32 * 0.03).sin() * 18.0;
        if let CastOutcome::Launched(_) = spells.cast(&mut caster, tick % 3) {
            launched += 1;
        }
        let mut actors: Vec<&mut Actor> = std::iter::once(&mut caster)
            .chain(crowd.iter_mut())
            .collect();
        for event in spells.update(1.0 / 30.0, &terrain, &mut actors) {
            if let Some(id) = terminal_id(&event) {
                assert!(terminated.insert(id), "projectile {id:?} terminated twice");
            }
        }
    }
    assert_eq!(terminated.len() + spells.projectiles().len(), launched);
    assert!(crowd.iter().all(|actor| actor.health.current() <= actor.health.max()));
}
