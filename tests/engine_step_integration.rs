//! Engine step integration tests: landing, projectiles, force fields, damage,
//! contact phases and water effects.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec2;

use fixtureengine::components::actiontask::ActionTask;
use fixtureengine::components::body::Body;
use fixtureengine::components::bodysense::BodySense;
use fixtureengine::components::fixture::{
    Fixture, FixtureData, FixtureKind, ReflectDirection, VelocityAlteration,
};
use fixtureengine::components::health::{Damageable, Damager, Health};
use fixtureengine::components::projectile::Projectile;
use fixtureengine::contacts::ContactPhase;
use fixtureengine::engine::Engine;
use fixtureengine::error::EngineError;
use fixtureengine::events::contact::ContactEffect;
use fixtureengine::resources::physicsconfig::PhysicsConfig;
use fixtureengine::resources::worldtime::WorldTime;

const EPSILON: f32 = 1e-4;
const DT: f32 = 0.1;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn engine() -> Engine {
    Engine::new(PhysicsConfig::default())
}

fn block(engine: &mut Engine, x: f32, y: f32, w: f32, h: f32) -> Entity {
    let body = Body::new(x, y, w, h)
        .unwrap()
        .with_fixture(Fixture::rect(FixtureKind::Block, w, h));
    engine.spawn(body)
}

#[test]
fn feet_landing_on_block_sets_ground_and_keeps_horizontal_speed() {
    let mut engine = engine();
    block(&mut engine, 0.0, 0.0, 10.0, 1.0);
    let walker = engine.spawn((
        Body::new(2.0, 0.98, 1.0, 1.0)
            .unwrap()
            .with_velocity(Vec2::new(3.0, 0.0))
            .with_fixture(
                Fixture::rect(FixtureKind::Feet, 0.8, 0.1).with_offset(Vec2::new(0.0, -0.5)),
            ),
        ActionTask::AirDash,
    ));

    engine.step(DT).unwrap();

    let body = engine.world().get::<Body>(walker).unwrap();
    assert!(body.is_sensing(BodySense::FeetOnGround));
    assert!(approx_eq(body.velocity.x, 3.0));
    assert_eq!(
        engine.world().get::<ActionTask>(walker),
        Some(&ActionTask::Jump)
    );
}

#[test]
fn ground_flag_drops_after_leaving_block() {
    let mut engine = engine();
    block(&mut engine, 0.0, 0.0, 10.0, 1.0);
    let walker = engine.spawn((
        Body::new(2.0, 0.98, 1.0, 1.0)
            .unwrap()
            .with_fixture(
                Fixture::rect(FixtureKind::Feet, 0.8, 0.1).with_offset(Vec2::new(0.0, -0.5)),
            ),
        ActionTask::AirDash,
    ));
    engine.step(DT).unwrap();

    engine
        .world_mut()
        .get_mut::<Body>(walker)
        .unwrap()
        .set_position(Vec2::new(2.0, 5.0));
    engine.step(DT).unwrap();

    let body = engine.world().get::<Body>(walker).unwrap();
    assert!(!body.is_sensing(BodySense::FeetOnGround));
    assert_eq!(
        engine.world().get::<ActionTask>(walker),
        Some(&ActionTask::AirDash)
    );
}

#[test]
fn shield_reflects_projectile_and_takes_ownership() {
    let mut engine = engine();
    let shooter = engine.spawn(Body::new(-10.0, 0.0, 1.0, 1.0).unwrap());
    let shot = engine.spawn((
        Body::new(0.0, 0.0, 0.2, 0.2)
            .unwrap()
            .with_velocity(Vec2::new(10.0, 0.0))
            .with_fixture(Fixture::rect(FixtureKind::Projectile, 0.2, 0.2)),
        Projectile::standard(Some(shooter)),
    ));
    let shield = engine.spawn(
        Body::new(0.5, -0.5, 1.0, 1.2).unwrap().with_fixture(
            Fixture::rect(FixtureKind::Shield, 1.0, 1.2)
                .with(FixtureData::Reflect(ReflectDirection::Straight)),
        ),
    );

    engine.step(DT).unwrap();

    let body = engine.world().get::<Body>(shot).unwrap();
    assert!(approx_eq(body.velocity.x, -10.0));
    assert!(approx_eq(body.velocity.y, 0.0));
    let projectile = engine.world().get::<Projectile>(shot).unwrap();
    assert_eq!(projectile.owner, Some(shield));
}

#[test]
fn force_field_accumulates_while_touching() {
    let mut engine = engine();
    let field = Fixture::rect(FixtureKind::Force, 10.0, 10.0).with(FixtureData::Force(Arc::new(
        |_: &World, _: Entity, delta: f32| VelocityAlteration::add(0.0, 60.0 * delta),
    )));
    engine.spawn(Body::new(-5.0, -5.0, 10.0, 10.0).unwrap().with_fixture(field));
    let mut floating = Body::new(0.0, 0.0, 1.0, 1.0)
        .unwrap()
        .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0));
    floating.gravity_on = false;
    let floating = engine.spawn(floating);

    for _ in 0..3 {
        engine.step(DT).unwrap();
    }

    let body = engine.world().get::<Body>(floating).unwrap();
    assert!(approx_eq(body.velocity.y, 18.0));
    assert!(body.is_sensing(BodySense::ForceApplied));
}

#[test]
fn damage_lands_once_then_invincibility_blocks_repeats() {
    let mut engine = engine();
    let spike = engine.spawn((
        Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damager, 1.0, 1.0)),
        Damager::new("spike"),
    ));
    let victim = engine.spawn((
        Body::new(0.5, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damageable, 1.0, 1.0)),
        Health::new(25),
        Damageable::new(1.0).with_negotiation("spike", 10),
    ));

    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Health>(victim).unwrap().current, 15);
    assert!(engine.world().get::<Damageable>(victim).unwrap().is_invincible());
    let effects = engine.read_effects();
    assert!(effects.contains(&ContactEffect::DamageInflicted {
        damager: spike,
        damageable: victim,
        amount: 10,
    }));

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Health>(victim).unwrap().current, 15);
    let damager = engine.world().get::<Damager>(spike).unwrap();
    assert_eq!(damager.hits, 1);
    assert_eq!(damager.last_hit, Some(victim));
}

#[test]
fn unknown_damager_kind_is_ignored() {
    let mut engine = engine();
    engine.spawn((
        Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damager, 1.0, 1.0)),
        Damager::new("fire"),
    ));
    let victim = engine.spawn((
        Body::new(0.5, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damageable, 1.0, 1.0)),
        Health::new(25),
        Damageable::new(1.0).with_negotiation("spike", 10),
    ));
    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Health>(victim).unwrap().current, 25);
}

#[test]
fn contact_phases_run_begin_continue_end() {
    let mut engine = engine();
    let mut mover = Body::new(-3.0, 0.0, 1.0, 1.0)
        .unwrap()
        .with_velocity(Vec2::new(5.0, 0.0))
        .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0));
    mover.gravity_on = false;
    let mover = engine.spawn(mover);
    block(&mut engine, 0.0, 0.0, 1.0, 1.0);

    let mut phases = Vec::new();
    for _ in 0..12 {
        engine.step(DT).unwrap();
        for contact in &engine.last_contacts().contacts {
            if contact.first.entity == mover || contact.second.entity == mover {
                phases.push(contact.phase);
            }
        }
    }

    assert_eq!(
        phases,
        vec![
            ContactPhase::Begin,
            ContactPhase::Continue,
            ContactPhase::Continue,
            ContactPhase::End,
        ]
    );
}

#[test]
fn entering_and_leaving_water_splashes_once_each() {
    let mut engine = engine();
    let water = engine.spawn(
        Body::new(0.0, 0.0, 4.0, 4.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Water, 4.0, 4.0)),
    );
    let mut swimmer = Body::new(1.0, 1.0, 1.0, 1.0)
        .unwrap()
        .with_fixture(Fixture::rect(FixtureKind::WaterListener, 1.0, 1.0));
    swimmer.gravity_on = false;
    let swimmer = engine.spawn((swimmer, ActionTask::Jump));

    engine.step(DT).unwrap();
    let effects = engine.read_effects();
    assert_eq!(
        effects,
        vec![ContactEffect::Splash {
            entity: swimmer,
            water,
            entering: true,
        }]
    );
    let body = engine.world().get::<Body>(swimmer).unwrap();
    assert!(body.is_sensing(BodySense::InWater));
    assert_eq!(body.water_contacts, 1);
    assert_eq!(
        engine.world().get::<ActionTask>(swimmer),
        Some(&ActionTask::Swim)
    );

    engine.step(DT).unwrap();
    assert!(engine.read_effects().is_empty());

    engine
        .world_mut()
        .get_mut::<Body>(swimmer)
        .unwrap()
        .set_position(Vec2::new(10.0, 10.0));
    engine.step(DT).unwrap();
    let effects = engine.read_effects();
    assert_eq!(
        effects,
        vec![ContactEffect::Splash {
            entity: swimmer,
            water,
            entering: false,
        }]
    );
    let body = engine.world().get::<Body>(swimmer).unwrap();
    assert!(!body.is_sensing(BodySense::InWater));
    assert_eq!(body.water_contacts, 0);
    assert_eq!(
        engine.world().get::<ActionTask>(swimmer),
        Some(&ActionTask::AirDash)
    );
}

#[test]
fn instant_death_zone_despawns_entities_without_health() {
    let mut engine = engine();
    engine.spawn(
        Body::new(0.0, 0.0, 2.0, 2.0).unwrap().with_fixture(
            Fixture::rect(FixtureKind::Death, 2.0, 2.0).with(FixtureData::Instant),
        ),
    );
    let mut crate_body = Body::new(0.5, 0.5, 1.0, 1.0)
        .unwrap()
        .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0));
    crate_body.gravity_on = false;
    let crate_entity = engine.spawn(crate_body);

    engine.step(DT).unwrap();

    assert!(engine.world().get_entity(crate_entity).is_err());
    let physics = engine.physics_key().unwrap();
    assert!(!engine.scheduler().members(physics).unwrap().contains(&crate_entity));
}

#[test]
fn time_scale_slows_integration() {
    let mut engine = engine();
    engine.world_mut().resource_mut::<WorldTime>().time_scale = 0.5;
    let mut mover = Body::new(0.0, 0.0, 1.0, 1.0)
        .unwrap()
        .with_velocity(Vec2::new(2.0, 0.0));
    mover.gravity_on = false;
    let mover = engine.spawn(mover);

    engine.step(1.0).unwrap();

    let body = engine.world().get::<Body>(mover).unwrap();
    assert!(approx_eq(body.position().x, 1.0));
}

#[test]
fn failed_step_replays_begins_on_the_next_step() {
    let mut engine = engine();
    let water = engine.spawn(
        Body::new(0.0, 0.0, 4.0, 4.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Water, 4.0, 4.0)),
    );
    let mut swimmer = Body::new(1.0, 1.0, 1.0, 1.0)
        .unwrap()
        .with_fixture(Fixture::rect(FixtureKind::WaterListener, 1.0, 1.0));
    swimmer.gravity_on = false;
    let swimmer = engine.spawn(swimmer);
    engine.spawn((
        Body::new(20.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damager, 1.0, 1.0)),
        Damager::new("spike"),
    ));
    let target = engine.spawn(
        Body::new(20.5, 0.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Damageable, 1.0, 1.0)),
    );

    let err = engine.step(DT).unwrap_err();
    assert!(matches!(err, EngineError::MissingCapability { entity, .. } if entity == target));
    assert_eq!(engine.world().get::<Body>(swimmer).unwrap().water_contacts, 0);
    assert!(engine.read_effects().is_empty());

    engine
        .world_mut()
        .entity_mut(target)
        .insert((Health::new(5), Damageable::new(1.0)));
    engine.step(DT).unwrap();

    assert_eq!(engine.world().get::<Body>(swimmer).unwrap().water_contacts, 1);
    assert!(engine.read_effects().contains(&ContactEffect::Splash {
        entity: swimmer,
        water,
        entering: true,
    }));
}
