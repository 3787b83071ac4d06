//! Contact rule integration tests driven through full engine steps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use glam::Vec2;

use fixtureengine::components::body::{Body, BodyLabel};
use fixtureengine::components::bodysense::BodySense;
use fixtureengine::components::fixture::{
    Fixture, FixtureData, FixtureKind, HitBy, Side, VelocityAlteration,
};
use fixtureengine::components::gate::{Gate, GateState};
use fixtureengine::components::gravity::{Direction, GravityChange, GravityControl};
use fixtureengine::components::health::{Damageable, Health};
use fixtureengine::components::item::{Item, Player};
use fixtureengine::components::lifecycle::Lifecycle;
use fixtureengine::components::projectile::{Projectile, ProjectileBehavior, ProjectileHit};
use fixtureengine::components::upsidedown::UpsideDown;
use fixtureengine::contacts::{ContactPhase, FixtureHandle};
use fixtureengine::engine::Engine;
use fixtureengine::error::EngineError;
use fixtureengine::events::contact::ContactEffect;
use fixtureengine::resources::physicsconfig::PhysicsConfig;

const EPSILON: f32 = 1e-4;
const DT: f32 = 0.1;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn engine() -> Engine {
    Engine::new(PhysicsConfig::default())
}

fn still(x: f32, y: f32, w: f32, h: f32) -> Body {
    let mut body = Body::new(x, y, w, h).unwrap();
    body.gravity_on = false;
    body
}

fn move_to(engine: &mut Engine, entity: Entity, x: f32, y: f32) {
    engine
        .world_mut()
        .get_mut::<Body>(entity)
        .unwrap()
        .set_position(Vec2::new(x, y));
}

type HitLog = Arc<Mutex<Vec<HitBy>>>;

/// Fixture payload that records every hit-by notification into `log`.
fn recorder(log: &HitLog) -> FixtureData {
    let log = log.clone();
    FixtureData::HitBy(Arc::new(move |_: &mut World, hit: HitBy| {
        log.lock().unwrap().push(hit);
    }))
}

fn phases(log: &HitLog) -> Vec<(ContactPhase, FixtureKind)> {
    log.lock().unwrap().iter().map(|hit| (hit.phase, hit.by_kind)).collect()
}

/// A 4x1 platform at the origin moving right at one unit per second.
fn platform(engine: &mut Engine) -> Entity {
    engine.spawn(
        still(0.0, 0.0, 4.0, 1.0)
            .with_velocity(Vec2::new(1.0, 0.0))
            .with_fixture(Fixture::rect(FixtureKind::Block, 4.0, 1.0)),
    )
}

fn feet() -> Fixture {
    Fixture::rect(FixtureKind::Feet, 0.8, 0.2).with_offset(Vec2::new(0.0, -0.5))
}

fn x_of(engine: &Engine, entity: Entity) -> f32 {
    engine.world().get::<Body>(entity).unwrap().position().x
}

fn climber() -> Body {
    still(0.0, 0.5, 1.0, 1.0)
        .with_fixture(Fixture::rect(FixtureKind::Head, 0.8, 0.1).with_offset(Vec2::new(0.0, 0.5)))
        .with_fixture(Fixture::rect(FixtureKind::Feet, 0.8, 0.1).with_offset(Vec2::new(0.0, -0.5)))
}

#[test]
fn ladder_reference_outlives_a_single_touch() {
    let mut engine = engine();
    let ladder = engine.spawn(
        still(0.0, 0.0, 1.0, 4.0).with_fixture(Fixture::rect(FixtureKind::Ladder, 1.0, 4.0)),
    );
    let who = engine.spawn(climber());

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(who).unwrap();
    assert!(body.is_sensing(BodySense::HeadTouchingLadder));
    assert!(body.is_sensing(BodySense::FeetTouchingLadder));
    assert_eq!(body.ladder, Some(ladder));

    // head pokes out of the top, feet stay on
    move_to(&mut engine, who, 0.0, 3.2);
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(who).unwrap();
    assert!(!body.is_sensing(BodySense::HeadTouchingLadder));
    assert!(body.is_sensing(BodySense::FeetTouchingLadder));
    assert_eq!(body.ladder, Some(ladder));

    move_to(&mut engine, who, 0.0, 10.0);
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(who).unwrap();
    assert_eq!(body.ladder, None);
    assert_eq!(body.ladder_contacts, 0);
}

#[test]
fn bouncer_sets_vertical_speed_and_runs_callbacks() {
    let mut engine = engine();
    let fired = Arc::new(AtomicBool::new(false));
    let flag = fired.clone();
    let pad = engine.spawn(
        still(0.0, 0.0, 2.0, 1.0).with_fixture(
            Fixture::rect(FixtureKind::Bouncer, 2.0, 1.0)
                .with(FixtureData::Bounce(VelocityAlteration::set_y(15.0)))
                .with(FixtureData::OnBounce(Arc::new(move |_: &mut World, _: Entity| {
                    flag.store(true, Ordering::SeqCst);
                }))),
        ),
    );
    let jumper = engine.spawn(
        still(0.5, 0.95, 1.0, 1.0)
            .with_velocity(Vec2::new(2.0, -1.0))
            .with_fixture(
                Fixture::rect(FixtureKind::Feet, 0.8, 0.2).with_offset(Vec2::new(0.0, -0.5)),
            ),
    );

    engine.step(DT).unwrap();

    let body = engine.world().get::<Body>(jumper).unwrap();
    assert!(approx_eq(body.velocity.x, 2.0));
    assert!(approx_eq(body.velocity.y, 15.0));
    assert!(fired.load(Ordering::SeqCst));
    assert!(engine.read_effects().contains(&ContactEffect::Bounced {
        entity: jumper,
        bouncer: pad,
    }));
}

#[test]
fn only_players_open_gates() {
    let mut engine = engine();
    let gate = engine.spawn((
        still(0.0, 0.0, 1.0, 2.0).with_fixture(Fixture::rect(FixtureKind::Gate, 1.0, 2.0)),
        Gate::default(),
    ));
    let side = || {
        Fixture::rect(FixtureKind::Side, 0.1, 0.8)
            .with_offset(Vec2::new(0.45, 0.0))
            .with(FixtureData::Side(Side::Right))
    };
    engine.spawn(still(-0.5, 0.0, 1.0, 1.0).with_fixture(side()));
    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Gate>(gate).unwrap().state, GateState::Closed);

    let player = engine.spawn((still(-0.5, 0.5, 1.0, 1.0).with_fixture(side()), Player));
    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Gate>(gate).unwrap().state, GateState::Opening);
    assert!(engine.read_effects().contains(&ContactEffect::GateTriggered {
        gate,
        by: player,
    }));
}

#[test]
fn collected_items_run_pickup_and_disappear() {
    let mut engine = engine();
    let picked = Arc::new(Mutex::new(None));
    let slot = picked.clone();
    let player = engine.spawn((
        still(0.0, 0.0, 1.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Player, 1.0, 1.0)),
        Player,
    ));
    let coin = engine.spawn((
        still(0.5, 0.5, 0.5, 0.5).with_fixture(Fixture::rect(FixtureKind::Item, 0.5, 0.5)),
        Item::new("coin").with_on_pickup(Arc::new(move |_: &mut World, item: Entity, by: Entity| {
            *slot.lock().unwrap() = Some((item, by));
        })),
    ));

    engine.step(DT).unwrap();

    assert_eq!(*picked.lock().unwrap(), Some((coin, player)));
    assert!(engine.world().get_entity(coin).is_err());
    assert!(engine.read_effects().contains(&ContactEffect::ItemCollected {
        item: coin,
        player,
        kind: "coin".to_string(),
    }));
}

#[test]
fn consumer_sees_every_phase() {
    let mut engine = engine();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    engine.spawn(
        still(0.0, 0.0, 4.0, 1.0).with_fixture(
            Fixture::rect(FixtureKind::Consumer, 4.0, 1.0).with(FixtureData::Consumer(Arc::new(
                move |_: &mut World, phase: ContactPhase, _: FixtureHandle| log.lock().unwrap().push(phase),
            ))),
        ),
    );
    let feet = engine.spawn(
        still(1.0, 0.5, 1.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Feet, 1.0, 1.0)),
    );

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();
    move_to(&mut engine, feet, 10.0, 10.0);
    engine.step(DT).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![ContactPhase::Begin, ContactPhase::Continue, ContactPhase::End]
    );
}

#[test]
fn upside_down_zone_flips_and_restores() {
    let mut engine = engine();
    engine.spawn(
        still(0.0, 0.0, 2.0, 2.0).with_fixture(Fixture::rect(FixtureKind::UpsideDown, 2.0, 2.0)),
    );
    let who = engine.spawn(
        still(0.5, 0.5, 1.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0)),
    );
    engine.step(DT).unwrap();
    assert!(engine.world().get::<UpsideDown>(who).is_some());

    move_to(&mut engine, who, 10.0, 10.0);
    engine.step(DT).unwrap();
    assert!(engine.world().get::<UpsideDown>(who).is_none());
}

#[test]
fn laser_collects_hits_on_continue_only() {
    let mut engine = engine();
    let laser = engine.spawn(
        still(0.0, 0.0, 0.0, 0.0).with_fixture(
            Fixture::line(FixtureKind::Laser, Vec2::new(0.0, 0.5), Vec2::new(10.0, 0.5))
                .with(FixtureData::LaserHits(Vec::new())),
        ),
    );
    engine.spawn(
        still(4.0, 0.0, 1.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Block, 1.0, 1.0)),
    );

    engine.step(DT).unwrap();
    let hits = |engine: &Engine| {
        engine.world().get::<Body>(laser).unwrap().fixtures[0]
            .laser_hits()
            .map(<[Vec2]>::to_vec)
            .unwrap_or_default()
    };
    assert!(hits(&engine).is_empty());

    engine.step(DT).unwrap();
    let points = hits(&engine);
    assert_eq!(points.len(), 2);
    assert!(points.iter().any(|p| approx_eq(p.x, 4.0) && approx_eq(p.y, 0.5)));
    assert!(points.iter().any(|p| approx_eq(p.x, 5.0) && approx_eq(p.y, 0.5)));

    engine.step(DT).unwrap();
    assert_eq!(hits(&engine).len(), 2);
}

#[test]
fn head_bump_stops_rising_unless_block_is_one_way() {
    let mut engine = engine();
    let solid = engine.spawn(
        still(0.0, 2.0, 2.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Block, 2.0, 1.0)),
    );
    let head = || Fixture::rect(FixtureKind::Head, 0.8, 0.2).with_offset(Vec2::new(0.0, 0.5));
    let jumper = engine.spawn(
        still(0.5, 0.95, 1.0, 1.0)
            .with_velocity(Vec2::new(0.0, 1.0))
            .with_fixture(head()),
    );
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(jumper).unwrap();
    assert!(approx_eq(body.velocity.y, 0.0));
    assert!(body.is_sensing(BodySense::HeadTouchingBlock));

    engine
        .world_mut()
        .get_mut::<Body>(solid)
        .unwrap()
        .labels
        .insert(BodyLabel::CollideDownOnly);
    let other = engine.spawn(
        still(0.5, 0.95, 1.0, 1.0)
            .with_velocity(Vec2::new(0.0, 1.0))
            .with_fixture(head()),
    );
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(other).unwrap();
    assert!(approx_eq(body.velocity.y, 1.0));
    assert!(!body.is_sensing(BodySense::HeadTouchingBlock));
}

#[test]
fn side_flags_follow_fixture_side_and_labels() {
    let mut engine = engine();
    let wall = engine.spawn(
        still(1.0, 0.0, 1.0, 2.0).with_fixture(Fixture::rect(FixtureKind::Block, 1.0, 2.0)),
    );
    let walker = engine.spawn(
        still(0.05, 0.0, 1.0, 1.0).with_fixture(
            Fixture::rect(FixtureKind::Side, 0.2, 0.8)
                .with_offset(Vec2::new(0.5, 0.0))
                .with(FixtureData::Side(Side::Right)),
        ),
    );
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(walker).unwrap();
    assert!(body.is_sensing(BodySense::SideTouchingBlockRight));
    assert!(!body.is_sensing(BodySense::SideTouchingBlockLeft));

    engine
        .world_mut()
        .get_mut::<Body>(wall)
        .unwrap()
        .labels
        .insert(BodyLabel::NoSideTouchie);
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(walker).unwrap();
    assert!(!body.is_sensing(BodySense::SideTouchingBlockRight));
}

#[test]
fn ice_friction_wins_over_ground_friction() {
    let mut engine = engine();
    let config = engine.config().clone();
    engine.spawn(
        still(0.0, 0.0, 2.0, 1.0)
            .with_fixture(Fixture::rect(FixtureKind::Block, 2.0, 1.0))
            .with_fixture(Fixture::rect(FixtureKind::Ice, 2.0, 1.0)),
    );
    let skater = engine.spawn(
        still(0.5, 0.95, 1.0, 1.0).with_fixture(
            Fixture::rect(FixtureKind::Feet, 0.8, 0.2).with_offset(Vec2::new(0.0, -0.5)),
        ),
    );
    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(skater).unwrap();
    assert!(body.is_sensing(BodySense::FeetOnGround));
    assert!(body.is_sensing(BodySense::FeetOnIce));
    assert!(approx_eq(body.friction.x, config.ice_friction));
}

#[test]
fn death_zone_respects_invincibility_unless_instant() {
    let mut engine = engine();
    let zone = Fixture::rect(FixtureKind::Death, 2.0, 2.0);
    engine.spawn(still(0.0, 0.0, 2.0, 2.0).with_fixture(zone));
    let mut shielded = Damageable::new(5.0);
    shielded.start_invincibility();
    let hero = engine.spawn((
        still(0.5, 0.5, 1.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0)),
        Health::new(3),
        shielded,
    ));
    engine.step(DT).unwrap();
    assert_eq!(engine.world().get::<Health>(hero).unwrap().current, 3);

    engine.spawn(
        still(0.0, 0.0, 2.0, 2.0).with_fixture(
            Fixture::rect(FixtureKind::Death, 2.0, 2.0).with(FixtureData::Instant),
        ),
    );
    engine.step(DT).unwrap();
    // health system runs after physics and despawns the depleted hero
    assert!(engine.world().get_entity(hero).is_err());
}

#[test]
fn riders_follow_a_moving_platform() {
    let mut engine = engine();
    platform(&mut engine);
    let rider = engine.spawn(still(1.0, 0.95, 1.0, 1.0).with_fixture(feet()));

    for _ in 0..3 {
        engine.step(DT).unwrap();
    }
    let body = engine.world().get::<Body>(rider).unwrap();
    assert!(approx_eq(body.position().x, 1.3));
    assert!(body.is_sensing(BodySense::FeetOnGround));
}

#[test]
fn feet_that_do_not_stick_stay_put() {
    let mut engine = engine();
    platform(&mut engine);
    let rider = engine.spawn(
        still(1.0, 0.95, 1.0, 1.0).with_fixture(feet().with(FixtureData::StickToBlock(false))),
    );

    for _ in 0..3 {
        engine.step(DT).unwrap();
    }
    let body = engine.world().get::<Body>(rider).unwrap();
    assert!(approx_eq(body.position().x, 1.0));
    assert!(body.is_sensing(BodySense::FeetOnGround));
}

#[test]
fn riders_stop_when_the_platform_falls_asleep() {
    let mut engine = engine();
    let deck = platform(&mut engine);
    let rider = engine.spawn(still(1.0, 0.95, 1.0, 1.0).with_fixture(feet()));

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();
    let parked = x_of(&engine, rider);
    assert!(approx_eq(parked, 1.2));

    engine.world_mut().entity_mut(deck).insert(Lifecycle {
        alive: true,
        asleep: true,
    });
    for _ in 0..5 {
        engine.step(DT).unwrap();
    }
    assert!(approx_eq(x_of(&engine, deck), 0.2));
    assert!(approx_eq(x_of(&engine, rider), parked));
    let body = engine.world().get::<Body>(rider).unwrap();
    assert!(body.is_sensing(BodySense::FeetOnGround));
}

#[test]
fn no_feet_touchie_blocks_are_not_ground() {
    let mut engine = engine();
    engine.spawn(
        still(0.0, 0.0, 4.0, 1.0)
            .with_label(BodyLabel::NoFeetTouchie)
            .with_fixture(Fixture::rect(FixtureKind::Block, 4.0, 1.0)),
    );
    let walker = engine.spawn(still(1.0, 0.95, 1.0, 1.0).with_fixture(feet()));
    engine.step(DT).unwrap();
    assert!(!engine
        .world()
        .get::<Body>(walker)
        .unwrap()
        .is_sensing(BodySense::FeetOnGround));
}

#[test]
fn blocks_with_collision_off_are_not_ground() {
    let mut engine = engine();
    let mut ghost = still(0.0, 0.0, 4.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Block, 4.0, 1.0));
    ghost.collision_on = false;
    let ghost = engine.spawn(ghost);
    let walker = engine.spawn(still(1.0, 0.95, 1.0, 1.0).with_fixture(feet()));

    engine.step(DT).unwrap();
    assert!(!engine
        .world()
        .get::<Body>(walker)
        .unwrap()
        .is_sensing(BodySense::FeetOnGround));

    engine.world_mut().get_mut::<Body>(ghost).unwrap().collision_on = true;
    engine.step(DT).unwrap();
    assert!(engine
        .world()
        .get::<Body>(walker)
        .unwrap()
        .is_sensing(BodySense::FeetOnGround));
}

#[derive(Default)]
struct RecordingShot {
    hits: Mutex<Vec<FixtureKind>>,
}

impl ProjectileBehavior for RecordingShot {
    fn hit_block(&self, _: &mut World, _: &ProjectileHit) -> Result<(), EngineError> {
        self.hits.lock().unwrap().push(FixtureKind::Block);
        Ok(())
    }

    fn hit_body(&self, _: &mut World, _: &ProjectileHit) -> Result<(), EngineError> {
        self.hits.lock().unwrap().push(FixtureKind::Body);
        Ok(())
    }

    fn hit_water(&self, _: &mut World, _: &ProjectileHit) -> Result<(), EngineError> {
        self.hits.lock().unwrap().push(FixtureKind::Water);
        Ok(())
    }
}

fn target(engine: &mut Engine, x: f32, kind: FixtureKind) -> Entity {
    engine.spawn(still(x, 0.0, 0.5, 1.0).with_fixture(Fixture::rect(kind, 0.5, 1.0)))
}

#[test]
fn projectiles_dispatch_by_struck_kind() {
    let mut engine = engine();
    let shot = Arc::new(RecordingShot::default());
    engine.spawn((
        still(0.0, 0.0, 3.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Projectile, 3.0, 1.0)),
        Projectile::new(None, shot.clone()),
    ));
    target(&mut engine, 0.1, FixtureKind::Block);
    target(&mut engine, 1.1, FixtureKind::Body);
    target(&mut engine, 2.1, FixtureKind::Water);

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();

    let mut hits = shot.hits.lock().unwrap().clone();
    hits.sort();
    assert_eq!(hits, vec![FixtureKind::Body, FixtureKind::Block, FixtureKind::Water]);
}

#[test]
fn projectiles_pass_through_opted_out_bodies() {
    let mut engine = engine();
    let shot = Arc::new(RecordingShot::default());
    engine.spawn((
        still(0.0, 0.0, 3.0, 1.0).with_fixture(Fixture::rect(FixtureKind::Projectile, 3.0, 1.0)),
        Projectile::new(None, shot.clone()),
    ));
    engine.spawn(
        still(1.1, 0.0, 0.5, 1.0)
            .with_label(BodyLabel::NoProjectileCollision)
            .with_fixture(Fixture::rect(FixtureKind::Body, 0.5, 1.0)),
    );
    target(&mut engine, 2.1, FixtureKind::Block);

    engine.step(DT).unwrap();

    assert_eq!(*shot.hits.lock().unwrap(), vec![FixtureKind::Block]);
}

#[test]
fn blocks_report_bodies_touching_them() {
    let mut engine = engine();
    let heard: HitLog = Arc::default();
    let wall = engine.spawn(
        still(0.0, 0.0, 2.0, 2.0).with_fixture(Fixture::rect(FixtureKind::Block, 2.0, 2.0)),
    );
    let crate_body = engine.spawn(
        still(1.5, 0.0, 1.0, 1.0)
            .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0).with(recorder(&heard))),
    );

    engine.step(DT).unwrap();
    assert!(engine
        .world()
        .get::<Body>(crate_body)
        .unwrap()
        .is_sensing(BodySense::BodyTouchingBlock));
    assert_eq!(phases(&heard), vec![(ContactPhase::Begin, FixtureKind::Block)]);

    engine
        .world_mut()
        .get_mut::<Body>(wall)
        .unwrap()
        .labels
        .insert(BodyLabel::NoBodyTouchie);
    engine.step(DT).unwrap();
    assert!(!engine
        .world()
        .get::<Body>(crate_body)
        .unwrap()
        .is_sensing(BodySense::BodyTouchingBlock));
    assert_eq!(heard.lock().unwrap().len(), 1);
}

#[test]
fn stomped_bodies_hear_every_phase() {
    let mut engine = engine();
    let heard: HitLog = Arc::default();
    let enemy = engine.spawn(
        still(0.0, 0.0, 1.0, 1.0)
            .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0).with(recorder(&heard))),
    );
    let stomper = engine.spawn(still(0.0, 0.95, 1.0, 1.0).with_fixture(feet()));

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();
    move_to(&mut engine, stomper, 10.0, 10.0);
    engine.step(DT).unwrap();

    assert_eq!(
        phases(&heard),
        vec![
            (ContactPhase::Begin, FixtureKind::Feet),
            (ContactPhase::Continue, FixtureKind::Feet),
            (ContactPhase::End, FixtureKind::Feet),
        ]
    );
    let first = heard.lock().unwrap()[0];
    assert_eq!(first.receiver.entity, enemy);
    assert_eq!(first.by.entity, stomper);
}

#[test]
fn touching_sides_both_hear_each_other() {
    let mut engine = engine();
    let left_log: HitLog = Arc::default();
    let right_log: HitLog = Arc::default();
    let side = |log: &HitLog| Fixture::rect(FixtureKind::Side, 0.2, 0.8).with(recorder(log));
    engine.spawn(still(0.0, 0.0, 0.2, 0.8).with_fixture(side(&left_log)));
    engine.spawn(still(0.1, 0.0, 0.2, 0.8).with_fixture(side(&right_log)));

    engine.step(DT).unwrap();

    assert_eq!(phases(&left_log), vec![(ContactPhase::Begin, FixtureKind::Side)]);
    assert_eq!(phases(&right_log), vec![(ContactPhase::Begin, FixtureKind::Side)]);
}

#[test]
fn lasers_and_bodies_hear_each_other() {
    let mut engine = engine();
    let body_log: HitLog = Arc::default();
    let laser_log: HitLog = Arc::default();
    engine.spawn(
        still(0.0, 0.0, 0.0, 0.0).with_fixture(
            Fixture::line(FixtureKind::Laser, Vec2::new(0.0, 0.5), Vec2::new(10.0, 0.5))
                .with(recorder(&laser_log)),
        ),
    );
    engine.spawn(
        still(4.0, 0.0, 1.0, 1.0)
            .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0).with(recorder(&body_log))),
    );

    engine.step(DT).unwrap();
    engine.step(DT).unwrap();

    let expected_body = vec![
        (ContactPhase::Begin, FixtureKind::Laser),
        (ContactPhase::Continue, FixtureKind::Laser),
    ];
    assert_eq!(phases(&body_log), expected_body);
    let expected_laser = vec![
        (ContactPhase::Begin, FixtureKind::Body),
        (ContactPhase::Continue, FixtureKind::Body),
    ];
    assert_eq!(phases(&laser_log), expected_laser);
}

#[test]
fn lasers_stop_at_shields_from_the_first_step() {
    let mut engine = engine();
    let laser = engine.spawn(
        still(0.0, 0.0, 0.0, 0.0).with_fixture(
            Fixture::line(FixtureKind::Laser, Vec2::new(0.0, 0.5), Vec2::new(10.0, 0.5))
                .with(FixtureData::LaserHits(Vec::new())),
        ),
    );
    engine.spawn(
        still(4.0, 0.0, 1.0, 1.0)
            .with_fixture(Fixture::rect(FixtureKind::Block, 1.0, 1.0))
            .with_fixture(Fixture::rect(FixtureKind::Shield, 1.0, 1.0)),
    );
    let hits = |engine: &Engine| {
        engine.world().get::<Body>(laser).unwrap().fixtures[0]
            .laser_hits()
            .map(<[Vec2]>::to_vec)
            .unwrap_or_default()
    };

    engine.step(DT).unwrap();
    assert_eq!(hits(&engine).len(), 2);

    // the block fixture defers to the shield, so hits are not doubled
    engine.step(DT).unwrap();
    let points = hits(&engine);
    assert_eq!(points.len(), 2);
    assert!(points.iter().any(|p| approx_eq(p.x, 4.0)));
}

fn gravity_zone(engine: &mut Engine, change: GravityChange) {
    engine.spawn(
        still(0.0, 0.0, 10.0, 10.0).with_fixture(
            Fixture::rect(FixtureKind::GravityChange, 10.0, 10.0)
                .with(FixtureData::GravityChange(change)),
        ),
    );
}

fn faller(engine: &mut Engine, control: GravityControl) -> Entity {
    engine.spawn((
        Body::new(4.0, 4.0, 1.0, 1.0)
            .unwrap()
            .with_fixture(Fixture::rect(FixtureKind::Body, 1.0, 1.0)),
        control,
    ))
}

#[test]
fn gravity_zone_rotates_and_scales_gravity() {
    let mut engine = engine();
    gravity_zone(
        &mut engine,
        GravityChange {
            scalar: Some(0.5),
            direction: Some(Direction::Down),
        },
    );
    let who = faller(&mut engine, GravityControl::new(10.0));

    engine.step(DT).unwrap();
    let control = *engine.world().get::<GravityControl>(who).unwrap();
    assert_eq!(control.direction, Direction::Down);
    assert!(approx_eq(control.scalar, 0.5));

    engine.step(DT).unwrap();
    let body = engine.world().get::<Body>(who).unwrap();
    assert!(approx_eq(body.gravity.y, 5.0));
}

#[test]
fn locked_gravity_controls_ignore_zones() {
    let mut engine = engine();
    gravity_zone(
        &mut engine,
        GravityChange {
            scalar: Some(0.5),
            direction: Some(Direction::Left),
        },
    );
    let mut control = GravityControl::new(10.0);
    control.scalable = false;
    let rotates_only = faller(&mut engine, control);
    let mut control = GravityControl::new(10.0);
    control.rotatable = false;
    let scales_only = faller(&mut engine, control);

    engine.step(DT).unwrap();

    let rotated = engine.world().get::<GravityControl>(rotates_only).unwrap();
    assert_eq!(rotated.direction, Direction::Left);
    assert!(approx_eq(rotated.scalar, 1.0));
    let scaled = engine.world().get::<GravityControl>(scales_only).unwrap();
    assert_eq!(scaled.direction, Direction::Up);
    assert!(approx_eq(scaled.scalar, 0.5));
}
