//! Damage, death zones, projectiles and lasers.

use bevy_ecs::prelude::World;
use log::debug;

use crate::components::body::BodyLabel;
use crate::components::fixture::FixtureKind;
use crate::components::health::{Damageable, Damager, Health};
use crate::components::lifecycle::kill;
use crate::components::projectile::{Projectile, ProjectileHit};
use crate::contacts::context::require_component;
use crate::contacts::{FixtureHandle, RuleContext};
use crate::error::EngineError;
use crate::events::contact::ContactEffect;

/// DAMAGER x DAMAGEABLE needs a `Damager` on one side and `Damageable` plus
/// `Health` on the other.
pub fn damage_capabilities(
    world: &World,
    damager: FixtureHandle,
    damageable: FixtureHandle,
) -> Result<(), EngineError> {
    require_component::<Damager>(world, damager.entity, "DAMAGER", "Damager")?;
    require_component::<Damageable>(world, damageable.entity, "DAMAGEABLE", "Damageable")?;
    require_component::<Health>(world, damageable.entity, "DAMAGEABLE", "Health")
}

/// PROJECTILE x anything needs a `Projectile` on the shot.
pub fn projectile_capabilities(
    world: &World,
    shot: FixtureHandle,
    _other: FixtureHandle,
) -> Result<(), EngineError> {
    require_component::<Projectile>(world, shot.entity, "PROJECTILE", "Projectile")
}

/// DAMAGER x DAMAGEABLE, begin and continue.
///
/// Damage lands only when the damager is enabled, the target negotiates an
/// amount for the damager's kind, the target is not invincible and the
/// target is not the owner of the shot doing the damage.
pub fn negotiate_damage(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let source = ctx.first.entity;
    let target = ctx.second.entity;

    let damager = ctx.require::<Damager>(source, "DAMAGER", "Damager")?;
    if !damager.enabled {
        return Ok(());
    }
    let kind = damager.kind.clone();
    let on_inflict = damager.on_inflict.clone();

    if ctx
        .world
        .get::<Projectile>(source)
        .is_some_and(|p| p.owner == Some(target))
    {
        return Ok(());
    }

    let damageable = ctx.require::<Damageable>(target, "DAMAGEABLE", "Damageable")?;
    if damageable.is_invincible() {
        return Ok(());
    }
    let Some(amount) = damageable.negotiation(&kind) else {
        return Ok(());
    };

    ctx.require_mut::<Health>(target, "DAMAGEABLE", "Health")?
        .damage(amount);
    ctx.require_mut::<Damageable>(target, "DAMAGEABLE", "Damageable")?
        .start_invincibility();
    {
        let mut damager = ctx.require_mut::<Damager>(source, "DAMAGER", "Damager")?;
        damager.hits += 1;
        damager.last_hit = Some(target);
    }
    if let Some(callback) = on_inflict {
        callback(&mut *ctx.world, source, target);
    }

    debug!("{:?} hit {:?} with '{}' for {}", source, target, kind, amount);
    ctx.emit(ContactEffect::DamageInflicted {
        damager: source,
        damageable: target,
        amount,
    });
    Ok(())
}

/// DEATH x {FEET, SIDE, HEAD, BODY}, begin.
pub fn death(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let zone = ctx.first;
    let victim = ctx.second.entity;
    if ctx
        .body(victim)
        .is_some_and(|body| body.has_label(BodyLabel::IgnoreDeath))
    {
        return Ok(());
    }
    let instant = ctx.fixture(zone).is_some_and(|f| f.is_instant());

    if ctx.world.get::<Health>(victim).is_some() {
        let invincible = ctx
            .world
            .get::<Damageable>(victim)
            .is_some_and(|d| d.is_invincible());
        if !instant && invincible {
            return Ok(());
        }
        if let Some(mut health) = ctx.world.get_mut::<Health>(victim) {
            health.deplete();
        }
    } else {
        kill(ctx.world, victim);
    }
    ctx.emit(ContactEffect::Killed {
        entity: victim,
        by: zone.entity,
    });
    Ok(())
}

/// PROJECTILE x {BLOCK, BODY, SHIELD, WATER}, begin.
pub fn projectile_hit(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let shot = ctx.first;
    let other = ctx.second;
    let Some(kind) = ctx.fixture(other).map(|f| f.kind) else {
        return Ok(());
    };
    if ctx
        .body(other.entity)
        .is_some_and(|body| body.has_label(BodyLabel::NoProjectileCollision))
    {
        return Ok(());
    }

    let projectile = ctx.require::<Projectile>(shot.entity, "PROJECTILE", "Projectile")?;
    if projectile.owner == Some(other.entity) {
        return Ok(());
    }
    let behavior = projectile.behavior.clone();
    let hit = ProjectileHit {
        projectile: shot,
        other,
        deflection_speed: ctx.config.deflection_speed,
    };

    match kind {
        FixtureKind::Block => behavior.hit_block(ctx.world, &hit),
        FixtureKind::Body => behavior.hit_body(ctx.world, &hit),
        FixtureKind::Shield => behavior.hit_shield(ctx.world, &hit),
        FixtureKind::Water => behavior.hit_water(ctx.world, &hit),
        _ => Ok(()),
    }
}

/// LASER x BLOCK, continue: collect where the beam crosses the block.
/// Blocks that also carry a SHIELD fixture are left to the shield rule.
pub fn laser_hits_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (laser, block) = (ctx.first, ctx.second);
    if ctx
        .body(block.entity)
        .is_some_and(|body| body.fixtures_of(FixtureKind::Shield).next().is_some())
    {
        return Ok(());
    }
    collect_laser_hits(ctx, laser, block);
    Ok(())
}

/// LASER x SHIELD, begin and continue: collect where the beam crosses the
/// shield's bounds.
pub fn laser_hits_shield(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (laser, shield) = (ctx.first, ctx.second);
    collect_laser_hits(ctx, laser, shield);
    Ok(())
}

fn collect_laser_hits(ctx: &mut RuleContext<'_>, laser: FixtureHandle, target: FixtureHandle) {
    if laser.entity == target.entity {
        return;
    }
    let (Some(beam), Some(target)) = (ctx.world_shape(laser), ctx.world_shape(target)) else {
        return;
    };
    let Some(beam) = beam.as_polyline() else {
        return;
    };
    let bounds = target.as_rect().copied().unwrap_or_else(|| target.aabb());

    let mut points = Vec::new();
    beam.intersect_rect(&bounds, &mut points);
    if let Some(hits) = ctx.fixture_mut(laser).and_then(|f| f.laser_hits_mut()) {
        hits.extend(points);
    }
}
