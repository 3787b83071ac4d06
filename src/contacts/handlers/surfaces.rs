//! Surface rules: the handlers that assert sense flags and move bodies.
//!
//! Level flags are set here and by the block-body receiver. The world system
//! clears all of them at the start of every step, so a body that stops
//! touching a surface loses the flag on the first step without a matching
//! begin or continue. End handlers
//! only maintain edge state: contact counters, the ladder reference, the
//! action task and splash effects.

use bevy_ecs::prelude::Entity;

use crate::components::actiontask::ActionTask;
use crate::components::behaviors::{Behaviors, WALL_SLIDING};
use crate::components::body::BodyLabel;
use crate::components::bodysense::BodySense;
use crate::components::fixture::{FixtureKind, Side};
use crate::components::gravity::GravityControl;
use crate::components::upsidedown::UpsideDown;
use crate::contacts::{ContactPhase, RuleContext};
use crate::error::EngineError;
use crate::events::contact::ContactEffect;

use super::receivers::notify;

fn block_has_label(ctx: &RuleContext<'_>, entity: Entity, label: BodyLabel) -> bool {
    ctx.body(entity).is_some_and(|body| body.has_label(label))
}

fn set_task(ctx: &mut RuleContext<'_>, entity: Entity, task: ActionTask) {
    if let Some(mut current) = ctx.world.get_mut::<ActionTask>(entity) {
        *current = task;
    }
}

/// BLOCK x SIDE, begin and continue.
pub fn side_touching_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let block = ctx.first.entity;
    let side_fixture = ctx.second;
    if block_has_label(ctx, block, BodyLabel::NoSideTouchie) {
        return Ok(());
    }
    let Some(side) = ctx.fixture(side_fixture).and_then(|f| f.side()) else {
        return Ok(());
    };
    let sense = match side {
        Side::Left => BodySense::SideTouchingBlockLeft,
        Side::Right => BodySense::SideTouchingBlockRight,
    };
    if let Some(mut body) = ctx.body_mut(side_fixture.entity) {
        body.set_sense(sense, true);
    }
    let block_fixture = ctx.first;
    notify(ctx, side_fixture, block_fixture);
    Ok(())
}

/// SIDE x ICE, begin and continue.
pub fn side_touching_ice(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let side_fixture = ctx.first;
    let Some(side) = ctx.fixture(side_fixture).and_then(|f| f.side()) else {
        return Ok(());
    };
    let sense = match side {
        Side::Left => BodySense::SideTouchingIceLeft,
        Side::Right => BodySense::SideTouchingIceRight,
    };
    let ice_friction = ctx.config.ice_friction;
    if let Some(mut body) = ctx.body_mut(side_fixture.entity) {
        body.set_sense(sense, true);
        body.friction.y = ice_friction;
    }
    Ok(())
}

/// FEET x BLOCK, begin and continue: stand on the block and ride it.
/// Blocks with collision off hold nobody up.
pub fn feet_on_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let feet = ctx.first;
    let block = ctx.second.entity;
    let Some(block_body) = ctx.body(block) else {
        return Ok(());
    };
    if block_body.has_label(BodyLabel::NoFeetTouchie) || !block_body.collision_on {
        return Ok(());
    }
    let block_delta = block_body.position_delta();
    let stick = ctx.fixture(feet).is_none_or(|f| f.sticks_to_block());
    let ground_friction = ctx.config.ground_friction;

    if let Some(mut body) = ctx.body_mut(feet.entity) {
        body.set_sense(BodySense::FeetOnGround, true);
        if stick {
            body.translate(block_delta);
        }
        // ice wins regardless of resolution order
        if !body.is_sensing(BodySense::FeetOnIce) {
            body.friction.x = ground_friction;
        }
    }
    set_task(ctx, feet.entity, ActionTask::Jump);
    let block_fixture = ctx.second;
    notify(ctx, feet, block_fixture);
    Ok(())
}

/// FEET x BLOCK, end. The flag itself is cleared by the per-step reset.
pub fn feet_leave_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let feet = ctx.first.entity;
    if block_has_label(ctx, ctx.second.entity, BodyLabel::NoFeetTouchie) {
        return Ok(());
    }
    let in_water = ctx.body(feet).is_some_and(|body| body.water_contacts > 0);
    let task = if in_water {
        ActionTask::Swim
    } else {
        ActionTask::AirDash
    };
    set_task(ctx, feet, task);
    let (receiver, by) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// FEET x ICE, begin and continue.
pub fn feet_on_ice(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let feet = ctx.first.entity;
    let ice_friction = ctx.config.ice_friction;
    if let Some(mut body) = ctx.body_mut(feet) {
        body.set_sense(BodySense::FeetOnIce, true);
        body.friction.x = ice_friction;
    }
    Ok(())
}

/// BOUNCER x {FEET, HEAD, SIDE}, begin.
pub fn bounce(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let bouncer = ctx.first;
    let struck = ctx.second;
    let (alteration, bouncer_callback) = match ctx.fixture(bouncer) {
        Some(fixture) => (fixture.bounce(), fixture.on_bounce().cloned()),
        None => return Ok(()),
    };
    let struck_callback = ctx.fixture(struck).and_then(|f| f.on_bounce().cloned());

    if let Some(alteration) = alteration {
        if let Some(mut body) = ctx.body_mut(struck.entity) {
            alteration.apply(&mut body.velocity);
        }
    }
    if let Some(callback) = bouncer_callback {
        callback(&mut *ctx.world, bouncer.entity);
    }
    if let Some(callback) = struck_callback {
        callback(&mut *ctx.world, struck.entity);
    }
    ctx.emit(ContactEffect::Bounced {
        entity: struck.entity,
        bouncer: bouncer.entity,
    });
    Ok(())
}

/// HEAD x BLOCK, begin: stop rising.
pub fn head_hits_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let head = ctx.first.entity;
    if block_has_label(ctx, ctx.second.entity, BodyLabel::CollideDownOnly) {
        return Ok(());
    }
    if let Some(mut body) = ctx.body_mut(head) {
        if body.velocity.y > 0.0 {
            body.velocity.y = 0.0;
        }
        body.set_sense(BodySense::HeadTouchingBlock, true);
    }
    let (receiver, by) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// HEAD x BLOCK, continue.
pub fn head_under_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let head = ctx.first.entity;
    if block_has_label(ctx, ctx.second.entity, BodyLabel::CollideDownOnly) {
        return Ok(());
    }
    if let Some(mut body) = ctx.body_mut(head) {
        body.set_sense(BodySense::HeadTouchingBlock, true);
    }
    let (receiver, by) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// WATER_LISTENER x WATER, begin.
pub fn enter_water(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let listener = ctx.first.entity;
    let water = ctx.second.entity;
    let (entering, on_ground) = match ctx.body_mut(listener) {
        Some(mut body) => {
            let entering = body.water_contacts == 0;
            body.water_contacts = body.water_contacts.saturating_add(1);
            body.set_sense(BodySense::InWater, true);
            (entering, body.is_sensing(BodySense::FeetOnGround))
        }
        None => return Ok(()),
    };

    if entering {
        ctx.emit(ContactEffect::Splash {
            entity: listener,
            water,
            entering: true,
        });
    }

    let wall_sliding = match ctx.world.get::<Behaviors>(listener) {
        Some(behaviors) if behaviors.contains(WALL_SLIDING) => {
            behaviors.is_active(listener, WALL_SLIDING)?
        }
        _ => false,
    };
    if !on_ground && !wall_sliding {
        set_task(ctx, listener, ActionTask::Swim);
    }
    Ok(())
}

/// WATER_LISTENER x WATER, continue.
pub fn stay_in_water(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let listener = ctx.first.entity;
    if let Some(mut body) = ctx.body_mut(listener) {
        body.set_sense(BodySense::InWater, true);
    }
    Ok(())
}

/// WATER_LISTENER x WATER, end.
pub fn leave_water(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let listener = ctx.first.entity;
    let water = ctx.second.entity;
    let left = match ctx.body_mut(listener) {
        Some(mut body) => {
            body.water_contacts = body.water_contacts.saturating_sub(1);
            body.water_contacts == 0
        }
        None => return Ok(()),
    };
    if left {
        ctx.emit(ContactEffect::Splash {
            entity: listener,
            water,
            entering: false,
        });
        set_task(ctx, listener, ActionTask::AirDash);
    }
    Ok(())
}

fn ladder_sense(kind: FixtureKind) -> Option<BodySense> {
    match kind {
        FixtureKind::Head => Some(BodySense::HeadTouchingLadder),
        FixtureKind::Feet => Some(BodySense::FeetTouchingLadder),
        _ => None,
    }
}

/// {HEAD, FEET} x LADDER, begin.
pub fn grab_ladder(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let climber = ctx.first;
    let ladder = ctx.second.entity;
    let Some(sense) = ctx.fixture(climber).and_then(|f| ladder_sense(f.kind)) else {
        return Ok(());
    };
    if let Some(mut body) = ctx.body_mut(climber.entity) {
        body.ladder_contacts = body.ladder_contacts.saturating_add(1);
        body.set_sense(sense, true);
        body.ladder = Some(ladder);
    }
    Ok(())
}

/// {HEAD, FEET} x LADDER, continue. Head checks its top centre, feet their
/// bottom centre; the flag holds only while that point is on the ladder.
pub fn hold_ladder(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let climber = ctx.first;
    let ladder = ctx.second;
    let Some(kind) = ctx.fixture(climber).map(|f| f.kind) else {
        return Ok(());
    };
    let Some(sense) = ladder_sense(kind) else {
        return Ok(());
    };
    let (Some(climber_shape), Some(ladder_shape)) = (ctx.world_shape(climber), ctx.world_shape(ladder))
    else {
        return Ok(());
    };
    let bounds = climber_shape.aabb();
    let anchor = if kind == FixtureKind::Head {
        bounds.top_center()
    } else {
        bounds.bottom_center()
    };
    if !ladder_shape.contains(anchor) {
        return Ok(());
    }
    if let Some(mut body) = ctx.body_mut(climber.entity) {
        body.set_sense(sense, true);
        body.ladder = Some(ladder.entity);
    }
    Ok(())
}

/// {HEAD, FEET} x LADDER, end. The ladder reference goes only once neither
/// head nor feet touch a ladder.
pub fn release_ladder(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let climber = ctx.first.entity;
    if let Some(mut body) = ctx.body_mut(climber) {
        body.ladder_contacts = body.ladder_contacts.saturating_sub(1);
        if body.ladder_contacts == 0 {
            body.ladder = None;
        }
    }
    Ok(())
}

/// BODY x FORCE, begin and continue: a field, applied every step of contact.
pub fn apply_force(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let struck = ctx.first.entity;
    let Some(force) = ctx.fixture(ctx.second).and_then(|f| f.force().cloned()) else {
        return Ok(());
    };
    let alteration = force(&*ctx.world, struck, ctx.delta);
    if let Some(mut body) = ctx.body_mut(struck) {
        alteration.apply(&mut body.velocity);
        body.set_sense(BodySense::ForceApplied, true);
    }
    Ok(())
}

/// BODY x GRAVITY_CHANGE, begin and continue.
///
/// Takes effect once the body's leading point (the bounds point facing this
/// step's movement) is inside the zone. The scalar changes on begin only; the
/// direction follows on every step. Entities without a `GravityControl` are
/// unaffected.
pub fn change_gravity(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let entity = ctx.first.entity;
    let zone = ctx.second;
    let Some(change) = ctx.fixture(zone).and_then(|f| f.gravity_change()) else {
        return Ok(());
    };
    let (Some(zone_shape), Some(body)) = (ctx.world_shape(zone), ctx.body(entity)) else {
        return Ok(());
    };
    if !zone_shape.contains(body.bounds().leading_point(body.position_delta())) {
        return Ok(());
    }
    let phase = ctx.phase;
    let Some(mut control) = ctx.world.get_mut::<GravityControl>(entity) else {
        return Ok(());
    };
    if let Some(scalar) = change.scalar {
        if phase == ContactPhase::Begin && control.scalable {
            control.scalar = scalar;
        }
    }
    if let Some(direction) = change.direction {
        if control.rotatable && control.direction != direction {
            control.direction = direction;
        }
    }
    Ok(())
}

/// BODY x UPSIDE_DOWN, begin.
pub fn flip_upside_down(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    if let Ok(mut entity) = ctx.world.get_entity_mut(ctx.first.entity) {
        entity.insert(UpsideDown);
    }
    Ok(())
}

/// BODY x UPSIDE_DOWN, end.
pub fn flip_upright(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    if let Ok(mut entity) = ctx.world.get_entity_mut(ctx.first.entity) {
        entity.remove::<UpsideDown>();
    }
    Ok(())
}
