//! Hit-by receivers: rules whose only job is telling a fixture what touched it.
//!
//! A fixture opts in with a [`FixtureData::HitBy`] payload. Fixtures without
//! one ignore these contacts, so the rules cost nothing for plain bodies.
//!
//! [`FixtureData::HitBy`]: crate::components::fixture::FixtureData::HitBy

use crate::components::body::BodyLabel;
use crate::components::bodysense::BodySense;
use crate::components::fixture::HitBy;
use crate::contacts::{ContactPhase, FixtureHandle, RuleContext};
use crate::error::EngineError;

/// Call `receiver`'s hit-by payload, if any, with `by` as the toucher.
pub fn notify(ctx: &mut RuleContext<'_>, receiver: FixtureHandle, by: FixtureHandle) {
    let Some(callback) = ctx.fixture(receiver).and_then(|f| f.hit_by().cloned()) else {
        return;
    };
    let Some(by_kind) = ctx.fixture(by).map(|f| f.kind) else {
        return;
    };
    callback(
        &mut *ctx.world,
        HitBy {
            phase: ctx.phase,
            receiver,
            by,
            by_kind,
        },
    );
}

/// BLOCK x BODY, every phase: body-touching-block while touching, and the
/// body fixture hears about the block. Skipped for `NoBodyTouchie` blocks.
pub fn body_touching_block(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let block = ctx.first;
    let body_fixture = ctx.second;
    if ctx
        .body(block.entity)
        .is_some_and(|body| body.has_label(BodyLabel::NoBodyTouchie))
    {
        return Ok(());
    }
    notify(ctx, body_fixture, block);
    if ctx.phase != ContactPhase::End {
        if let Some(mut body) = ctx.body_mut(body_fixture.entity) {
            body.set_sense(BodySense::BodyTouchingBlock, true);
        }
    }
    Ok(())
}

/// BODY x FEET, every phase: the body fixture is stood on.
pub fn body_hit_by_feet(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (receiver, by) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// HEAD x FEET, every phase: the head is stood on.
pub fn head_hit_by_feet(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (receiver, by) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// BODY x SIDE, every phase: the side fixture brushes a body, unless the
/// body is labelled `NoSideTouchie`.
pub fn side_hit_by_body(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let body_fixture = ctx.first;
    if ctx
        .body(body_fixture.entity)
        .is_some_and(|body| body.has_label(BodyLabel::NoSideTouchie))
    {
        return Ok(());
    }
    let side = ctx.second;
    notify(ctx, side, body_fixture);
    Ok(())
}

/// BODY x BODY and SIDE x SIDE: both fixtures hear about each other.
pub fn mutual(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (a, b) = (ctx.first, ctx.second);
    notify(ctx, a, b);
    notify(ctx, b, a);
    Ok(())
}

/// SHIELD x SIDE, begin.
pub fn side_hit_by_shield(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (by, receiver) = (ctx.first, ctx.second);
    notify(ctx, receiver, by);
    Ok(())
}

/// LASER x BODY, begin and continue: the body hears about the laser and the
/// laser about the body. A laser never hits its own entity.
pub fn laser_hits_body(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let (laser, body) = (ctx.first, ctx.second);
    if laser.entity == body.entity {
        return Ok(());
    }
    notify(ctx, body, laser);
    notify(ctx, laser, body);
    Ok(())
}
