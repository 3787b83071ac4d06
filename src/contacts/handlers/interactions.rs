//! Consumers, gates and items.

use bevy_ecs::prelude::World;

use crate::components::gate::Gate;
use crate::components::item::{Item, Player};
use crate::components::lifecycle::kill;
use crate::contacts::context::require_component;
use crate::contacts::{FixtureHandle, RuleContext};
use crate::error::EngineError;
use crate::events::contact::ContactEffect;

/// CONSUMER x any, every phase: hand the other fixture to the consumer.
pub fn consume(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let Some(consumer) = ctx.fixture(ctx.first).and_then(|f| f.consumer().cloned()) else {
        return Ok(());
    };
    consumer(&mut *ctx.world, ctx.phase, ctx.second);
    Ok(())
}

/// A GATE fixture needs a `Gate` on its entity.
pub fn gate_capabilities(
    world: &World,
    _visitor: FixtureHandle,
    gate: FixtureHandle,
) -> Result<(), EngineError> {
    require_component::<Gate>(world, gate.entity, "GATE", "Gate")
}

/// An ITEM fixture needs an `Item` on its entity.
pub fn item_capabilities(
    world: &World,
    _player: FixtureHandle,
    item: FixtureHandle,
) -> Result<(), EngineError> {
    require_component::<Item>(world, item.entity, "ITEM", "Item")
}

/// {SIDE, FEET, HEAD} x GATE, begin. Only players open gates.
pub fn trigger_gate(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let visitor = ctx.first.entity;
    let gate_entity = ctx.second.entity;
    if ctx.world.get::<Player>(visitor).is_none() {
        return Ok(());
    }
    let triggered = ctx
        .require_mut::<Gate>(gate_entity, "GATE", "Gate")?
        .trigger();
    if triggered {
        ctx.emit(ContactEffect::GateTriggered {
            gate: gate_entity,
            by: visitor,
        });
    }
    Ok(())
}

/// PLAYER x ITEM, begin.
pub fn collect_item(ctx: &mut RuleContext<'_>) -> Result<(), EngineError> {
    let player = ctx.first.entity;
    let item_entity = ctx.second.entity;
    let item = ctx.require::<Item>(item_entity, "ITEM", "Item")?;
    let kind = item.kind.clone();
    let on_pickup = item.on_pickup.clone();
    let consumed = item.consumed_on_pickup;

    if let Some(callback) = on_pickup {
        callback(&mut *ctx.world, item_entity, player);
    }
    if consumed {
        kill(ctx.world, item_entity);
    }
    ctx.emit(ContactEffect::ItemCollected {
        item: item_entity,
        player,
        kind,
    });
    Ok(())
}
