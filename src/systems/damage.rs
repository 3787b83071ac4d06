//! Invincibility countdown and death on depleted health.

use bevy_ecs::prelude::Entity;
use log::debug;

use crate::components::health::{Damageable, Health};
use crate::components::lifecycle::kill;
use crate::error::EngineError;
use crate::scheduler::{EntityProcessor, SystemContext};

/// Ticks [`Damageable`] invincibility timers. Mask: `Damageable`.
#[derive(Debug, Default)]
pub struct DamageableSystem;

impl EntityProcessor for DamageableSystem {
    fn process_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EngineError> {
        if let Some(mut damageable) = ctx.world.get_mut::<Damageable>(entity) {
            if damageable.is_invincible() {
                damageable.tick(ctx.delta);
            }
        }
        Ok(())
    }
}

/// Marks entities with depleted [`Health`] dead. Mask: `Health`.
#[derive(Debug, Default)]
pub struct HealthSystem;

impl EntityProcessor for HealthSystem {
    fn process_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EngineError> {
        let depleted = ctx
            .world
            .get::<Health>(entity)
            .is_some_and(|h| h.is_depleted());
        if depleted {
            debug!("{:?} ran out of health", entity);
            kill(ctx.world, entity);
        }
        Ok(())
    }
}
