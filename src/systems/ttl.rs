//! TTL (Time-to-live) processor.
//!
//! [`TtlSystem`] is registered with a `Ttl` mask. Each step it:
//!
//! 1. decrements `remaining` on every member by the scaled delta;
//! 2. marks the entity dead once `remaining <= 0`.
//!
//! Dead entities leave every membership list on the next pass and are
//! despawned by the engine at the end of the step.

use bevy_ecs::prelude::Entity;

use crate::components::lifecycle::kill;
use crate::components::ttl::Ttl;
use crate::error::EngineError;
use crate::scheduler::{EntityProcessor, SystemContext};

#[derive(Debug, Default)]
pub struct TtlSystem;

impl EntityProcessor for TtlSystem {
    fn process_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EngineError> {
        let expired = match ctx.world.get_mut::<Ttl>(entity) {
            Some(mut ttl) => {
                ttl.remaining -= ctx.delta; // delta is already scaled by time_scale
                ttl.remaining <= 0.0
            }
            None => false,
        };
        if expired {
            kill(ctx.world, entity);
        }
        Ok(())
    }
}
