//! Context handed to rule handlers.

use bevy_ecs::change_detection::Mut;
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::{Component, Entity, World};
use log::warn;

use super::{ContactPhase, FixtureHandle};
use crate::components::body::Body;
use crate::components::fixture::Fixture;
use crate::error::EngineError;
use crate::events::contact::ContactEffect;
use crate::geometry::Shape;
use crate::resources::physicsconfig::PhysicsConfig;

/// One contact being resolved. `first` and `second` follow the owning
/// rule's declared order, so a FEET x BLOCK handler always sees the feet
/// fixture as `first`.
pub struct RuleContext<'w> {
    pub world: &'w mut World,
    pub phase: ContactPhase,
    pub first: FixtureHandle,
    pub second: FixtureHandle,
    pub delta: f32,
    pub config: &'w PhysicsConfig,
}

impl<'w> RuleContext<'w> {
    pub fn body(&self, entity: Entity) -> Option<&Body> {
        self.world.get::<Body>(entity)
    }

    pub fn body_mut(&mut self, entity: Entity) -> Option<Mut<'_, Body>> {
        self.world.get_mut::<Body>(entity)
    }

    pub fn fixture(&self, handle: FixtureHandle) -> Option<&Fixture> {
        self.body(handle.entity)?.fixtures.get(usize::from(handle.index))
    }

    pub fn fixture_mut(&mut self, handle: FixtureHandle) -> Option<&mut Fixture> {
        self.world
            .get_mut::<Body>(handle.entity)?
            .into_inner()
            .fixtures
            .get_mut(usize::from(handle.index))
    }

    /// Current world-space shape of a fixture.
    pub fn world_shape(&self, handle: FixtureHandle) -> Option<Shape> {
        let body = self.body(handle.entity)?;
        let fixture = body.fixtures.get(usize::from(handle.index))?;
        Some(fixture.world_shape(body.center()))
    }

    /// Component a rule cannot run without.
    pub fn require<T: Component>(
        &self,
        entity: Entity,
        fixture: &'static str,
        capability: &'static str,
    ) -> Result<&T, EngineError> {
        self.world
            .get::<T>(entity)
            .ok_or(EngineError::MissingCapability {
                entity,
                fixture,
                capability,
            })
    }

    pub fn require_mut<T: Component<Mutability = bevy_ecs::component::Mutable>>(
        &mut self,
        entity: Entity,
        fixture: &'static str,
        capability: &'static str,
    ) -> Result<Mut<'_, T>, EngineError> {
        self.world
            .get_mut::<T>(entity)
            .ok_or(EngineError::MissingCapability {
                entity,
                fixture,
                capability,
            })
    }

    pub fn emit(&mut self, effect: ContactEffect) {
        match self.world.get_resource_mut::<Messages<ContactEffect>>() {
            Some(mut messages) => {
                messages.write(effect);
            }
            None => warn!("ContactEffect mailbox missing, dropped {:?}", effect),
        }
    }
}

/// Fails with `MissingCapability` unless `entity` carries a `T`.
pub fn require_component<T: Component>(
    world: &World,
    entity: Entity,
    fixture: &'static str,
    capability: &'static str,
) -> Result<(), EngineError> {
    if world.get::<T>(entity).is_some() {
        Ok(())
    } else {
        Err(EngineError::MissingCapability {
            entity,
            fixture,
            capability,
        })
    }
}
