//! Alive and asleep flags for an entity.
//!
//! Entities without a [`Lifecycle`] are treated as alive and awake. A dead
//! entity is dropped from every system's membership on the next pass and
//! despawned at the end of the step; an asleep entity keeps its memberships
//! but is skipped by `process_entity`.

use bevy_ecs::prelude::{Component, Entity, World};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub alive: bool,
    pub asleep: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            alive: true,
            asleep: false,
        }
    }
}

impl Lifecycle {
    pub fn dead() -> Self {
        Self {
            alive: false,
            asleep: false,
        }
    }
}

/// False if the entity was despawned or flagged dead.
pub fn is_alive(world: &World, entity: Entity) -> bool {
    match world.get_entity(entity) {
        Ok(entity_ref) => entity_ref.get::<Lifecycle>().is_none_or(|l| l.alive),
        Err(_) => false,
    }
}

pub fn is_asleep(world: &World, entity: Entity) -> bool {
    world
        .get::<Lifecycle>(entity)
        .is_some_and(|l| l.asleep)
}

/// Flag the entity dead, inserting a [`Lifecycle`] if it has none.
pub fn kill(world: &mut World, entity: Entity) {
    if let Some(mut lifecycle) = world.get_mut::<Lifecycle>(entity) {
        lifecycle.alive = false;
        return;
    }
    if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
        entity_mut.insert(Lifecycle::dead());
    }
}
