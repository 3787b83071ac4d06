//! Projectiles and their per-surface hit behavior.
//!
//! The PROJECTILE contact rule does not know what a projectile does on
//! impact; it forwards the hit to the entity's [`ProjectileBehavior`]. The
//! default `hit_shield` reflects the shot back towards its source.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity, World};

use crate::components::body::Body;
use crate::components::fixture::ReflectDirection;
use crate::components::lifecycle::kill;
use crate::contacts::FixtureHandle;
use crate::error::EngineError;

/// One projectile impact. `other` is the struck fixture.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileHit {
    pub projectile: FixtureHandle,
    pub other: FixtureHandle,
    pub deflection_speed: f32,
}

pub trait ProjectileBehavior: Send + Sync {
    fn hit_block(&self, world: &mut World, hit: &ProjectileHit) -> Result<(), EngineError> {
        let _ = (world, hit);
        Ok(())
    }

    fn hit_body(&self, world: &mut World, hit: &ProjectileHit) -> Result<(), EngineError> {
        let _ = (world, hit);
        Ok(())
    }

    fn hit_shield(&self, world: &mut World, hit: &ProjectileHit) -> Result<(), EngineError> {
        reflect(world, hit);
        Ok(())
    }

    fn hit_water(&self, world: &mut World, hit: &ProjectileHit) -> Result<(), EngineError> {
        let _ = (world, hit);
        Ok(())
    }
}

/// Plain bullet: dies on blocks, bounces off shields.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShot;

impl ProjectileBehavior for StandardShot {
    fn hit_block(&self, world: &mut World, hit: &ProjectileHit) -> Result<(), EngineError> {
        kill(world, hit.projectile.entity);
        Ok(())
    }
}

#[derive(Component, Clone)]
pub struct Projectile {
    /// Entity that fired the shot. Shots never hit their owner.
    pub owner: Option<Entity>,
    pub behavior: Arc<dyn ProjectileBehavior>,
}

impl fmt::Debug for Projectile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projectile")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl Projectile {
    pub fn new(owner: Option<Entity>, behavior: Arc<dyn ProjectileBehavior>) -> Self {
        Self { owner, behavior }
    }

    pub fn standard(owner: Option<Entity>) -> Self {
        Self::new(owner, Arc::new(StandardShot))
    }
}

/// Send the projectile back: horizontal velocity negated, vertical velocity
/// taken from the shield's reflect direction, ownership handed to the shield.
pub fn reflect(world: &mut World, hit: &ProjectileHit) {
    let direction = world
        .get::<Body>(hit.other.entity)
        .and_then(|body| body.fixtures.get(usize::from(hit.other.index)))
        .and_then(|fixture| fixture.reflect())
        .unwrap_or_default();

    if let Some(mut body) = world.get_mut::<Body>(hit.projectile.entity) {
        body.velocity.x = -body.velocity.x;
        body.velocity.y = match direction {
            ReflectDirection::Up => hit.deflection_speed,
            ReflectDirection::Down => -hit.deflection_speed,
            ReflectDirection::Straight => 0.0,
        };
    }
    if let Some(mut projectile) = world.get_mut::<Projectile>(hit.projectile.entity) {
        projectile.owner = Some(hit.other.entity);
    }
}
