//! Engine error types.
//!
//! Every variant marks a setup or scheduling bug. Errors stop the current
//! step and are handed back to the caller of [`Engine::step`](crate::engine::Engine::step).

use bevy_ecs::prelude::Entity;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A body was created or resized with a negative dimension.
    #[error("body size must be non-negative, got {width}x{height}")]
    NegativeBodySize { width: f32, height: f32 },

    /// A system tried to clear its own membership during its update.
    #[error("cannot clear system '{system}' while it is updating")]
    ClearWhileUpdating { system: String },

    /// A scheduler call referenced a system that was never registered.
    #[error("no system registered under key {0}")]
    UnknownSystem(usize),

    /// A contact rule needed a component the entity does not carry.
    #[error("entity {entity} has a {fixture} fixture but no {capability} component")]
    MissingCapability {
        entity: Entity,
        fixture: &'static str,
        capability: &'static str,
    },

    /// A behavior was queried on an entity that never registered it.
    #[error("entity {entity} has no behavior '{behavior}' registered")]
    UnregisteredBehavior { entity: Entity, behavior: String },

    /// Scene file could not be read or parsed.
    #[error("failed to load scene: {0}")]
    Scene(String),
}
