//! Time-to-live component for automatic entity expiry.
//!
//! The [`Ttl`] component counts down simulation time. When the remaining time
//! reaches zero, [`TtlSystem`](crate::systems::ttl::TtlSystem) marks the
//! entity dead, and the engine despawns it at the end of the step. There is
//! no callback; it's a "fire and forget" mechanism for shots and effects.
//!
//! # Related
//!
//! - [`crate::systems::ttl::TtlSystem`] – processor that counts down and kills
//! - [`crate::components::lifecycle::Lifecycle`] – the dead flag it sets

use bevy_ecs::prelude::Component;

/// Time-to-live component that expires entities after a duration.
///
/// The countdown uses the scaled step delta, so it respects
/// [`WorldTime::time_scale`](crate::resources::worldtime::WorldTime).
#[derive(Component, Debug, Clone, Copy)]
pub struct Ttl {
    /// Remaining time in seconds before expiry.
    pub remaining: f32,
}

impl Ttl {
    /// Create a new Ttl with the given duration in seconds.
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }
}
