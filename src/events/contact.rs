//! Gameplay effects produced while resolving contacts.
//!
//! Contact rules write [`ContactEffect`] messages for everything an outside
//! collaborator (audio, particles, UI) may want to react to. The engine calls
//! `Messages::<ContactEffect>::update` at the end of every step, so a message
//! stays readable for the step it was written in and the one after.
//!
//! # Example
//! ```ignore
//! let messages = world.resource::<Messages<ContactEffect>>();
//! for effect in messages.iter_current_update_messages() {
//!     if let ContactEffect::Splash { entity, .. } = effect {
//!         play_splash_at(*entity);
//!     }
//! }
//! ```

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;

#[derive(Message, Debug, Clone, PartialEq)]
pub enum ContactEffect {
    /// A body entered (`entering`) or left the last water it was touching.
    Splash {
        entity: Entity,
        water: Entity,
        entering: bool,
    },
    DamageInflicted {
        damager: Entity,
        damageable: Entity,
        amount: i32,
    },
    /// A DEATH fixture depleted or destroyed `entity`.
    Killed { entity: Entity, by: Entity },
    GateTriggered { gate: Entity, by: Entity },
    ItemCollected {
        item: Entity,
        player: Entity,
        kind: String,
    },
    Bounced { entity: Entity, bouncer: Entity },
}
