//! Collectible items and the player marker.

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity, World};

/// Marker for player-controlled entities. Gates and items react only to these.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Pickup callback: `(world, item, player)`.
pub type PickupFn = Arc<dyn Fn(&mut World, Entity, Entity) + Send + Sync>;

#[derive(Component, Clone)]
pub struct Item {
    pub kind: String,
    pub on_pickup: Option<PickupFn>,
    /// Item is marked dead once collected.
    pub consumed_on_pickup: bool,
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("kind", &self.kind)
            .field("consumed_on_pickup", &self.consumed_on_pickup)
            .finish_non_exhaustive()
    }
}

impl Item {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            on_pickup: None,
            consumed_on_pickup: true,
        }
    }

    pub fn with_on_pickup(mut self, callback: PickupFn) -> Self {
        self.on_pickup = Some(callback);
        self
    }
}
