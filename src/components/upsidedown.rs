use bevy_ecs::prelude::Component;

/// Present while the entity's BODY fixture overlaps an UPSIDE_DOWN zone.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct UpsideDown;
