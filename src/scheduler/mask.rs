use bevy_ecs::component::ComponentId;
use bevy_ecs::prelude::{Component, Entity, World};
use smallvec::SmallVec;

/// Set of component types an entity must hold to belong to a system.
///
/// Ids come from `World::register_component`, so a mask is only meaningful
/// for the world it was built against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMask {
    ids: SmallVec<[ComponentId; 4]>,
}

impl ComponentMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Component>(mut self, world: &mut World) -> Self {
        let id = world.register_component::<T>();
        if let Err(slot) = self.ids.binary_search(&id) {
            self.ids.insert(slot, id);
        }
        self
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True if the entity exists and holds every component in the mask.
    pub fn qualifies(&self, world: &World, entity: Entity) -> bool {
        match world.get_entity(entity) {
            Ok(entity_ref) => self.ids.iter().all(|id| entity_ref.contains_id(*id)),
            Err(_) => false,
        }
    }
}
