//! Named on/off behavior states (shielding, wall sliding, ...).
//!
//! Entities register the behaviors they support up front. Reading or toggling
//! an unregistered behavior is a setup bug and returns
//! [`EngineError::UnregisteredBehavior`].

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashMap;

use crate::error::EngineError;

pub const WALL_SLIDING: &str = "wall_sliding";
pub const SHIELDING: &str = "shielding";

#[derive(Component, Debug, Clone, Default)]
pub struct Behaviors {
    states: FxHashMap<String, bool>,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.register(name);
        self
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.states.entry(name.into()).or_insert(false);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn is_active(&self, entity: Entity, name: &str) -> Result<bool, EngineError> {
        self.states
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnregisteredBehavior {
                entity,
                behavior: name.to_string(),
            })
    }

    pub fn set_active(&mut self, entity: Entity, name: &str, active: bool) -> Result<(), EngineError> {
        match self.states.get_mut(name) {
            Some(state) => {
                *state = active;
                Ok(())
            }
            None => Err(EngineError::UnregisteredBehavior {
                entity,
                behavior: name.to_string(),
            }),
        }
    }
}
