//! Fixture contact detection and resolution.
//!
//! Every step the [`ContactDetector`] recomputes the set of overlapping
//! active fixture pairs and tags each pair with a [`ContactPhase`] relative to
//! the previous step. The [`ContactResolver`] then looks up the rule that
//! owns the pair's kind combination and runs its handler for that phase.
//!
//! Submodules overview:
//! - [`detector`] – broad/narrow phase overlap and phase classification
//! - [`rules`] – rule declarations, the priority list and the compiled table
//! - [`context`] – accessors handed to rule handlers
//! - [`resolver`] – dispatches phase-tagged contacts to rule handlers
//! - [`handlers`] – the gameplay effect of every built-in rule

pub mod context;
pub mod detector;
pub mod handlers;
pub mod resolver;
pub mod rules;

use std::cmp::Ordering;

use bevy_ecs::prelude::Entity;

use crate::components::fixture::FixtureKind;

pub use context::RuleContext;
pub use detector::ContactDetector;
pub use resolver::ContactResolver;
pub use rules::{ContactRule, KindFilter, RuleTable, default_rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Begin,
    Continue,
    End,
}

/// Stable reference to one fixture: the owning entity and the fixture's
/// position in its body's fixture list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureHandle {
    pub entity: Entity,
    pub index: u16,
}

impl FixtureHandle {
    pub fn new(entity: Entity, index: u16) -> Self {
        Self { entity, index }
    }
}

impl Ord for FixtureHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entity
            .to_bits()
            .cmp(&other.entity.to_bits())
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for FixtureHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unordered fixture pair stored in canonical (smaller handle first) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactKey {
    first: FixtureHandle,
    second: FixtureHandle,
}

impl ContactKey {
    pub fn new(a: FixtureHandle, b: FixtureHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> FixtureHandle {
        self.first
    }

    pub fn second(&self) -> FixtureHandle {
        self.second
    }
}

/// One phase-tagged overlapping pair, with the kinds captured at detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub phase: ContactPhase,
    pub first: FixtureHandle,
    pub second: FixtureHandle,
    pub first_kind: FixtureKind,
    pub second_kind: FixtureKind,
}

impl Contact {
    pub fn key(&self) -> ContactKey {
        ContactKey::new(self.first, self.second)
    }

    /// True if the two fixtures are of kinds `a` and `b`, in either order.
    pub fn matches(&self, a: FixtureKind, b: FixtureKind) -> bool {
        (self.first_kind == a && self.second_kind == b)
            || (self.first_kind == b && self.second_kind == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn key_is_order_independent() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let ha = FixtureHandle::new(a, 1);
        let hb = FixtureHandle::new(b, 0);
        assert_eq!(ContactKey::new(ha, hb), ContactKey::new(hb, ha));
        assert!(ContactKey::new(hb, ha).first() < ContactKey::new(hb, ha).second());
    }

    #[test]
    fn handles_on_one_entity_order_by_index() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let key = ContactKey::new(FixtureHandle::new(e, 3), FixtureHandle::new(e, 1));
        assert_eq!(key.first().index, 1);
        assert_eq!(key.second().index, 3);
    }
}
