//! Health, damage sources and damage targets.
//!
//! A [`Damager`] names its kind; a [`Damageable`] keeps a negotiation table
//! from damager kind to damage amount. The DAMAGER x DAMAGEABLE contact rule
//! looks the damager's kind up in that table, so the same damager can hurt
//! one target a lot and another not at all.
//!
//! # Example
//! ```ignore
//! world.spawn((
//!     Health::new(30),
//!     Damageable::new(1.0).with_negotiation("bullet", 10),
//! ));
//! world.spawn(Damager::new("bullet"));
//! ```

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::{Component, Entity, World};
use rustc_hash::FxHashMap;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Subtract `amount`, never going below zero.
    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount).max(0);
    }

    pub fn deplete(&mut self) {
        self.current = 0;
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Runs after a successful hit: `(world, damager, damageable)`.
pub type InflictCallback = Arc<dyn Fn(&mut World, Entity, Entity) + Send + Sync>;

#[derive(Component, Clone)]
pub struct Damager {
    /// Key into the target's negotiation table.
    pub kind: String,
    pub enabled: bool,
    pub hits: u32,
    pub last_hit: Option<Entity>,
    pub on_inflict: Option<InflictCallback>,
}

impl fmt::Debug for Damager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Damager")
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("hits", &self.hits)
            .field("last_hit", &self.last_hit)
            .finish_non_exhaustive()
    }
}

impl Damager {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            hits: 0,
            last_hit: None,
            on_inflict: None,
        }
    }

    pub fn with_on_inflict(mut self, callback: InflictCallback) -> Self {
        self.on_inflict = Some(callback);
        self
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Damageable {
    negotiations: FxHashMap<String, i32>,
    /// Seconds of invincibility granted after every hit.
    pub invincibility_duration: f32,
    invincibility_remaining: f32,
}

impl Damageable {
    pub fn new(invincibility_duration: f32) -> Self {
        Self {
            invincibility_duration,
            ..Default::default()
        }
    }

    pub fn with_negotiation(mut self, damager_kind: impl Into<String>, amount: i32) -> Self {
        self.negotiations.insert(damager_kind.into(), amount);
        self
    }

    pub fn negotiation(&self, damager_kind: &str) -> Option<i32> {
        self.negotiations.get(damager_kind).copied()
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining > 0.0
    }

    pub fn invincibility_remaining(&self) -> f32 {
        self.invincibility_remaining
    }

    pub fn start_invincibility(&mut self) {
        self.invincibility_remaining = self.invincibility_duration;
    }

    pub fn tick(&mut self, delta: f32) {
        self.invincibility_remaining = (self.invincibility_remaining - delta).max(0.0);
    }
}
