//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities
//! in the simulated world. Components hold the data the systems and contact
//! rules read and write: bodies and their fixtures, lifecycle flags, health,
//! projectiles and the gameplay markers the rules look for.
//!
//! Submodules overview:
//! - [`actiontask`] – what a player-like body may do next (jump, swim, air dash)
//! - [`behaviors`] – registered, individually toggleable behaviors such as wall sliding
//! - [`body`] – physics body: bounds, velocity, fixtures, senses and labels
//! - [`bodysense`] – per-step contact senses and their bit set
//! - [`fixture`] – typed contact shapes attached to a body, with payloads
//! - [`gate`] – gates opened by the player touching a GATE fixture
//! - [`gravity`] – entity-owned gravity rewritten by GRAVITY_CHANGE zones
//! - [`health`] – health points, damagers and damageables with invincibility
//! - [`item`] – player marker and collectible items
//! - [`lifecycle`] – alive and asleep flags, plus the `kill` helper
//! - [`projectile`] – projectile owner and pluggable hit behavior
//! - [`ttl`] – time-to-live countdown for automatic expiry
//! - [`upsidedown`] – marker for bodies with inverted gravity

pub mod actiontask;
pub mod behaviors;
pub mod body;
pub mod bodysense;
pub mod fixture;
pub mod gate;
pub mod gravity;
pub mod health;
pub mod item;
pub mod lifecycle;
pub mod projectile;
pub mod ttl;
pub mod upsidedown;
