//! Built-in contact rule handlers.
//!
//! Each handler receives a [`RuleContext`](super::RuleContext) whose `first`
//! and `second` fixtures follow the declared order of the rule that owns the
//! pair. Handlers treat a missing body or payload as "no effect" and only
//! fail when an entity lacks a component the rule cannot work without.
//!
//! - [`surfaces`] – blocks, ice, water, ladders, bouncers, force and gravity fields
//! - [`combat`] – damage, death zones, projectiles, lasers
//! - [`interactions`] – consumers, gates, items
//! - [`receivers`] – hit-by notifications between bodies, feet, sides and lasers

pub mod combat;
pub mod interactions;
pub mod receivers;
pub mod surfaces;
