//! Engine systems.
//!
//! Processors run by the [`Scheduler`](crate::scheduler::Scheduler), plus
//! the time helper the engine calls before every step.
//!
//! Submodules overview
//! - [`damage`] – invincibility countdown and death on depleted health
//! - [`time`] – update simulation time and scaled delta
//! - [`ttl`] – expire entities whose time-to-live ran out
//! - [`world`] – sense reset, integration, contact detection and resolution

pub mod damage;
pub mod time;
pub mod ttl;
pub mod world;
