//! Message types emitted by the engine.
//!
//! Submodules:
//! - [`contact`] – gameplay effects written by contact rules (splashes,
//!   damage, kills, gates, items, bounces)
//!
//! See each submodule for concrete message data and example usage.
pub mod contact;
