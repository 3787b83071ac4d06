//! Fixture engine library.
//!
//! A headless 2D simulation core: an entity update scheduler with
//! component-masked processing systems, and fixture contact detection and
//! resolution driven by a prioritized rule list.
//!
//! This module exposes the engine's components, contact rules, resources,
//! systems and messages for use in integration tests and as a reusable
//! library.

pub mod components;
pub mod contacts;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod resources;
pub mod scene;
pub mod scheduler;
pub mod systems;

pub use engine::Engine;
pub use error::EngineError;
