//! Gravity owned by the entity rather than fixed on its body.
//!
//! A [`GravityControl`] keeps a base strength plus a scalar and an "up"
//! direction. GRAVITY_CHANGE fixtures rewrite the scalar and direction, and
//! the world system writes the resulting vector into the body before every
//! integration.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Which way is up for a gravity-controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn up_vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GravityControl {
    /// Acceleration magnitude before scaling.
    pub strength: f32,
    pub scalar: f32,
    pub direction: Direction,
    /// GRAVITY_CHANGE fixtures may rewrite `scalar`.
    pub scalable: bool,
    /// GRAVITY_CHANGE fixtures may rewrite `direction`.
    pub rotatable: bool,
}

impl GravityControl {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            scalar: 1.0,
            direction: Direction::Up,
            scalable: true,
            rotatable: true,
        }
    }

    /// Acceleration pulling away from `direction`.
    pub fn gravity(&self) -> Vec2 {
        -self.direction.up_vector() * self.strength * self.scalar
    }
}

/// Payload of a GRAVITY_CHANGE fixture. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GravityChange {
    pub scalar: Option<f32>,
    pub direction: Option<Direction>,
}
