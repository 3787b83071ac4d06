//! Kinematic body with fixtures and sense flags.
//!
//! The [`Body`] component stores an axis-aligned bounding rectangle,
//! velocity, per-axis gravity and drag, and the ordered list of
//! [`Fixture`]s used for contact detection. Bodies are mutated only by the
//! world system's physics pass and by the contact rules it runs.
//!
//! # Fields
//! - `velocity` - current velocity in world units per second
//! - `gravity` - acceleration added every step while `gravity_on`
//! - `resistance` - default exponential drag per axis (0.0 = none)
//! - `friction` - drag used for the next integration; surfaces such as ice
//!   overwrite it during contact resolution and it falls back to `resistance`
//!   after every integration
//! - `velocity_clamp` - per-axis absolute velocity limit
//!
//! # Example
//! ```ignore
//! let body = Body::new(0.0, 0.0, 1.0, 2.0)?
//!     .with_gravity(Vec2::new(0.0, -30.0))
//!     .with_fixture(Fixture::rect(FixtureKind::Feet, 0.8, 0.2).with_offset(Vec2::new(0.0, -1.0)));
//! ```

use bevy_ecs::prelude::{Component, Entity, World};
use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::components::bodysense::{BodySense, SenseFlags};
use crate::components::fixture::{Fixture, FixtureKind};
use crate::error::EngineError;
use crate::geometry::Rect;

const DEFAULT_VELOCITY_CLAMP: f32 = 1000.0;

/// Hook run by the world system before contacts are detected. Typically
/// toggles fixture `active` flags from entity state.
pub type BodyHook = fn(world: &mut World, entity: Entity) -> Result<(), EngineError>;

/// Static tags that change how contact rules treat a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLabel {
    /// Side fixtures do not register touching this block.
    NoSideTouchie,
    /// Feet fixtures do not register standing on this block.
    NoFeetTouchie,
    /// One-way platform: heads pass through from below.
    CollideDownOnly,
    /// Projectiles pass through this body.
    NoProjectileCollision,
    /// DEATH fixtures have no effect on this body.
    IgnoreDeath,
    /// BODY fixtures do not register touching this block.
    NoBodyTouchie,
}

#[derive(Component, Debug, Clone)]
pub struct Body {
    bounds: Rect,
    previous_position: Vec2,
    pub velocity: Vec2,
    pub gravity: Vec2,
    pub gravity_on: bool,
    pub resistance: Vec2,
    pub friction: Vec2,
    pub velocity_clamp: Vec2,
    /// Blocks with collision off are not stood on.
    pub collision_on: bool,
    pub senses: SenseFlags,
    pub labels: FxHashSet<BodyLabel>,
    pub fixtures: Vec<Fixture>,
    pub pre_process: Option<BodyHook>,
    /// Ladder currently grabbed by head or feet.
    pub ladder: Option<Entity>,
    /// Head and feet fixtures currently overlapping a ladder.
    pub ladder_contacts: u8,
    /// Water listener fixtures currently overlapping water.
    pub water_contacts: u8,
}

impl Body {
    /// Create a body at `(x, y)` (bottom-left corner) with the given size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, EngineError> {
        check_size(width, height)?;
        Ok(Self {
            bounds: Rect::new(x, y, width, height),
            previous_position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            gravity: Vec2::ZERO,
            gravity_on: true,
            resistance: Vec2::ZERO,
            friction: Vec2::ZERO,
            velocity_clamp: Vec2::splat(DEFAULT_VELOCITY_CLAMP),
            collision_on: true,
            senses: SenseFlags::default(),
            labels: FxHashSet::default(),
            fixtures: Vec::new(),
            pre_process: None,
            ladder: None,
            ladder_contacts: 0,
            water_contacts: 0,
        })
    }

    /// Body of the given size centred on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32) -> Result<Self, EngineError> {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.fixtures.push(fixture);
        self
    }

    pub fn with_label(mut self, label: BodyLabel) -> Self {
        self.labels.insert(label);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_resistance(mut self, resistance: Vec2) -> Self {
        self.resistance = resistance;
        self.friction = resistance;
        self
    }

    pub fn with_pre_process(mut self, hook: BodyHook) -> Self {
        self.pre_process = Some(hook);
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn position(&self) -> Vec2 {
        self.bounds.position()
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.bounds.x = position.x;
        self.bounds.y = position.y;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.set_position(center - self.bounds.size() / 2.0);
    }

    pub fn translate(&mut self, by: Vec2) {
        self.bounds.translate(by);
    }

    /// Resize in place, keeping the bottom-left corner.
    pub fn set_size(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        check_size(width, height)?;
        self.bounds.width = width;
        self.bounds.height = height;
        Ok(())
    }

    /// Distance moved by this step's integration. Zero for a body that has
    /// not been integrated since the last [`Body::settle`].
    pub fn position_delta(&self) -> Vec2 {
        self.bounds.position() - self.previous_position
    }

    /// Anchor the position delta at the current position.
    pub fn settle(&mut self) {
        self.previous_position = self.bounds.position();
    }

    pub fn add_fixture(&mut self, fixture: Fixture) -> usize {
        self.fixtures.push(fixture);
        self.fixtures.len() - 1
    }

    pub fn fixtures_of(&self, kind: FixtureKind) -> impl Iterator<Item = &Fixture> + '_ {
        self.fixtures.iter().filter(move |f| f.kind == kind)
    }

    pub fn fixtures_of_mut(&mut self, kind: FixtureKind) -> impl Iterator<Item = &mut Fixture> + '_ {
        self.fixtures.iter_mut().filter(move |f| f.kind == kind)
    }

    pub fn has_label(&self, label: BodyLabel) -> bool {
        self.labels.contains(&label)
    }

    pub fn is_sensing(&self, sense: BodySense) -> bool {
        self.senses.is_sensing(sense)
    }

    pub fn set_sense(&mut self, sense: BodySense, on: bool) {
        self.senses.set(sense, on);
    }

    /// Advance one step: drag, gravity, clamp, then translate.
    pub fn integrate(&mut self, delta: f32) {
        self.previous_position = self.bounds.position();

        if self.friction.x > 0.0 {
            self.velocity.x *= (-self.friction.x * delta).exp();
        }
        if self.friction.y > 0.0 {
            self.velocity.y *= (-self.friction.y * delta).exp();
        }
        self.friction = self.resistance;

        if self.gravity_on {
            self.velocity += self.gravity * delta;
        }

        let clamp = self.velocity_clamp.abs();
        self.velocity = self.velocity.clamp(-clamp, clamp);

        self.bounds.translate(self.velocity * delta);
    }
}

fn check_size(width: f32, height: f32) -> Result<(), EngineError> {
    if width < 0.0 || height < 0.0 || width.is_nan() || height.is_nan() {
        return Err(EngineError::NegativeBodySize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn negative_size_is_rejected() {
        assert!(matches!(
            Body::new(0.0, 0.0, -1.0, 1.0),
            Err(EngineError::NegativeBodySize { .. })
        ));
        let mut body = Body::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(body.set_size(1.0, -0.5).is_err());
        assert!(approx_eq(body.bounds().height, 1.0));
    }

    #[test]
    fn integrate_applies_gravity_then_moves() {
        let mut body = Body::new(0.0, 10.0, 1.0, 1.0)
            .unwrap()
            .with_gravity(Vec2::new(0.0, -10.0));
        body.integrate(0.5);
        assert!(approx_eq(body.velocity.y, -5.0));
        assert!(approx_eq(body.position().y, 7.5));
        assert!(approx_eq(body.position_delta().y, -2.5));
    }

    #[test]
    fn integrate_without_gravity_keeps_velocity() {
        let mut body = Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_gravity(Vec2::new(0.0, -10.0))
            .with_velocity(Vec2::new(2.0, 0.0));
        body.gravity_on = false;
        body.integrate(1.0);
        assert!(approx_eq(body.velocity.y, 0.0));
        assert!(approx_eq(body.position().x, 2.0));
    }

    #[test]
    fn friction_override_lasts_one_step() {
        let mut body = Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_velocity(Vec2::new(10.0, 0.0));
        body.gravity_on = false;
        body.friction.x = 1.0;
        body.integrate(1.0);
        assert!(approx_eq(body.velocity.x, 10.0 * (-1.0f32).exp()));
        assert!(approx_eq(body.friction.x, 0.0));
        let before = body.velocity.x;
        body.integrate(1.0);
        assert!(approx_eq(body.velocity.x, before));
    }

    #[test]
    fn velocity_is_clamped_per_axis() {
        let mut body = Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_velocity(Vec2::new(50.0, -50.0));
        body.gravity_on = false;
        body.velocity_clamp = Vec2::new(20.0, 5.0);
        body.integrate(0.1);
        assert!(approx_eq(body.velocity.x, 20.0));
        assert!(approx_eq(body.velocity.y, -5.0));
    }

    #[test]
    fn settle_zeroes_the_delta_until_next_integration() {
        let mut body = Body::new(0.0, 0.0, 1.0, 1.0)
            .unwrap()
            .with_velocity(Vec2::new(1.0, 0.0));
        body.gravity_on = false;
        body.integrate(0.5);
        assert!(approx_eq(body.position_delta().x, 0.5));
        body.settle();
        assert_eq!(body.position_delta(), Vec2::ZERO);
        body.integrate(0.5);
        assert!(approx_eq(body.position_delta().x, 0.5));
    }

    #[test]
    fn set_center_keeps_size() {
        let mut body = Body::new(0.0, 0.0, 2.0, 4.0).unwrap();
        body.set_center(Vec2::new(5.0, 5.0));
        assert_eq!(body.bounds(), Rect::new(4.0, 3.0, 2.0, 4.0));
    }
}
