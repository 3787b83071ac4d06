//! Fixtures: tagged collision shapes owned by a [`Body`](super::body::Body).
//!
//! A fixture is the unit of contact detection. Its [`FixtureKind`] selects the
//! contact rule that fires when it overlaps another fixture, and its
//! [`FixtureData`] payloads carry the kind-specific parameters those rules
//! read (which side a SIDE fixture sits on, the force function of a FORCE
//! fixture, and so on).
//!
//! Local shapes are expressed relative to the owning body's centre. The world
//! shape is recomputed from the body's current bounds every time it is asked
//! for, so it never lags behind the body.
//!
//! # Example
//!
//! ```ignore
//! let feet = Fixture::rect(FixtureKind::Feet, 0.8, 0.2).with_offset(Vec2::new(0.0, -0.5));
//! let left = Fixture::rect(FixtureKind::Side, 0.1, 0.8)
//!     .with_offset(Vec2::new(-0.5, 0.0))
//!     .with(FixtureData::Side(Side::Left));
//! ```

use std::fmt;
use std::mem::discriminant;
use std::sync::Arc;

use bevy_ecs::prelude::{Entity, World};
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::gravity::GravityChange;
use crate::contacts::{ContactPhase, FixtureHandle};
use crate::geometry::{Polyline, Rect, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixtureKind {
    Body,
    Feet,
    Head,
    Side,
    Damager,
    Damageable,
    Shield,
    Block,
    Ice,
    Water,
    Ladder,
    Gate,
    Bouncer,
    Force,
    Projectile,
    Consumer,
    Item,
    Player,
    WaterListener,
    UpsideDown,
    Death,
    Laser,
    GravityChange,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 23] = [
        FixtureKind::Body,
        FixtureKind::Feet,
        FixtureKind::Head,
        FixtureKind::Side,
        FixtureKind::Damager,
        FixtureKind::Damageable,
        FixtureKind::Shield,
        FixtureKind::Block,
        FixtureKind::Ice,
        FixtureKind::Water,
        FixtureKind::Ladder,
        FixtureKind::Gate,
        FixtureKind::Bouncer,
        FixtureKind::Force,
        FixtureKind::Projectile,
        FixtureKind::Consumer,
        FixtureKind::Item,
        FixtureKind::Player,
        FixtureKind::WaterListener,
        FixtureKind::UpsideDown,
        FixtureKind::Death,
        FixtureKind::Laser,
        FixtureKind::GravityChange,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Vertical trajectory a shield gives to the projectiles it reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectDirection {
    Up,
    Down,
    #[default]
    Straight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityAction {
    #[default]
    None,
    Set,
    Add,
}

/// Per-axis velocity change applied by bouncers and force fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityAlteration {
    pub force: Vec2,
    pub action_x: VelocityAction,
    pub action_y: VelocityAction,
}

impl VelocityAlteration {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn add(x: f32, y: f32) -> Self {
        Self {
            force: Vec2::new(x, y),
            action_x: VelocityAction::Add,
            action_y: VelocityAction::Add,
        }
    }

    pub fn set(x: f32, y: f32) -> Self {
        Self {
            force: Vec2::new(x, y),
            action_x: VelocityAction::Set,
            action_y: VelocityAction::Set,
        }
    }

    /// Only touch the vertical component.
    pub fn set_y(y: f32) -> Self {
        Self {
            force: Vec2::new(0.0, y),
            action_x: VelocityAction::None,
            action_y: VelocityAction::Set,
        }
    }

    pub fn apply(&self, velocity: &mut Vec2) {
        match self.action_x {
            VelocityAction::None => {}
            VelocityAction::Set => velocity.x = self.force.x,
            VelocityAction::Add => velocity.x += self.force.x,
        }
        match self.action_y {
            VelocityAction::None => {}
            VelocityAction::Set => velocity.y = self.force.y,
            VelocityAction::Add => velocity.y += self.force.y,
        }
    }
}

/// Force field function: `(world, struck entity, delta) -> alteration`.
pub type ForceFn = Arc<dyn Fn(&World, Entity, f32) -> VelocityAlteration + Send + Sync>;

/// Consumer callback: receives the contact phase and the consumed fixture.
pub type ConsumerFn = Arc<dyn Fn(&mut World, ContactPhase, FixtureHandle) + Send + Sync>;

/// One-shot callback receiving the entity that owns the fixture.
pub type FixtureCallback = Arc<dyn Fn(&mut World, Entity) + Send + Sync>;

/// A fixture being touched by another one, as seen by the touched fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBy {
    pub phase: ContactPhase,
    pub receiver: FixtureHandle,
    pub by: FixtureHandle,
    pub by_kind: FixtureKind,
}

/// Receiver notified when the fixture is hit by a block, body, feet, side,
/// shield or laser.
pub type HitByFn = Arc<dyn Fn(&mut World, HitBy) + Send + Sync>;

/// Kind-specific fixture payload. A fixture holds at most one value per variant.
#[derive(Clone)]
pub enum FixtureData {
    Side(Side),
    Reflect(ReflectDirection),
    Force(ForceFn),
    Bounce(VelocityAlteration),
    OnBounce(FixtureCallback),
    Consumer(ConsumerFn),
    LaserHits(Vec<Vec2>),
    /// Death fixture that ignores invincibility.
    Instant,
    /// Whether feet ride the block's per-step movement. Defaults to true.
    StickToBlock(bool),
    HitBy(HitByFn),
    GravityChange(GravityChange),
}

impl fmt::Debug for FixtureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureData::Side(side) => f.debug_tuple("Side").field(side).finish(),
            FixtureData::Reflect(dir) => f.debug_tuple("Reflect").field(dir).finish(),
            FixtureData::Force(_) => f.write_str("Force(..)"),
            FixtureData::Bounce(b) => f.debug_tuple("Bounce").field(b).finish(),
            FixtureData::OnBounce(_) => f.write_str("OnBounce(..)"),
            FixtureData::Consumer(_) => f.write_str("Consumer(..)"),
            FixtureData::LaserHits(hits) => f.debug_tuple("LaserHits").field(hits).finish(),
            FixtureData::Instant => f.write_str("Instant"),
            FixtureData::StickToBlock(stick) => f.debug_tuple("StickToBlock").field(stick).finish(),
            FixtureData::HitBy(_) => f.write_str("HitBy(..)"),
            FixtureData::GravityChange(change) => {
                f.debug_tuple("GravityChange").field(change).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fixture {
    pub kind: FixtureKind,
    /// Shape relative to the body centre, before `offset` is applied.
    pub shape: Shape,
    pub offset: Vec2,
    /// Inactive fixtures are invisible to the contact detector.
    pub active: bool,
    /// Allow contacts with fixtures of the same entity.
    pub self_contact: bool,
    data: SmallVec<[FixtureData; 2]>,
}

impl Fixture {
    pub fn new(kind: FixtureKind, shape: impl Into<Shape>) -> Self {
        Self {
            kind,
            shape: shape.into(),
            offset: Vec2::ZERO,
            active: true,
            self_contact: false,
            data: SmallVec::new(),
        }
    }

    /// Rectangle of the given size centred on the body centre.
    pub fn rect(kind: FixtureKind, width: f32, height: f32) -> Self {
        Self::new(kind, Rect::from_center(Vec2::ZERO, width, height))
    }

    /// Segment from `start` to `end`, both relative to the body centre.
    pub fn line(kind: FixtureKind, start: Vec2, end: Vec2) -> Self {
        Self::new(kind, Polyline::line(start, end))
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_self_contact(mut self) -> Self {
        self.self_contact = true;
        self
    }

    pub fn with(mut self, data: FixtureData) -> Self {
        self.attach(data);
        self
    }

    /// Attach a payload, replacing any existing payload of the same variant.
    pub fn attach(&mut self, data: FixtureData) {
        let slot = discriminant(&data);
        self.data.retain(|d| discriminant(d) != slot);
        self.data.push(data);
    }

    pub fn data(&self) -> &[FixtureData] {
        &self.data
    }

    /// World-space shape for a body whose centre is at `body_center`.
    pub fn world_shape(&self, body_center: Vec2) -> Shape {
        self.shape.translated(body_center + self.offset)
    }

    pub fn side(&self) -> Option<Side> {
        self.data.iter().find_map(|d| match d {
            FixtureData::Side(side) => Some(*side),
            _ => None,
        })
    }

    pub fn reflect(&self) -> Option<ReflectDirection> {
        self.data.iter().find_map(|d| match d {
            FixtureData::Reflect(dir) => Some(*dir),
            _ => None,
        })
    }

    pub fn force(&self) -> Option<&ForceFn> {
        self.data.iter().find_map(|d| match d {
            FixtureData::Force(f) => Some(f),
            _ => None,
        })
    }

    pub fn bounce(&self) -> Option<VelocityAlteration> {
        self.data.iter().find_map(|d| match d {
            FixtureData::Bounce(b) => Some(*b),
            _ => None,
        })
    }

    pub fn on_bounce(&self) -> Option<&FixtureCallback> {
        self.data.iter().find_map(|d| match d {
            FixtureData::OnBounce(cb) => Some(cb),
            _ => None,
        })
    }

    pub fn consumer(&self) -> Option<&ConsumerFn> {
        self.data.iter().find_map(|d| match d {
            FixtureData::Consumer(c) => Some(c),
            _ => None,
        })
    }

    pub fn laser_hits(&self) -> Option<&[Vec2]> {
        self.data.iter().find_map(|d| match d {
            FixtureData::LaserHits(hits) => Some(hits.as_slice()),
            _ => None,
        })
    }

    pub fn laser_hits_mut(&mut self) -> Option<&mut Vec<Vec2>> {
        self.data.iter_mut().find_map(|d| match d {
            FixtureData::LaserHits(hits) => Some(hits),
            _ => None,
        })
    }

    pub fn hit_by(&self) -> Option<&HitByFn> {
        self.data.iter().find_map(|d| match d {
            FixtureData::HitBy(receiver) => Some(receiver),
            _ => None,
        })
    }

    pub fn gravity_change(&self) -> Option<GravityChange> {
        self.data.iter().find_map(|d| match d {
            FixtureData::GravityChange(change) => Some(*change),
            _ => None,
        })
    }

    pub fn is_instant(&self) -> bool {
        self.data.iter().any(|d| matches!(d, FixtureData::Instant))
    }

    pub fn sticks_to_block(&self) -> bool {
        self.data
            .iter()
            .find_map(|d| match d {
                FixtureData::StickToBlock(stick) => Some(*stick),
                _ => None,
            })
            .unwrap_or(true)
    }
}
