//! JSON scene descriptions for the demo runner.
//!
//! A scene lists static geometry (blocks, ice, water, ladders), rectangular
//! force fields and an optional player spawn. [`SceneDescription::spawn`]
//! turns it into bodies with the fixtures the built-in contact rules expect.
//!
//! # Example
//!
//! ```json
//! {
//!   "gravity": [0.0, -30.0],
//!   "player": { "x": 2.0, "y": 4.0 },
//!   "blocks": [{ "x": 0.0, "y": 0.0, "width": 20.0, "height": 1.0 }],
//!   "water": [{ "x": 10.0, "y": 1.0, "width": 4.0, "height": 2.0 }],
//!   "force_fields": [
//!     { "area": { "x": 15.0, "y": 1.0, "width": 2.0, "height": 6.0 }, "force": [0.0, 60.0] }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::{Entity, World};
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::actiontask::ActionTask;
use crate::components::behaviors::{Behaviors, WALL_SLIDING};
use crate::components::body::Body;
use crate::components::fixture::{Fixture, FixtureData, FixtureKind, Side, VelocityAlteration};
use crate::components::health::{Damageable, Health};
use crate::components::item::Player;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::geometry::Rect;

const PLAYER_WIDTH: f32 = 0.8;
const PLAYER_HEIGHT: f32 = 1.6;
const SENSOR: f32 = 0.1;

fn default_gravity() -> Vec2 {
    Vec2::new(0.0, -30.0)
}

fn default_health() -> i32 {
    10
}

fn default_invincibility() -> f32 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerSpawn {
    /// Bottom-left corner of the player's body.
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_health")]
    pub health: i32,
    #[serde(default = "default_invincibility")]
    pub invincibility: f32,
}

/// Area that accelerates bodies inside it by `force` units per second².
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ForceField {
    pub area: Rect,
    pub force: Vec2,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneDescription {
    #[serde(default = "default_gravity")]
    pub gravity: Vec2,
    #[serde(default)]
    pub player: Option<PlayerSpawn>,
    #[serde(default)]
    pub blocks: Vec<Rect>,
    #[serde(default)]
    pub ice: Vec<Rect>,
    #[serde(default)]
    pub water: Vec<Rect>,
    #[serde(default)]
    pub ladders: Vec<Rect>,
    #[serde(default)]
    pub force_fields: Vec<ForceField>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            player: Some(PlayerSpawn {
                x: 2.0,
                y: 3.0,
                health: default_health(),
                invincibility: default_invincibility(),
            }),
            blocks: vec![Rect::new(0.0, 0.0, 20.0, 1.0)],
            ice: vec![Rect::new(20.0, 0.0, 10.0, 1.0)],
            water: vec![Rect::new(30.0, -2.0, 6.0, 3.0)],
            ladders: vec![Rect::new(8.0, 1.0, 1.0, 6.0)],
            force_fields: Vec::new(),
        }
    }
}

/// Entities spawned for a scene.
#[derive(Debug, Clone, Default)]
pub struct SceneHandles {
    pub player: Option<Entity>,
    pub statics: Vec<Entity>,
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::Scene(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Scene(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Spawn every body of the scene and queue them for their systems.
    pub fn spawn(&self, engine: &mut Engine) -> Result<SceneHandles, EngineError> {
        let clamp = Vec2::splat(engine.config().max_velocity);
        let mut handles = SceneHandles::default();

        let surfaces = [
            (FixtureKind::Block, &self.blocks),
            (FixtureKind::Ice, &self.ice),
            (FixtureKind::Water, &self.water),
            (FixtureKind::Ladder, &self.ladders),
        ];
        for (kind, rects) in surfaces {
            for rect in rects {
                let body = static_body(rect, kind)?;
                handles.statics.push(engine.spawn(body));
            }
        }

        for field in &self.force_fields {
            let acceleration = field.force;
            let fixture = Fixture::rect(FixtureKind::Force, field.area.width, field.area.height)
                .with(FixtureData::Force(Arc::new(move |_: &World, _: Entity, delta: f32| {
                    VelocityAlteration::add(acceleration.x * delta, acceleration.y * delta)
                })));
            let mut body = static_body(&field.area, FixtureKind::Force)?;
            body.fixtures = vec![fixture];
            handles.statics.push(engine.spawn(body));
        }

        if let Some(spawn) = &self.player {
            let mut body = player_body(spawn, self.gravity)?;
            body.velocity_clamp = clamp;
            let player = engine.spawn((
                body,
                Player,
                ActionTask::default(),
                Health::new(spawn.health),
                Damageable::new(spawn.invincibility),
                Behaviors::new().with(WALL_SLIDING),
            ));
            handles.player = Some(player);
        }

        info!(
            "Scene spawned: {} static bodies, player: {}",
            handles.statics.len(),
            handles.player.is_some()
        );
        Ok(handles)
    }
}

fn static_body(rect: &Rect, kind: FixtureKind) -> Result<Body, EngineError> {
    let mut body = Body::new(rect.x, rect.y, rect.width, rect.height)?
        .with_fixture(Fixture::rect(kind, rect.width, rect.height));
    body.gravity_on = false;
    Ok(body)
}

/// Player body with the standard sensor layout around a `PLAYER_WIDTH` x
/// `PLAYER_HEIGHT` box.
pub fn player_body(spawn: &PlayerSpawn, gravity: Vec2) -> Result<Body, EngineError> {
    let half_w = PLAYER_WIDTH / 2.0;
    let half_h = PLAYER_HEIGHT / 2.0;
    let body = Body::new(spawn.x, spawn.y, PLAYER_WIDTH, PLAYER_HEIGHT)?
        .with_gravity(gravity)
        .with_fixture(Fixture::rect(FixtureKind::Body, PLAYER_WIDTH, PLAYER_HEIGHT))
        .with_fixture(Fixture::rect(FixtureKind::Player, PLAYER_WIDTH, PLAYER_HEIGHT))
        .with_fixture(Fixture::rect(FixtureKind::Damageable, PLAYER_WIDTH, PLAYER_HEIGHT))
        .with_fixture(
            Fixture::rect(FixtureKind::WaterListener, PLAYER_WIDTH, PLAYER_HEIGHT / 2.0)
                .with_offset(Vec2::new(0.0, -half_h / 2.0)),
        )
        .with_fixture(
            Fixture::rect(FixtureKind::Feet, PLAYER_WIDTH - SENSOR, SENSOR)
                .with_offset(Vec2::new(0.0, -half_h)),
        )
        .with_fixture(
            Fixture::rect(FixtureKind::Head, PLAYER_WIDTH - SENSOR, SENSOR)
                .with_offset(Vec2::new(0.0, half_h)),
        )
        .with_fixture(
            Fixture::rect(FixtureKind::Side, SENSOR, PLAYER_HEIGHT - 2.0 * SENSOR)
                .with_offset(Vec2::new(-half_w, 0.0))
                .with(FixtureData::Side(Side::Left)),
        )
        .with_fixture(
            Fixture::rect(FixtureKind::Side, SENSOR, PLAYER_HEIGHT - 2.0 * SENSOR)
                .with_offset(Vec2::new(half_w, 0.0))
                .with(FixtureData::Side(Side::Right)),
        );
    Ok(body)
}
