//! Engine: world, scheduler and the fixed step that drives them.
//!
//! [`Engine::new`] registers the built-in systems in this order:
//!
//! 1. `damageable` – [`DamageableSystem`] (pre-physics)
//! 2. `world` – [`WorldSystem`] (physics: senses, integration, contacts)
//! 3. `health` – [`HealthSystem`] (post-physics)
//! 4. `ttl` – [`TtlSystem`] (post-physics)
//!
//! Systems added with [`Engine::register_system`] run after these. Use
//! [`Engine::empty`] and [`Engine::register_physics`] to control where the
//! physics phase sits relative to custom systems.
//!
//! # Step
//!
//! [`Engine::step`] advances [`WorldTime`], updates every system, prunes
//! memberships, despawns dead entities and advances the
//! [`ContactEffect`] mailbox. An error from any system stops the step and is
//! returned unchanged.

use bevy_ecs::message::{MessageCursor, Messages};
use bevy_ecs::prelude::{Bundle, Entity, World};
use log::{debug, info};

use crate::components::body::Body;
use crate::components::health::{Damageable, Health};
use crate::components::lifecycle::Lifecycle;
use crate::components::ttl::Ttl;
use crate::contacts::ContactRule;
use crate::error::EngineError;
use crate::events::contact::ContactEffect;
use crate::resources::contactlog::ContactLog;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::resources::worldtime::WorldTime;
use crate::scheduler::{ComponentMask, EntityProcessor, Scheduler, SystemKey};
use crate::systems::damage::{DamageableSystem, HealthSystem};
use crate::systems::time::update_world_time;
use crate::systems::ttl::TtlSystem;
use crate::systems::world::WorldSystem;

pub struct Engine {
    world: World,
    scheduler: Scheduler,
    physics: Option<SystemKey>,
    effects: MessageCursor<ContactEffect>,
}

impl Engine {
    /// Engine with the built-in systems registered.
    pub fn new(config: PhysicsConfig) -> Self {
        let mut engine = Self::empty(config);
        let mask = ComponentMask::new().with::<Damageable>(&mut engine.world);
        engine.register_system("damageable", mask, DamageableSystem);
        engine.register_physics();
        let mask = ComponentMask::new().with::<Health>(&mut engine.world);
        engine.register_system("health", mask, HealthSystem);
        let mask = ComponentMask::new().with::<Ttl>(&mut engine.world);
        engine.register_system("ttl", mask, TtlSystem);
        engine
    }

    /// Engine with resources in place and no systems registered.
    pub fn empty(config: PhysicsConfig) -> Self {
        let mut world = World::new();
        info!("Engine starting, fixed step {}s", config.fixed_step);
        world.insert_resource(config);
        world.insert_resource(WorldTime::default());
        world.insert_resource(ContactLog::default());
        world.insert_resource(Messages::<ContactEffect>::default());
        Self {
            world,
            scheduler: Scheduler::new(),
            physics: None,
            effects: MessageCursor::default(),
        }
    }

    /// Register the world system with the built-in rules at this position.
    pub fn register_physics(&mut self) -> SystemKey {
        self.register_physics_with(WorldSystem::new())
    }

    /// Register the world system with a custom rule priority list.
    pub fn register_physics_with_rules(&mut self, rules: Vec<ContactRule>) -> SystemKey {
        self.register_physics_with(WorldSystem::with_rules(rules))
    }

    fn register_physics_with(&mut self, system: WorldSystem) -> SystemKey {
        let mask = ComponentMask::new().with::<Body>(&mut self.world);
        let key = self.scheduler.register("world", mask, system);
        self.physics = Some(key);
        key
    }

    pub fn register_system(
        &mut self,
        name: impl Into<String>,
        mask: ComponentMask,
        processor: impl EntityProcessor + 'static,
    ) -> SystemKey {
        self.scheduler.register(name, mask, processor)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn physics_key(&self) -> Option<SystemKey> {
        self.physics
    }

    pub fn config(&self) -> &PhysicsConfig {
        self.world.resource::<PhysicsConfig>()
    }

    /// Spawn an entity and queue it for every system its components match.
    pub fn spawn(&mut self, bundle: impl Bundle) -> Entity {
        let entity = self.world.spawn(bundle).id();
        self.scheduler.queue_add_matching(&self.world, entity);
        entity
    }

    pub fn queue_add(&mut self, key: SystemKey, entity: Entity) -> Result<(), EngineError> {
        self.scheduler.queue_add(key, entity)
    }

    /// Run one simulation step of `delta` unscaled seconds.
    pub fn step(&mut self, delta: f32) -> Result<(), EngineError> {
        let delta = update_world_time(&mut self.world, delta);
        self.scheduler.update(&mut self.world, delta)?;
        self.scheduler.prune(&self.world);
        self.despawn_dead();
        self.world.resource_mut::<Messages<ContactEffect>>().update();
        Ok(())
    }

    fn despawn_dead(&mut self) {
        let dead: Vec<Entity> = self
            .world
            .query::<(Entity, &Lifecycle)>()
            .iter(&self.world)
            .filter(|(_, lifecycle)| !lifecycle.alive)
            .map(|(entity, _)| entity)
            .collect();
        for entity in dead {
            debug!("Despawning dead {:?}", entity);
            self.world.despawn(entity);
        }
    }

    /// Effects written since the last call.
    pub fn read_effects(&mut self) -> Vec<ContactEffect> {
        let messages = self.world.resource::<Messages<ContactEffect>>();
        self.effects.read(messages).cloned().collect()
    }

    /// Contacts resolved during the last step.
    pub fn last_contacts(&self) -> &ContactLog {
        self.world.resource::<ContactLog>()
    }
}
