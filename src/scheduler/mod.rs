//! Component-masked entity scheduler.
//!
//! A processing system is an [`EntityProcessor`] plus a [`ComponentMask`],
//! an ordered membership list and a pending-add queue. Systems run in
//! registration order. For every system, every step:
//!
//! 1. pending adds are flushed into membership (append order is iteration
//!    order; entities that are dead or do not match the mask are dropped);
//! 2. `pre_process` runs if the system is enabled;
//! 3. the membership list is walked once and compacted in place: dead or
//!    no-longer-qualifying entities are removed, disabled systems and asleep
//!    entities are skipped, everyone else gets `process_entity`;
//! 4. `post_process` runs if the system is enabled;
//! 5. commands deferred through the [`SystemContext`] are applied.
//!
//! Membership is never mutated while `process_entity` runs. Processors that
//! need to add entities or clear another system go through their context,
//! and clearing the system currently updating is an error.
//!
//! Submodules:
//! - [`mask`] – the required-component set and its qualification test

pub mod mask;

use bevy_ecs::prelude::{Entity, World};
use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::components::lifecycle::{is_alive, is_asleep};
use crate::error::EngineError;

pub use mask::ComponentMask;

/// Handle to a registered system. Keys are dense registration indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemKey(usize);

impl SystemKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-system logic run by the [`Scheduler`].
pub trait EntityProcessor {
    fn pre_process(
        &mut self,
        ctx: &mut SystemContext<'_>,
        members: &[Entity],
    ) -> Result<(), EngineError> {
        let _ = (ctx, members);
        Ok(())
    }

    fn process_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EngineError>;

    fn post_process(
        &mut self,
        ctx: &mut SystemContext<'_>,
        members: &[Entity],
    ) -> Result<(), EngineError> {
        let _ = (ctx, members);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    QueueAdd(SystemKey, Entity),
    Clear(SystemKey),
    SetEnabled(SystemKey, bool),
}

/// What a processor sees while its system updates.
pub struct SystemContext<'a> {
    pub world: &'a mut World,
    pub delta: f32,
    system: SystemKey,
    system_name: &'a str,
    system_count: usize,
    commands: &'a mut Vec<Command>,
}

impl SystemContext<'_> {
    pub fn system(&self) -> SystemKey {
        self.system
    }

    fn check(&self, key: SystemKey) -> Result<(), EngineError> {
        if key.0 >= self.system_count {
            return Err(EngineError::UnknownSystem(key.0));
        }
        Ok(())
    }

    /// Queue `entity` for `key`; it joins at the start of that system's next update.
    pub fn queue_add(&mut self, key: SystemKey, entity: Entity) -> Result<(), EngineError> {
        self.check(key)?;
        self.commands.push(Command::QueueAdd(key, entity));
        Ok(())
    }

    /// Clear another system's membership once this system finishes updating.
    pub fn clear_system(&mut self, key: SystemKey) -> Result<(), EngineError> {
        self.check(key)?;
        if key == self.system {
            return Err(EngineError::ClearWhileUpdating {
                system: self.system_name.to_string(),
            });
        }
        self.commands.push(Command::Clear(key));
        Ok(())
    }

    pub fn set_enabled(&mut self, key: SystemKey, enabled: bool) -> Result<(), EngineError> {
        self.check(key)?;
        self.commands.push(Command::SetEnabled(key, enabled));
        Ok(())
    }
}

struct ProcessingSystem {
    name: String,
    mask: ComponentMask,
    processor: Box<dyn EntityProcessor>,
    members: Vec<Entity>,
    index: FxHashSet<Entity>,
    pending: Vec<Entity>,
    enabled: bool,
}

impl ProcessingSystem {
    fn flush_pending(&mut self, world: &World) {
        for entity in std::mem::take(&mut self.pending) {
            if self.index.contains(&entity) {
                continue;
            }
            if !is_alive(world, entity) || !self.mask.qualifies(world, entity) {
                debug!("{}: dropped pending {:?}, not qualifying", self.name, entity);
                continue;
            }
            debug!("{}: added {:?}", self.name, entity);
            self.index.insert(entity);
            self.members.push(entity);
        }
    }

    fn keeps(&self, world: &World, entity: Entity) -> bool {
        is_alive(world, entity) && self.mask.qualifies(world, entity)
    }

    fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
        self.pending.clear();
    }
}

#[derive(Default)]
pub struct Scheduler {
    systems: Vec<ProcessingSystem>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system. It runs after every system registered before it.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        mask: ComponentMask,
        processor: impl EntityProcessor + 'static,
    ) -> SystemKey {
        let key = SystemKey(self.systems.len());
        let name = name.into();
        info!("Registered system '{}' as #{}", name, key.0);
        self.systems.push(ProcessingSystem {
            name,
            mask,
            processor: Box::new(processor),
            members: Vec::new(),
            index: FxHashSet::default(),
            pending: Vec::new(),
            enabled: true,
        });
        key
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn system_key(&self, name: &str) -> Option<SystemKey> {
        self.systems
            .iter()
            .position(|s| s.name == name)
            .map(SystemKey)
    }

    pub fn name(&self, key: SystemKey) -> Option<&str> {
        self.systems.get(key.0).map(|s| s.name.as_str())
    }

    fn system_mut(&mut self, key: SystemKey) -> Result<&mut ProcessingSystem, EngineError> {
        self.systems
            .get_mut(key.0)
            .ok_or(EngineError::UnknownSystem(key.0))
    }

    /// Queue `entity` for `key`. Duplicates of members or pending entries are ignored.
    pub fn queue_add(&mut self, key: SystemKey, entity: Entity) -> Result<(), EngineError> {
        let system = self.system_mut(key)?;
        if !system.index.contains(&entity) && !system.pending.contains(&entity) {
            system.pending.push(entity);
        }
        Ok(())
    }

    /// Queue `entity` for every system whose mask it matches right now.
    pub fn queue_add_matching(&mut self, world: &World, entity: Entity) {
        for system in &mut self.systems {
            if system.mask.qualifies(world, entity)
                && !system.index.contains(&entity)
                && !system.pending.contains(&entity)
            {
                system.pending.push(entity);
            }
        }
    }

    pub fn set_enabled(&mut self, key: SystemKey, enabled: bool) -> Result<(), EngineError> {
        self.system_mut(key)?.enabled = enabled;
        Ok(())
    }

    pub fn is_enabled(&self, key: SystemKey) -> Option<bool> {
        self.systems.get(key.0).map(|s| s.enabled)
    }

    /// Current membership in iteration order.
    pub fn members(&self, key: SystemKey) -> Option<&[Entity]> {
        self.systems.get(key.0).map(|s| s.members.as_slice())
    }

    pub fn pending(&self, key: SystemKey) -> Option<&[Entity]> {
        self.systems.get(key.0).map(|s| s.pending.as_slice())
    }

    /// Drop every member and pending add of a system.
    pub fn clear(&mut self, key: SystemKey) -> Result<(), EngineError> {
        let system = self.system_mut(key)?;
        debug!("{}: cleared {} members", system.name, system.members.len());
        system.clear();
        Ok(())
    }

    /// Run every system once, in registration order. The first error stops
    /// the pass; deferred commands of the failing system are discarded.
    pub fn update(&mut self, world: &mut World, delta: f32) -> Result<(), EngineError> {
        let mut commands = Vec::new();
        for index in 0..self.systems.len() {
            self.update_system(world, SystemKey(index), delta, &mut commands)?;
            self.apply(&mut commands);
        }
        Ok(())
    }

    fn update_system(
        &mut self,
        world: &mut World,
        key: SystemKey,
        delta: f32,
        commands: &mut Vec<Command>,
    ) -> Result<(), EngineError> {
        let system_count = self.systems.len();
        let system = &mut self.systems[key.0];
        system.flush_pending(world);

        let mut ctx = SystemContext {
            world,
            delta,
            system: key,
            system_name: &system.name,
            system_count,
            commands,
        };

        if system.enabled {
            system.processor.pre_process(&mut ctx, &system.members)?;
        }

        let mut failure = None;
        let mut kept = 0;
        for i in 0..system.members.len() {
            let entity = system.members[i];
            if !system.keeps(ctx.world, entity) {
                debug!("{}: removed {:?}", system.name, entity);
                system.index.remove(&entity);
                continue;
            }
            system.members[kept] = entity;
            kept += 1;
            if failure.is_some() || !system.enabled || is_asleep(ctx.world, entity) {
                continue;
            }
            if let Err(err) = system.processor.process_entity(&mut ctx, entity) {
                failure = Some(err);
            }
        }
        system.members.truncate(kept);
        if let Some(err) = failure {
            return Err(err);
        }

        if system.enabled {
            system.processor.post_process(&mut ctx, &system.members)?;
        }
        Ok(())
    }

    fn apply(&mut self, commands: &mut Vec<Command>) {
        for command in commands.drain(..) {
            match command {
                Command::QueueAdd(key, entity) => {
                    let _ = self.queue_add(key, entity);
                }
                Command::Clear(key) => {
                    let _ = self.clear(key);
                }
                Command::SetEnabled(key, enabled) => {
                    let _ = self.set_enabled(key, enabled);
                }
            }
        }
    }

    /// Remove dead or no-longer-qualifying entities from every system.
    pub fn prune(&mut self, world: &World) {
        for system in &mut self.systems {
            let before = system.members.len();
            let mask = &system.mask;
            let index = &mut system.index;
            system.members.retain(|entity| {
                let keep = is_alive(world, *entity) && mask.qualifies(world, *entity);
                if !keep {
                    index.remove(entity);
                }
                keep
            });
            let removed = before - system.members.len();
            if removed > 0 {
                debug!("{}: pruned {} members", system.name, removed);
            }
        }
    }
}
