//! Physics as a processing system.
//!
//! [`WorldSystem`] is registered with a `Body` mask. Its three hooks are the
//! physics phase of a step:
//!
//! - `pre_process`: clear every member's sense flags and laser hit lists,
//!   settle position deltas (asleep bodies stay at zero), then run each
//!   body's `pre_process` hook (fixture toggling);
//! - `process_entity`: take gravity from the entity's `GravityControl` if it
//!   has one, then integrate the body (drag, gravity, clamp, translate);
//! - `post_process`: detect contacts among members and resolve them, then
//!   publish the resolved contacts in the [`ContactLog`] resource. Only
//!   resolved contacts are committed to the detector, so after a failed pass
//!   the unresolved ones are classified the same way again next step.
//!
//! Systems registered before the world system see last step's contact
//! results; systems registered after it see this step's.

use bevy_ecs::prelude::Entity;

use crate::components::body::Body;
use crate::components::gravity::GravityControl;
use crate::contacts::{ContactDetector, ContactResolver, ContactRule};
use crate::error::EngineError;
use crate::resources::contactlog::ContactLog;
use crate::scheduler::{EntityProcessor, SystemContext};

#[derive(Debug, Default)]
pub struct WorldSystem {
    detector: ContactDetector,
    resolver: ContactResolver,
}

impl WorldSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// World system resolving with a custom rule priority list.
    pub fn with_rules(rules: Vec<ContactRule>) -> Self {
        Self {
            detector: ContactDetector::new(),
            resolver: ContactResolver::new(rules),
        }
    }
}

impl EntityProcessor for WorldSystem {
    fn pre_process(
        &mut self,
        ctx: &mut SystemContext<'_>,
        members: &[Entity],
    ) -> Result<(), EngineError> {
        for &entity in members {
            if let Some(mut body) = ctx.world.get_mut::<Body>(entity) {
                body.senses.clear();
                body.settle();
                for fixture in &mut body.fixtures {
                    if let Some(hits) = fixture.laser_hits_mut() {
                        hits.clear();
                    }
                }
            }
        }
        for &entity in members {
            let hook = ctx.world.get::<Body>(entity).and_then(|body| body.pre_process);
            if let Some(hook) = hook {
                hook(ctx.world, entity)?;
            }
        }
        Ok(())
    }

    fn process_entity(
        &mut self,
        ctx: &mut SystemContext<'_>,
        entity: Entity,
    ) -> Result<(), EngineError> {
        let control = ctx.world.get::<GravityControl>(entity).copied();
        if let Some(mut body) = ctx.world.get_mut::<Body>(entity) {
            if let Some(control) = control {
                body.gravity = control.gravity();
            }
            body.integrate(ctx.delta);
        }
        Ok(())
    }

    fn post_process(
        &mut self,
        ctx: &mut SystemContext<'_>,
        members: &[Entity],
    ) -> Result<(), EngineError> {
        let contacts = self.detector.detect_among(ctx.world, members);
        if let Err(failure) = self.resolver.resolve(ctx.world, &contacts, ctx.delta) {
            self.detector.commit(&contacts[..failure.resolved]);
            return Err(failure.into());
        }
        self.detector.commit(&contacts);
        ctx.world.insert_resource(ContactLog { contacts });
        Ok(())
    }
}
