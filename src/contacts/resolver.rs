//! Dispatches phase-tagged contacts to their owning rule.

use bevy_ecs::prelude::World;
use log::debug;

use super::rules::{ContactRule, RuleHandler, RuleTable};
use super::{Contact, ContactPhase, FixtureHandle, RuleContext};
use crate::components::lifecycle::is_alive;
use crate::error::EngineError;
use crate::resources::physicsconfig::PhysicsConfig;

#[derive(Debug, Clone, Default)]
pub struct ContactResolver {
    table: RuleTable,
}

/// A resolution pass that stopped early. `contacts[..resolved]` took effect;
/// the rest did not.
#[derive(Debug)]
pub struct ResolveFailure {
    pub resolved: usize,
    pub error: EngineError,
}

impl From<ResolveFailure> for EngineError {
    fn from(failure: ResolveFailure) -> Self {
        failure.error
    }
}

/// A contact matched to its owning rule, in the rule's declared order.
struct Dispatch<'r> {
    rule: &'r ContactRule,
    handler: RuleHandler,
    first: FixtureHandle,
    second: FixtureHandle,
}

impl ContactResolver {
    pub fn new(rules: Vec<ContactRule>) -> Self {
        Self {
            table: RuleTable::compile(rules),
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Resolve `contacts` in order.
    ///
    /// Every rule's capability check runs before any handler, so a missing
    /// component fails the pass with nothing applied. A handler error stops
    /// the pass at that contact.
    pub fn resolve(
        &self,
        world: &mut World,
        contacts: &[Contact],
        delta: f32,
    ) -> Result<(), ResolveFailure> {
        let config = world
            .get_resource::<PhysicsConfig>()
            .cloned()
            .unwrap_or_default();

        for contact in contacts {
            if let Some(dispatch) = self.dispatch(world, contact) {
                if let Some(check) = dispatch.rule.check {
                    check(world, dispatch.first, dispatch.second)
                        .map_err(|error| ResolveFailure { resolved: 0, error })?;
                }
            }
        }

        for (index, contact) in contacts.iter().enumerate() {
            // Liveness is re-read per contact; an earlier handler may kill.
            let Some(dispatch) = self.dispatch(world, contact) else {
                continue;
            };
            if config.log_contacts {
                debug!(
                    "{:?} {} {:?}#{} <-> {:?}#{}",
                    contact.phase,
                    dispatch.rule.name,
                    dispatch.first.entity,
                    dispatch.first.index,
                    dispatch.second.entity,
                    dispatch.second.index
                );
            }
            let mut ctx = RuleContext {
                world: &mut *world,
                phase: contact.phase,
                first: dispatch.first,
                second: dispatch.second,
                delta,
                config: &config,
            };
            (dispatch.handler)(&mut ctx).map_err(|error| ResolveFailure {
                resolved: index,
                error,
            })?;
        }
        Ok(())
    }

    fn dispatch(&self, world: &World, contact: &Contact) -> Option<Dispatch<'_>> {
        let (rule, swap) = self.table.lookup(contact.first_kind, contact.second_kind)?;
        let handler = rule.handler(contact.phase)?;

        // Ends still run while one side survives so edge bookkeeping on the
        // other side stays balanced.
        let first_alive = is_alive(world, contact.first.entity);
        let second_alive = is_alive(world, contact.second.entity);
        let skip = match contact.phase {
            ContactPhase::End => !first_alive && !second_alive,
            _ => !first_alive || !second_alive,
        };
        if skip {
            return None;
        }

        let (first, second) = if swap {
            (contact.second, contact.first)
        } else {
            (contact.first, contact.second)
        };
        Some(Dispatch {
            rule,
            handler,
            first,
            second,
        })
    }
}
