//! Overlap detection and phase classification.
//!
//! The broad phase sorts every active fixture by the left edge of its world
//! bounds and sweeps along x, so only fixtures whose x-ranges intersect are
//! handed to the narrow phase. The narrow phase runs the exact shape test.
//!
//! Output order is deterministic: every `End` first (sorted by key), then
//! every `Begin`/`Continue` (sorted by key).

use bevy_ecs::prelude::{Entity, World};
use log::debug;
use rustc_hash::FxHashMap;

use super::{Contact, ContactKey, ContactPhase, FixtureHandle};
use crate::components::body::Body;
use crate::components::fixture::FixtureKind;
use crate::components::lifecycle::is_alive;
use crate::geometry::{Rect, Shape};

struct Candidate {
    handle: FixtureHandle,
    kind: FixtureKind,
    self_contact: bool,
    shape: Shape,
    aabb: Rect,
}

/// Remembers the overlapping pairs whose last contact was resolved.
#[derive(Debug, Default)]
pub struct ContactDetector {
    previous: FxHashMap<ContactKey, (FixtureKind, FixtureKind)>,
}

impl ContactDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute overlaps among `bodies` and classify them against the
    /// committed set. Nothing is remembered until [`ContactDetector::commit`].
    pub fn detect_among(&self, world: &World, bodies: &[Entity]) -> Vec<Contact> {
        let candidates = collect_candidates(world, bodies);
        let current = overlapping_pairs(&candidates);

        let mut ended: Vec<Contact> = self
            .previous
            .iter()
            .filter(|(key, _)| !current.contains_key(key))
            .map(|(key, kinds)| contact(ContactPhase::End, *key, *kinds))
            .collect();
        ended.sort_by_key(Contact::key);

        let mut live: Vec<Contact> = current
            .iter()
            .map(|(key, kinds)| {
                let phase = if self.previous.contains_key(key) {
                    ContactPhase::Continue
                } else {
                    ContactPhase::Begin
                };
                contact(phase, *key, *kinds)
            })
            .collect();
        live.sort_by_key(Contact::key);

        debug!(
            "contacts: {} fixtures, {} overlapping, {} ended",
            candidates.len(),
            live.len(),
            ended.len()
        );

        ended.extend(live);
        ended
    }

    /// Record `resolved` contacts as seen. Contacts left out keep their
    /// previous state, so an unresolved begin is reported as a begin again.
    pub fn commit(&mut self, resolved: &[Contact]) {
        for contact in resolved {
            match contact.phase {
                ContactPhase::End => {
                    self.previous.remove(&contact.key());
                }
                ContactPhase::Begin | ContactPhase::Continue => {
                    self.previous
                        .insert(contact.key(), (contact.first_kind, contact.second_kind));
                }
            }
        }
    }
}

fn contact(phase: ContactPhase, key: ContactKey, kinds: (FixtureKind, FixtureKind)) -> Contact {
    Contact {
        phase,
        first: key.first(),
        second: key.second(),
        first_kind: kinds.0,
        second_kind: kinds.1,
    }
}

fn collect_candidates(world: &World, bodies: &[Entity]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for &entity in bodies {
        if !is_alive(world, entity) {
            continue;
        }
        let Some(body) = world.get::<Body>(entity) else {
            continue;
        };
        let center = body.center();
        for (index, fixture) in body.fixtures.iter().enumerate() {
            if !fixture.active {
                continue;
            }
            let Ok(index) = u16::try_from(index) else {
                break;
            };
            let shape = fixture.world_shape(center);
            candidates.push(Candidate {
                handle: FixtureHandle::new(entity, index),
                kind: fixture.kind,
                self_contact: fixture.self_contact,
                aabb: shape.aabb(),
                shape,
            });
        }
    }
    candidates.sort_by(|a, b| {
        a.aabb
            .x
            .total_cmp(&b.aabb.x)
            .then(a.handle.cmp(&b.handle))
    });
    candidates
}

fn overlapping_pairs(candidates: &[Candidate]) -> FxHashMap<ContactKey, (FixtureKind, FixtureKind)> {
    let mut pairs = FxHashMap::default();
    for (i, a) in candidates.iter().enumerate() {
        let a_max = a.aabb.max();
        for b in &candidates[i + 1..] {
            if b.aabb.x > a_max.x {
                break;
            }
            if a.handle.entity == b.handle.entity && !(a.self_contact || b.self_contact) {
                continue;
            }
            let b_max = b.aabb.max();
            if b.aabb.y > a_max.y || a.aabb.y > b_max.y {
                continue;
            }
            if !a.shape.overlaps(&b.shape) {
                continue;
            }
            let key = ContactKey::new(a.handle, b.handle);
            let kinds = if key.first() == a.handle {
                (a.kind, b.kind)
            } else {
                (b.kind, a.kind)
            };
            pairs.insert(key, kinds);
        }
    }
    pairs
}
