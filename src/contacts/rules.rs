//! Contact rules and the compiled kind-pair table.
//!
//! A [`ContactRule`] declares two kind filters (`first`, `second`) and up to
//! three phase handlers. Rules live in an explicit priority list;
//! [`RuleTable::compile`] walks every ordered kind pair once and assigns it to
//! the earliest rule that matches it in either orientation. That owning rule
//! is the only one consulted for the pair, so a rule listed later can never
//! shadow an earlier one, and a phase the owner leaves unhandled is a no-op.
//!
//! Built-in priority list (first wins):
//!
//! | #  | first            | second                          | phases    |
//! |----|------------------|---------------------------------|-----------|
//! | 1  | CONSUMER         | any                             | b / c / e |
//! | 2  | DAMAGER          | DAMAGEABLE                      | b / c     |
//! | 3  | DEATH            | FEET, SIDE, HEAD, BODY          | b         |
//! | 4  | BLOCK            | BODY                            | b / c / e |
//! | 5  | BODY             | BODY                            | b         |
//! | 6  | BODY             | FEET                            | b / c / e |
//! | 7  | BODY             | SIDE                            | b / c / e |
//! | 8  | SIDE             | SIDE                            | b / c / e |
//! | 9  | SHIELD           | SIDE                            | b         |
//! | 10 | BLOCK            | SIDE                            | b / c     |
//! | 11 | SIDE             | ICE                             | b / c     |
//! | 12 | SIDE, FEET, HEAD | GATE                            | b         |
//! | 13 | FEET             | BLOCK                           | b / c / e |
//! | 14 | FEET             | ICE                             | b / c     |
//! | 15 | BOUNCER          | FEET, HEAD, SIDE                | b         |
//! | 16 | HEAD             | BLOCK                           | b / c     |
//! | 17 | HEAD             | FEET                            | b / c / e |
//! | 18 | WATER_LISTENER   | WATER                           | b / c / e |
//! | 19 | HEAD             | LADDER                          | b / c / e |
//! | 20 | FEET             | LADDER                          | b / c / e |
//! | 21 | BODY             | FORCE                           | b / c     |
//! | 22 | BODY             | GRAVITY_CHANGE                  | b / c     |
//! | 23 | BODY             | UPSIDE_DOWN                     | b / e     |
//! | 24 | PROJECTILE       | BLOCK, BODY, SHIELD, WATER      | b         |
//! | 25 | PLAYER           | ITEM                            | b         |
//! | 26 | LASER            | BLOCK                           | c         |
//! | 27 | LASER            | BODY                            | b / c     |
//! | 28 | LASER            | SHIELD                          | b / c     |

use bevy_ecs::prelude::World;
use rustc_hash::FxHashMap;

use super::{ContactPhase, FixtureHandle, RuleContext};
use super::handlers::{combat, interactions, receivers, surfaces};
use crate::components::fixture::FixtureKind;
use crate::error::EngineError;

pub type RuleHandler = fn(&mut RuleContext<'_>) -> Result<(), EngineError>;

/// Capability check run against every dispatched contact before any handler
/// of the pass. Receives the fixtures in the rule's declared order.
pub type RuleCheck = fn(&World, FixtureHandle, FixtureHandle) -> Result<(), EngineError>;

/// Which fixture kinds one side of a rule accepts.
#[derive(Debug, Clone, Copy)]
pub enum KindFilter {
    Any,
    Only(&'static [FixtureKind]),
}

impl KindFilter {
    pub fn accepts(&self, kind: FixtureKind) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Only(kinds) => kinds.contains(&kind),
        }
    }
}

#[derive(Clone)]
pub struct ContactRule {
    pub name: &'static str,
    pub first: KindFilter,
    pub second: KindFilter,
    pub on_begin: Option<RuleHandler>,
    pub on_continue: Option<RuleHandler>,
    pub on_end: Option<RuleHandler>,
    pub check: Option<RuleCheck>,
}

impl std::fmt::Debug for ContactRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactRule")
            .field("name", &self.name)
            .field("first", &self.first)
            .field("second", &self.second)
            .finish_non_exhaustive()
    }
}

impl ContactRule {
    pub fn new(name: &'static str, first: KindFilter, second: KindFilter) -> Self {
        Self {
            name,
            first,
            second,
            on_begin: None,
            on_continue: None,
            on_end: None,
            check: None,
        }
    }

    pub fn on_begin(mut self, handler: RuleHandler) -> Self {
        self.on_begin = Some(handler);
        self
    }

    pub fn on_continue(mut self, handler: RuleHandler) -> Self {
        self.on_continue = Some(handler);
        self
    }

    pub fn on_end(mut self, handler: RuleHandler) -> Self {
        self.on_end = Some(handler);
        self
    }

    pub fn requires(mut self, check: RuleCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Same handler for begin and continue.
    pub fn while_touching(self, handler: RuleHandler) -> Self {
        self.on_begin(handler).on_continue(handler)
    }

    pub fn handler(&self, phase: ContactPhase) -> Option<RuleHandler> {
        match phase {
            ContactPhase::Begin => self.on_begin,
            ContactPhase::Continue => self.on_continue,
            ContactPhase::End => self.on_end,
        }
    }
}

/// Rules compiled into a lookup keyed by ordered kind pair.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<ContactRule>,
    /// `(kind a, kind b) -> (rule index, swap)`; `swap` means `a` plays the
    /// rule's `second` role.
    slots: FxHashMap<(FixtureKind, FixtureKind), (usize, bool)>,
}

impl RuleTable {
    pub fn compile(rules: Vec<ContactRule>) -> Self {
        let mut slots = FxHashMap::default();
        for a in FixtureKind::ALL {
            for b in FixtureKind::ALL {
                let owner = rules.iter().enumerate().find_map(|(index, rule)| {
                    if rule.first.accepts(a) && rule.second.accepts(b) {
                        Some((index, false))
                    } else if rule.first.accepts(b) && rule.second.accepts(a) {
                        Some((index, true))
                    } else {
                        None
                    }
                });
                if let Some(slot) = owner {
                    slots.insert((a, b), slot);
                }
            }
        }
        Self { rules, slots }
    }

    /// Owning rule for the pair and whether the pair must be swapped to
    /// match the rule's declared order.
    pub fn lookup(&self, a: FixtureKind, b: FixtureKind) -> Option<(&ContactRule, bool)> {
        let (index, swap) = *self.slots.get(&(a, b))?;
        self.rules.get(index).map(|rule| (rule, swap))
    }

    pub fn rules(&self) -> &[ContactRule] {
        &self.rules
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::compile(default_rules())
    }
}

use FixtureKind as K;

/// The built-in rules in priority order.
pub fn default_rules() -> Vec<ContactRule> {
    vec![
        ContactRule::new("consumer", KindFilter::Only(&[K::Consumer]), KindFilter::Any)
            .while_touching(interactions::consume)
            .on_end(interactions::consume),
        ContactRule::new(
            "damager-damageable",
            KindFilter::Only(&[K::Damager]),
            KindFilter::Only(&[K::Damageable]),
        )
        .requires(combat::damage_capabilities)
        .while_touching(combat::negotiate_damage),
        ContactRule::new(
            "death",
            KindFilter::Only(&[K::Death]),
            KindFilter::Only(&[K::Feet, K::Side, K::Head, K::Body]),
        )
        .on_begin(combat::death),
        ContactRule::new(
            "block-body",
            KindFilter::Only(&[K::Block]),
            KindFilter::Only(&[K::Body]),
        )
        .while_touching(receivers::body_touching_block)
        .on_end(receivers::body_touching_block),
        ContactRule::new(
            "body-body",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::Body]),
        )
        .on_begin(receivers::mutual),
        ContactRule::new(
            "body-feet",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::Feet]),
        )
        .while_touching(receivers::body_hit_by_feet)
        .on_end(receivers::body_hit_by_feet),
        ContactRule::new(
            "body-side",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::Side]),
        )
        .while_touching(receivers::side_hit_by_body)
        .on_end(receivers::side_hit_by_body),
        ContactRule::new(
            "side-side",
            KindFilter::Only(&[K::Side]),
            KindFilter::Only(&[K::Side]),
        )
        .while_touching(receivers::mutual)
        .on_end(receivers::mutual),
        ContactRule::new(
            "shield-side",
            KindFilter::Only(&[K::Shield]),
            KindFilter::Only(&[K::Side]),
        )
        .on_begin(receivers::side_hit_by_shield),
        ContactRule::new(
            "block-side",
            KindFilter::Only(&[K::Block]),
            KindFilter::Only(&[K::Side]),
        )
        .while_touching(surfaces::side_touching_block),
        ContactRule::new(
            "side-ice",
            KindFilter::Only(&[K::Side]),
            KindFilter::Only(&[K::Ice]),
        )
        .while_touching(surfaces::side_touching_ice),
        ContactRule::new(
            "gate",
            KindFilter::Only(&[K::Side, K::Feet, K::Head]),
            KindFilter::Only(&[K::Gate]),
        )
        .requires(interactions::gate_capabilities)
        .on_begin(interactions::trigger_gate),
        ContactRule::new(
            "feet-block",
            KindFilter::Only(&[K::Feet]),
            KindFilter::Only(&[K::Block]),
        )
        .while_touching(surfaces::feet_on_block)
        .on_end(surfaces::feet_leave_block),
        ContactRule::new(
            "feet-ice",
            KindFilter::Only(&[K::Feet]),
            KindFilter::Only(&[K::Ice]),
        )
        .while_touching(surfaces::feet_on_ice),
        ContactRule::new(
            "bouncer",
            KindFilter::Only(&[K::Bouncer]),
            KindFilter::Only(&[K::Feet, K::Head, K::Side]),
        )
        .on_begin(surfaces::bounce),
        ContactRule::new(
            "head-block",
            KindFilter::Only(&[K::Head]),
            KindFilter::Only(&[K::Block]),
        )
        .on_begin(surfaces::head_hits_block)
        .on_continue(surfaces::head_under_block),
        ContactRule::new(
            "head-feet",
            KindFilter::Only(&[K::Head]),
            KindFilter::Only(&[K::Feet]),
        )
        .while_touching(receivers::head_hit_by_feet)
        .on_end(receivers::head_hit_by_feet),
        ContactRule::new(
            "water",
            KindFilter::Only(&[K::WaterListener]),
            KindFilter::Only(&[K::Water]),
        )
        .on_begin(surfaces::enter_water)
        .on_continue(surfaces::stay_in_water)
        .on_end(surfaces::leave_water),
        ContactRule::new(
            "head-ladder",
            KindFilter::Only(&[K::Head]),
            KindFilter::Only(&[K::Ladder]),
        )
        .on_begin(surfaces::grab_ladder)
        .on_continue(surfaces::hold_ladder)
        .on_end(surfaces::release_ladder),
        ContactRule::new(
            "feet-ladder",
            KindFilter::Only(&[K::Feet]),
            KindFilter::Only(&[K::Ladder]),
        )
        .on_begin(surfaces::grab_ladder)
        .on_continue(surfaces::hold_ladder)
        .on_end(surfaces::release_ladder),
        ContactRule::new(
            "force",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::Force]),
        )
        .while_touching(surfaces::apply_force),
        ContactRule::new(
            "gravity-change",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::GravityChange]),
        )
        .while_touching(surfaces::change_gravity),
        ContactRule::new(
            "upside-down",
            KindFilter::Only(&[K::Body]),
            KindFilter::Only(&[K::UpsideDown]),
        )
        .on_begin(surfaces::flip_upside_down)
        .on_end(surfaces::flip_upright),
        ContactRule::new(
            "projectile",
            KindFilter::Only(&[K::Projectile]),
            KindFilter::Only(&[K::Block, K::Body, K::Shield, K::Water]),
        )
        .requires(combat::projectile_capabilities)
        .on_begin(combat::projectile_hit),
        ContactRule::new(
            "item",
            KindFilter::Only(&[K::Player]),
            KindFilter::Only(&[K::Item]),
        )
        .requires(interactions::item_capabilities)
        .on_begin(interactions::collect_item),
        ContactRule::new(
            "laser-block",
            KindFilter::Only(&[K::Laser]),
            KindFilter::Only(&[K::Block]),
        )
        .on_continue(combat::laser_hits_block),
        ContactRule::new(
            "laser-body",
            KindFilter::Only(&[K::Laser]),
            KindFilter::Only(&[K::Body]),
        )
        .while_touching(receivers::laser_hits_body),
        ContactRule::new(
            "laser-shield",
            KindFilter::Only(&[K::Laser]),
            KindFilter::Only(&[K::Shield]),
        )
        .while_touching(combat::laser_hits_shield),
    ]
}
