use bevy_ecs::prelude::Component;

/// What the jump button does next. Contact rules keep it in sync with the
/// ground, water and air state of the body.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionTask {
    #[default]
    Jump,
    Swim,
    AirDash,
}
