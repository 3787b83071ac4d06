use bevy_ecs::prelude::Resource;

use crate::contacts::Contact;

/// Contacts resolved during the most recent step, in resolution order.
/// Replaced wholesale every step.
#[derive(Resource, Debug, Clone, Default)]
pub struct ContactLog {
    pub contacts: Vec<Contact>,
}
