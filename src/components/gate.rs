use bevy_ecs::prelude::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Door that a player opens by walking into its GATE fixture.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Gate {
    pub state: GateState,
}

impl Gate {
    /// Start opening a closed gate. Returns false if the gate was not closed.
    pub fn trigger(&mut self) -> bool {
        if self.state != GateState::Closed {
            return false;
        }
        self.state = GateState::Opening;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_closed_gates_trigger() {
        let mut gate = Gate::default();
        assert!(gate.trigger());
        assert_eq!(gate.state, GateState::Opening);
        assert!(!gate.trigger());
    }
}
