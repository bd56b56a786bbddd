use crate::component_boilerplate;
use crate::core::types::{EntityId, State};
use crate::entity::Component;

/// Character state machine
///
/// `Dead` is terminal: once entered, further transitions are ignored.
#[derive(Debug, Clone)]
pub struct StateComponent {
    owner: Option<EntityId>,
    state: State,
    previous: State,
}

impl StateComponent {
    pub fn new() -> Self {
        Self {
            owner: None,
            state: State::Standing,
            previous: State::Standing,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn previous(&self) -> State {
        self.previous
    }

    /// Transition to `next`; returns whether the state changed
    pub fn set_state(&mut self, next: State) -> bool {
        if self.state == State::Dead || self.state == next {
            return false;
        }
        self.previous = self.state;
        self.state = next;
        true
    }
}

impl Default for StateComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StateComponent {
    component_boilerplate!("state");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_track_previous() {
        let mut s = StateComponent::new();
        assert!(s.set_state(State::Moving));
        assert_eq!(s.previous(), State::Standing);
        assert!(!s.set_state(State::Moving));
    }

    #[test]
    fn test_dead_is_terminal() {
        let mut s = StateComponent::new();
        assert!(s.set_state(State::Dead));
        assert!(!s.set_state(State::Standing));
        assert_eq!(s.state(), State::Dead);
    }
}
