use ahash::AHashMap;

use crate::component_boilerplate;
use crate::core::types::{EntityId, State};
use crate::entity::Component;

/// State-to-frames table; tells the render collaborator which frames to show
#[derive(Debug, Clone, Default)]
pub struct AnimationComponent {
    owner: Option<EntityId>,
    animations: AHashMap<State, Vec<String>>,
    current: Option<State>,
}

impl AnimationComponent {
    pub fn new(animations: AHashMap<State, Vec<String>>) -> Self {
        Self {
            owner: None,
            animations,
            current: None,
        }
    }

    pub fn play(&mut self, state: State) {
        if !self.animations.contains_key(&state) {
            tracing::warn!("no animation registered for {:?}", state);
            return;
        }
        self.current = Some(state);
    }

    pub fn current(&self) -> Option<State> {
        self.current
    }

    pub fn active_frames(&self) -> &[String] {
        self.current
            .and_then(|s| self.animations.get(&s))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Component for AnimationComponent {
    component_boilerplate!("animation");

    fn init(&mut self, _core: &mut crate::entity::EntityCore) {
        if self.animations.contains_key(&State::Standing) {
            self.current = Some(State::Standing);
        }
    }
}
