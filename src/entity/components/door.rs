use crate::component_boilerplate;
use crate::core::types::EntityId;
use crate::entity::{Component, ComponentSignal, Entity, EntityCore};

/// A door is passable while open; closing it turns its collider on
///
/// Attach it after the collision component so the initial open state
/// reaches the collider.
#[derive(Debug, Clone, Default)]
pub struct DoorComponent {
    owner: Option<EntityId>,
    open: bool,
}

impl DoorComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Component for DoorComponent {
    component_boilerplate!("door");

    fn init(&mut self, core: &mut EntityCore) {
        self.open = true;
        core.signals.push(ComponentSignal::ColliderActive(false));
    }
}

fn set_door(entity: &mut Entity, open: bool) -> bool {
    let Some(door) = entity.component_mut::<DoorComponent>() else {
        return false;
    };
    door.open = open;
    if let Some(collider) = entity.collision_mut() {
        collider.set_active(!open);
    }
    true
}

/// Returns false when `entity` is not a door
pub fn open_door(entity: &mut Entity) -> bool {
    set_door(entity, true)
}

pub fn close_door(entity: &mut Entity) -> bool {
    set_door(entity, false)
}
