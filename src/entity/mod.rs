//! Entities and the component model
//!
//! An [`Entity`] owns its components; each component keeps only a
//! non-owning [`EntityId`] back to its owner. Component hooks receive the
//! owner's [`EntityCore`] (transform, flags) as a separate borrow, so a
//! component never needs a strong reference to the entity that holds it.
//! Effects that cross components (a death reaching the state machine, a
//! door toggling its collider) are queued as [`ComponentSignal`]s on the core
//! and applied by the entity once the component pass is over.

pub mod components;

use glam::Vec2;
use std::any::Any;

use crate::collision::component::CollisionComponent;
use crate::collision::{CollisionInfo, HitPayload};
use crate::core::error::{Result, SimError};
use crate::core::types::{layers, CharacterType, EntityId, State, Transform};
use crate::entity::components::animation::AnimationComponent;
use crate::entity::components::movement::MovementComponent;
use crate::entity::components::state::StateComponent;

/// Cross-component effect queued during a component hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentSignal {
    /// Hit points reached zero for the first time
    Died,
    /// Movement started (`true`) or stopped (`false`)
    Moving(bool),
    /// A reflected attack now belongs to another side
    SwitchSides(CharacterType),
    /// Enable or disable the owner's collider
    ColliderActive(bool),
}

/// Identity, flags and transforms of an entity, without its components
#[derive(Debug, Clone)]
pub struct EntityCore {
    pub id: EntityId,
    pub name: String,
    pub active: bool,
    pub visible: bool,
    /// Render-space transform, rewritten by the camera each frame
    pub transform: Transform,
    pub world_coord: Vec2,
    /// Rotation/scale anchor as a fraction of the image size
    pub pivot: Vec2,
    pub image_size: Vec2,
    pub z_index: f32,
    /// Scale magnitude recorded when the entity joined a camera's pivot set
    pub initial_scale: Option<Vec2>,
    pub character_type: Option<CharacterType>,
    pub signals: Vec<ComponentSignal>,
}

impl EntityCore {
    pub fn new(name: &str) -> Self {
        let id = EntityId::new();
        let name = if name.is_empty() {
            format!("GameObject_{}", id.0)
        } else {
            name.to_string()
        };
        Self {
            id,
            name,
            active: true,
            visible: true,
            transform: Transform::default(),
            world_coord: Vec2::ZERO,
            pivot: Vec2::ZERO,
            image_size: Vec2::ZERO,
            z_index: 0.0,
            initial_scale: None,
            character_type: None,
            signals: Vec::new(),
        }
    }

    pub fn is_facing_left(&self) -> bool {
        self.transform.is_facing_left()
    }

    /// Point the entity left or right, keeping the scale magnitude
    pub fn face(&mut self, left: bool) {
        let magnitude = self.transform.scale.x.abs();
        self.transform.scale.x = if left { -magnitude } else { magnitude };
    }
}

/// Behaviour unit attached to exactly one entity
///
/// Every hook gets the owner's core. Implementations use
/// [`component_boilerplate!`](crate::component_boilerplate) for the owner
/// handle and downcasting.
pub trait Component: Any + Send + Sync {
    fn kind(&self) -> &'static str;

    /// Back-handle to the owning entity, `None` until attached
    fn owner(&self) -> Option<EntityId>;

    fn set_owner(&mut self, owner: EntityId);

    fn init(&mut self, _core: &mut EntityCore) {}

    fn update(&mut self, _core: &mut EntityCore, _dt: f32) {}

    fn handle_collision(&mut self, _core: &mut EntityCore, _info: &CollisionInfo) {}

    /// Damage this component deals to `target` on contact, if any
    fn hit_payload(&self, _core: &EntityCore, _target: EntityId) -> Option<HitPayload> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Implements the owner handle and `Any` accessors for a component with an
/// `owner: Option<EntityId>` field
#[macro_export]
macro_rules! component_boilerplate {
    ($kind:literal) => {
        fn kind(&self) -> &'static str {
            $kind
        }

        fn owner(&self) -> Option<$crate::core::types::EntityId> {
            self.owner
        }

        fn set_owner(&mut self, owner: $crate::core::types::EntityId) {
            self.owner = Some(owner);
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

/// A game object: core state plus an ordered list of owned components
pub struct Entity {
    pub core: EntityCore,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    pub fn new(name: &str) -> Self {
        Self {
            core: EntityCore::new(name),
            components: Vec::new(),
        }
    }

    pub fn at(name: &str, world_coord: Vec2) -> Self {
        let mut entity = Self::new(name);
        entity.core.world_coord = world_coord;
        entity
    }

    pub fn id(&self) -> EntityId {
        self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn is_active(&self) -> bool {
        self.core.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.core.active = active;
    }

    pub fn world_coord(&self) -> Vec2 {
        self.core.world_coord
    }

    /// Attach a component and run its `init` hook
    ///
    /// A component can be attached once; re-attaching one that already has
    /// an owner is rejected.
    pub fn add_component<C: Component>(&mut self, component: C) -> Result<()> {
        self.attach(Box::new(component))
    }

    pub fn attach(&mut self, mut component: Box<dyn Component>) -> Result<()> {
        if let Some(existing) = component.owner() {
            return Err(SimError::ComponentAlreadyAttached(existing));
        }
        component.set_owner(self.core.id);
        component.init(&mut self.core);
        self.components.push(component);
        self.apply_signals();
        Ok(())
    }

    /// Detach and return the first component of type `C`
    pub fn remove_component<C: Component>(&mut self) -> Option<Box<dyn Component>> {
        let index = self
            .components
            .iter()
            .position(|c| c.as_any().is::<C>())?;
        Some(self.components.remove(index))
    }

    pub fn component<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<C>())
    }

    pub fn component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<C>())
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.component::<C>().is_some()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn collision(&self) -> Option<&CollisionComponent> {
        self.component::<CollisionComponent>()
    }

    pub fn collision_mut(&mut self) -> Option<&mut CollisionComponent> {
        self.component_mut::<CollisionComponent>()
    }

    /// Current state, if the entity has a state machine
    pub fn state(&self) -> Option<State> {
        self.component::<StateComponent>().map(|s| s.state())
    }

    pub fn is_dead(&self) -> bool {
        self.state() == Some(State::Dead)
    }

    /// Per-frame update; inactive entities are skipped
    pub fn update(&mut self, dt: f32) {
        if !self.core.active {
            return;
        }
        for component in &mut self.components {
            component.update(&mut self.core, dt);
        }
        self.apply_signals();
    }

    /// Forward a collision to every component
    pub fn on_collision(&mut self, info: &CollisionInfo) {
        if !self.core.active {
            return;
        }
        for component in &mut self.components {
            component.handle_collision(&mut self.core, info);
        }
        self.apply_signals();
    }

    /// What this entity deals to `target` on contact this frame
    pub fn hit_payload_for(&self, target: EntityId) -> Option<HitPayload> {
        self.components
            .iter()
            .find_map(|c| c.hit_payload(&self.core, target))
    }

    /// Feed `other` into this entity's trigger, if it has one
    pub fn try_trigger(
        &mut self,
        other: &mut Entity,
    ) -> Option<crate::collision::TriggerPhase> {
        let core = &self.core;
        let collider = self
            .components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<CollisionComponent>())?;
        collider.try_trigger(core, other)
    }

    /// Close this entity's trigger frame; returns the entities that left
    pub fn finish_trigger_frame(&mut self) -> Vec<EntityId> {
        let core = &self.core;
        match self
            .components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<CollisionComponent>())
        {
            Some(collider) => collider.finish_trigger_frame(core),
            None => Vec::new(),
        }
    }

    fn apply_signals(&mut self) {
        if self.core.signals.is_empty() {
            return;
        }
        let signals = std::mem::take(&mut self.core.signals);
        for signal in signals {
            match signal {
                ComponentSignal::Died => {
                    tracing::debug!("{} died", self.core.name);
                    if let Some(state) = self.component_mut::<StateComponent>() {
                        state.set_state(State::Dead);
                    }
                    if let Some(movement) = self.component_mut::<MovementComponent>() {
                        movement.stop();
                    }
                    if let Some(animation) = self.component_mut::<AnimationComponent>() {
                        animation.play(State::Dead);
                    }
                    // Corpses stop colliding at once, even later in this pass
                    if let Some(collider) = self.collision_mut() {
                        collider.set_active(false);
                    }
                }
                ComponentSignal::Moving(moving) => {
                    let next = if moving { State::Moving } else { State::Standing };
                    let changed = match self.component_mut::<StateComponent>() {
                        Some(state) => state.set_state(next),
                        None => false,
                    };
                    if changed {
                        if let Some(animation) = self.component_mut::<AnimationComponent>() {
                            animation.play(next);
                        }
                    }
                }
                ComponentSignal::SwitchSides(side) => {
                    self.core.character_type = Some(side);
                    if let Some(collider) = self.collision_mut() {
                        collider.set_layer(layers::bullet_layer_for(side));
                        collider.set_mask(layers::bullet_mask_for(side));
                    }
                }
                ComponentSignal::ColliderActive(active) => {
                    if let Some(collider) = self.collision_mut() {
                        collider.set_active(active);
                    }
                }
            }
        }
    }

    /// Apply damage through the health component
    ///
    /// Returns `true` when this hit killed the entity.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        use crate::entity::components::health::HealthComponent;
        let died = match self.component_mut::<HealthComponent>() {
            Some(health) => health.take_damage(amount).died,
            None => return false,
        };
        if died {
            self.core.signals.push(ComponentSignal::Died);
            self.apply_signals();
        }
        died
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.components.iter().map(|c| c.kind()).collect();
        f.debug_struct("Entity")
            .field("core", &self.core)
            .field("components", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::health::HealthComponent;
    use crate::entity::components::state::StateComponent;

    #[test]
    fn test_ids_are_unique() {
        let a = Entity::new("a");
        let b = Entity::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_unnamed_entity_gets_generated_name() {
        let e = Entity::new("");
        assert!(e.name().starts_with("GameObject_"));
    }

    #[test]
    fn test_component_owner_is_set_on_attach() {
        let mut e = Entity::new("hero");
        e.add_component(HealthComponent::new(10, 0, 0)).unwrap();
        let health = e.component::<HealthComponent>().unwrap();
        assert_eq!(health.owner(), Some(e.id()));
    }

    #[test]
    fn test_component_cannot_be_attached_twice() {
        let mut first = Entity::new("first");
        first.add_component(StateComponent::new()).unwrap();
        let component = first.remove_component::<StateComponent>().unwrap();

        let mut second = Entity::new("second");
        let err = second.attach(component).unwrap_err();
        assert!(matches!(err, SimError::ComponentAlreadyAttached(id) if id == first.id()));
    }

    #[test]
    fn test_death_reaches_state_component() {
        let mut e = Entity::new("victim");
        e.add_component(StateComponent::new()).unwrap();
        e.add_component(HealthComponent::new(5, 0, 0)).unwrap();
        assert!(e.take_damage(5));
        assert!(e.is_dead());
        assert!(!e.take_damage(5));
    }

    #[test]
    fn test_inactive_entity_skips_update() {
        let mut e = Entity::new("idle");
        e.add_component(HealthComponent::new(5, 3, 0)).unwrap();
        e.take_damage(2);
        e.set_active(false);
        e.update(10.0);
        assert_eq!(e.component::<HealthComponent>().unwrap().current_armor(), 1);
    }
}
