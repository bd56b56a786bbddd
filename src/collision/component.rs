//! Per-entity collider: shape, layer/mask filtering and trigger bookkeeping

use ahash::AHashSet;
use glam::Vec2;
use serde_json::Value;

use crate::collision::{TriggerPhase, TriggerStrategy};
use crate::component_boilerplate;
use crate::core::geometry::{Circle, Rect, Shape};
use crate::core::types::{layers, EntityId};
use crate::entity::{Component, Entity, EntityCore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Width and height of a box centred on the owner (plus offset)
    Box(Vec2),
    Circle(f32),
}

#[derive(Debug, Clone)]
pub struct CollisionComponent {
    owner: Option<EntityId>,
    offset: Vec2,
    shape: ColliderShape,
    layer: u32,
    mask: u32,
    is_trigger: bool,
    active: bool,
    strategy_type: Option<String>,
    strategy_config: Value,
    strategies: Vec<TriggerStrategy>,
    previous_targets: AHashSet<EntityId>,
    current_targets: AHashSet<EntityId>,
}

impl CollisionComponent {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            owner: None,
            offset: Vec2::ZERO,
            shape,
            layer: layers::NONE,
            mask: layers::NONE,
            is_trigger: false,
            active: true,
            strategy_type: None,
            strategy_config: Value::Null,
            strategies: Vec::new(),
            previous_targets: AHashSet::new(),
            current_targets: AHashSet::new(),
        }
    }

    pub fn boxed(size: Vec2) -> Self {
        Self::new(ColliderShape::Box(size))
    }

    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::Circle(radius))
    }

    pub fn with_layers(mut self, layer: u32, mask: u32) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Make this a trigger; the strategy is built when the component is attached
    pub fn as_trigger(mut self, strategy_type: &str, config: Value) -> Self {
        self.is_trigger = true;
        self.strategy_type = Some(strategy_type.to_string());
        self.strategy_config = config;
        self
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    pub fn set_mask(&mut self, mask: u32) {
        self.mask = mask;
    }

    pub fn add_mask(&mut self, bits: u32) {
        self.mask |= bits;
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn shape(&self) -> ColliderShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    pub fn strategies(&self) -> &[TriggerStrategy] {
        &self.strategies
    }

    pub fn add_strategy(&mut self, strategy: TriggerStrategy) {
        self.strategies.push(strategy);
    }

    /// Either side's mask accepting the other's layer is enough
    pub fn can_collide_with(&self, other: &CollisionComponent) -> bool {
        (self.mask & other.layer) != 0 || (self.layer & other.mask) != 0
    }

    /// World-space shape for the current owner position
    ///
    /// The horizontal offset is mirrored while the owner faces left.
    pub fn area_shape(&self, core: &EntityCore) -> Shape {
        let mut offset = self.offset;
        if core.transform.scale.x < 0.0 {
            offset.x = -offset.x;
        }
        let center = core.world_coord + offset;
        match self.shape {
            ColliderShape::Box(size) => Shape::Rect(Rect::from_center(center, size)),
            ColliderShape::Circle(radius) => Shape::Circle(Circle::new(center, radius)),
        }
    }

    pub fn bounds(&self, core: &EntityCore) -> Rect {
        self.area_shape(core).bounding_rect()
    }

    /// Record `other` as inside this trigger and run Enter or Stay
    ///
    /// Repeat calls for the same visitor within one frame do nothing.
    pub fn try_trigger(&mut self, zone: &EntityCore, other: &mut Entity) -> Option<TriggerPhase> {
        if !self.is_trigger || self.strategies.is_empty() {
            return None;
        }
        if !self.current_targets.insert(other.id()) {
            return None;
        }
        let phase = if self.previous_targets.contains(&other.id()) {
            TriggerPhase::Stay
        } else {
            TriggerPhase::Enter
        };
        for strategy in &self.strategies {
            match phase {
                TriggerPhase::Enter => strategy.on_enter(zone.id, other),
                _ => strategy.on_stay(zone.id, other),
            }
        }
        Some(phase)
    }

    /// Fire Exit for visitors that left, then roll this frame into the last
    ///
    /// Call once per frame, after every pair has been tested.
    pub fn finish_trigger_frame(&mut self, zone: &EntityCore) -> Vec<EntityId> {
        let mut exited: Vec<EntityId> = self
            .previous_targets
            .difference(&self.current_targets)
            .copied()
            .collect();
        exited.sort_unstable();
        for &id in &exited {
            for strategy in &self.strategies {
                strategy.on_exit(zone.id, id);
            }
        }
        std::mem::swap(&mut self.previous_targets, &mut self.current_targets);
        self.current_targets.clear();
        exited
    }

    pub fn clear_trigger_targets(&mut self) {
        self.previous_targets.clear();
        self.current_targets.clear();
    }
}

impl Component for CollisionComponent {
    component_boilerplate!("collision");

    fn init(&mut self, core: &mut EntityCore) {
        if !self.is_trigger {
            return;
        }
        let Some(kind) = self.strategy_type.as_deref() else {
            return;
        };
        match TriggerStrategy::from_config(kind, &self.strategy_config) {
            Ok(strategy) => self.strategies.push(strategy),
            Err(e) => tracing::error!("{}: {}", core.name, e),
        }
    }
}
