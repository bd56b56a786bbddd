//! Discrete per-frame movement integration

use ahash::AHashMap;
use glam::Vec2;

use crate::component_boilerplate;
use crate::core::types::EntityId;
use crate::entity::{Component, ComponentSignal, EntityCore};

/// Timed multiplier on move speed, keyed by whatever applied it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifier {
    pub multiplier: f32,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub struct MovementComponent {
    owner: Option<EntityId>,
    speed: f32,
    direction: Vec2,
    moving: bool,
    modifiers: AHashMap<EntityId, SpeedModifier>,
}

impl MovementComponent {
    pub fn new(speed: f32) -> Self {
        Self {
            owner: None,
            speed,
            direction: Vec2::ZERO,
            moving: false,
            modifiers: AHashMap::new(),
        }
    }

    pub fn base_speed(&self) -> f32 {
        self.speed
    }

    /// Permanently scale the base speed; non-positive factors are ignored
    pub fn scale_base_speed(&mut self, factor: f32) {
        if factor > 0.0 {
            self.speed *= factor;
        }
    }

    /// Base speed scaled by every live modifier
    pub fn effective_speed(&self) -> f32 {
        self.modifiers
            .values()
            .fold(self.speed, |speed, m| speed * m.multiplier)
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Set the heading; non-unit input is normalized, zero stops
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
    }

    pub fn stop(&mut self) {
        self.direction = Vec2::ZERO;
    }

    /// Add a modifier from `source`, or refresh the one it already applied
    pub fn apply_speed_modifier(&mut self, source: EntityId, multiplier: f32, duration: f32) {
        self.modifiers.insert(
            source,
            SpeedModifier {
                multiplier,
                remaining: duration,
            },
        );
    }

    pub fn modifier_from(&self, source: EntityId) -> Option<SpeedModifier> {
        self.modifiers.get(&source).copied()
    }
}

impl Component for MovementComponent {
    component_boilerplate!("movement");

    fn update(&mut self, core: &mut EntityCore, dt: f32) {
        self.modifiers.retain(|_, m| {
            m.remaining -= dt;
            m.remaining > 0.0
        });

        let moving = self.direction != Vec2::ZERO;
        if moving {
            core.world_coord += self.direction * self.effective_speed() * dt;
            if self.direction.x != 0.0 {
                core.face(self.direction.x < 0.0);
            }
        }
        if moving != self.moving {
            self.moving = moving;
            core.signals.push(ComponentSignal::Moving(moving));
        }
    }
}
