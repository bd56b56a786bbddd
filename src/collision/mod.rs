//! Layered collision and trigger engine

pub mod component;
pub mod manager;
pub mod trigger;

use glam::Vec2;
use serde::Serialize;

use crate::core::types::{CharacterType, EntityId};

pub use component::{ColliderShape, CollisionComponent};
pub use manager::CollisionManager;
pub use trigger::TriggerStrategy;

/// Damage an attacker delivers on contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    /// Side the damage comes from; a body never takes damage from its own side
    pub origin: CharacterType,
    pub damage: i32,
    pub critical: bool,
    pub direction: Vec2,
    pub can_reflect: bool,
    pub can_block: bool,
}

/// What one side of a colliding pair learns about the other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub other: EntityId,
    /// Unit vector pointing from the receiver towards `other`
    pub normal: Vec2,
    pub other_layer: u32,
    pub incoming: Option<HitPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TriggerPhase {
    Enter,
    Stay,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
    pub normal: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerEvent {
    pub zone: EntityId,
    pub other: EntityId,
    pub phase: TriggerPhase,
}

/// Everything the collision pass did in one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollisionReport {
    pub pairs_tested: usize,
    pub collisions: Vec<CollisionEvent>,
    pub triggers: Vec<TriggerEvent>,
}

impl CollisionReport {
    pub fn trigger_count(&self, phase: TriggerPhase) -> usize {
        self.triggers.iter().filter(|t| t.phase == phase).count()
    }

    pub fn collided(&self, a: EntityId, b: EntityId) -> bool {
        self.collisions
            .iter()
            .any(|c| (c.a == a && c.b == b) || (c.a == b && c.b == a))
    }
}
