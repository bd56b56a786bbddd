//! Held-weapon pose that follows the wielder's hand and aim

use glam::Vec2;

use crate::combat::weapon::normalize_angle;
use crate::component_boilerplate;
use crate::core::types::{EntityId, Transform};
use crate::entity::{Component, EntityCore};

/// How long a swing animates after an attack starts
pub const ATTACK_ACTION_SECONDS: f32 = 0.4;

/// Swords and hammers are held raised by this much above the aim line
pub const OFFSET_WEAPON_PREP_DEGREES: f32 = 35.0;

/// Pose of the weapon a character holds
///
/// The weapon rests at the aim angle raised by the prep angle and sweeps
/// down through the aim while an attack action runs. Rotation limits are
/// measured as if the wielder faced right, so they mirror with facing.
#[derive(Debug, Clone)]
pub struct FollowerComponent {
    owner: Option<EntityId>,
    hand_offset: Vec2,
    holding_offset: Vec2,
    z_offset: f32,
    prep: f32,
    limits: Option<(f32, f32)>,
    aim: f32,
    facing_left: bool,
    action_left: f32,
    pose: Transform,
    z_index: f32,
}

impl FollowerComponent {
    pub fn new(hand_offset: Vec2, holding_offset: Vec2) -> Self {
        Self {
            owner: None,
            hand_offset,
            holding_offset,
            z_offset: 0.0,
            prep: 0.0,
            limits: None,
            aim: 0.0,
            facing_left: false,
            action_left: 0.0,
            pose: Transform::default(),
            z_index: 0.0,
        }
    }

    pub fn with_z_offset(mut self, z_offset: f32) -> Self {
        self.z_offset = z_offset;
        self
    }

    pub fn with_prep_degrees(mut self, degrees: f32) -> Self {
        self.prep = degrees.to_radians();
        self
    }

    /// Limit the aim to `[min, max]` radians; an inverted range is swapped
    pub fn with_rotation_limits(mut self, min: f32, max: f32) -> Self {
        self.limits = Some((min.min(max), min.max(max)));
        self
    }

    /// Point the weapon at `aim`; a zero vector keeps the last aim
    pub fn track(&mut self, aim: Vec2, facing_left: bool) {
        self.facing_left = facing_left;
        if aim.length_squared() == 0.0 {
            return;
        }
        let angle = aim.y.atan2(aim.x);
        let Some((min, max)) = self.limits else {
            self.aim = angle;
            return;
        };
        let relative = if facing_left {
            normalize_angle(std::f32::consts::PI - angle)
        } else {
            angle
        };
        let clamped = relative.clamp(min, max);
        self.aim = if facing_left {
            normalize_angle(std::f32::consts::PI - clamped)
        } else {
            clamped
        };
    }

    /// Direction an attack started now should travel, in radians
    pub fn swing_center(&self) -> f32 {
        self.aim
    }

    fn raise(&self) -> f32 {
        if self.facing_left {
            -self.prep
        } else {
            self.prep
        }
    }

    /// Weapon rotation while idle
    pub fn rest_rotation(&self) -> f32 {
        normalize_angle(self.aim + self.raise())
    }

    pub fn start_attack_action(&mut self) {
        self.action_left = ATTACK_ACTION_SECONDS;
    }

    pub fn is_attacking(&self) -> bool {
        self.action_left > 0.0
    }

    /// Current weapon rotation, mid-swing included
    pub fn rotation(&self) -> f32 {
        if !self.is_attacking() {
            return self.rest_rotation();
        }
        let progress = 1.0 - self.action_left / ATTACK_ACTION_SECONDS;
        normalize_angle(self.aim + self.raise() * (1.0 - 2.0 * progress))
    }

    /// World-space transform of the weapon after the last update
    pub fn pose(&self) -> Transform {
        self.pose
    }

    pub fn z_index(&self) -> f32 {
        self.z_index
    }
}

impl Component for FollowerComponent {
    component_boilerplate!("follower");

    fn update(&mut self, core: &mut EntityCore, dt: f32) {
        self.action_left = (self.action_left - dt).max(0.0);
        self.facing_left = core.is_facing_left();
        let side = if self.facing_left { -1.0 } else { 1.0 };
        let hand = Vec2::new(self.hand_offset.x * side, self.hand_offset.y);
        let rotation = self.rotation();
        let held = Vec2::from_angle(rotation).rotate(self.holding_offset);
        self.pose = Transform {
            translation: core.world_coord + hand + held,
            rotation,
            scale: Vec2::new(1.0, side),
        };
        self.z_index = core.z_index + self.z_offset;
    }
}
