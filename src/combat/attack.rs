//! Attack entities: melee effects and projectiles

use ahash::AHashSet;
use glam::Vec2;
use std::str::FromStr;

use crate::collision::{CollisionComponent, CollisionInfo, HitPayload};
use crate::component_boilerplate;
use crate::core::error::{Result, SimError};
use crate::core::types::{layers, CharacterType, EntityId, Transform};
use crate::entity::{Component, ComponentSignal, Entity, EntityCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Slash,
    /// Area effect; never rotated with the aim
    Shockwave,
}

impl FromStr for EffectKind {
    type Err = SimError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Slash" => Ok(Self::Slash),
            "Shockwave" => Ok(Self::Shockwave),
            other => Err(SimError::unknown_enum("effect type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackKind {
    Effect { effect: EffectKind, lifetime: f32 },
    Projectile { speed: f32 },
}

/// Everything needed to spawn (or respawn) an attack entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackInfo {
    pub origin: CharacterType,
    /// World-space spawn transform
    pub transform: Transform,
    pub direction: Vec2,
    /// Collider radius
    pub size: f32,
    pub damage: i32,
    pub critical: bool,
    pub can_reflect_bullet: bool,
    pub can_block_bullet: bool,
    pub disappear_on_hit: bool,
    pub kind: AttackKind,
}

impl AttackInfo {
    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, AttackKind::Projectile { .. })
    }
}

const BULLET_LAYERS: u32 = layers::PLAYER_BULLET | layers::ENEMY_BULLET;

fn rival_bullet_layer(origin: CharacterType) -> u32 {
    match origin {
        CharacterType::Player => layers::ENEMY_BULLET,
        CharacterType::Enemy | CharacterType::Npc => layers::PLAYER_BULLET,
    }
}

fn attack_mask(info: &AttackInfo) -> u32 {
    let mut mask = layers::bullet_mask_for(info.origin);
    if info.can_block_bullet || info.can_reflect_bullet {
        mask |= rival_bullet_layer(info.origin);
    }
    mask
}

/// Behaviour of a live attack
#[derive(Debug, Clone)]
pub struct AttackBody {
    owner: Option<EntityId>,
    info: AttackInfo,
    elapsed: f32,
    marked: bool,
    hit_targets: AHashSet<EntityId>,
}

impl AttackBody {
    pub fn new(info: AttackInfo) -> Self {
        Self {
            owner: None,
            info,
            elapsed: 0.0,
            marked: false,
            hit_targets: AHashSet::new(),
        }
    }

    pub fn info(&self) -> &AttackInfo {
        &self.info
    }

    /// Marked attacks are removed by the next sweep
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn mark(&mut self) {
        self.marked = true;
    }

    pub fn has_hit(&self, target: EntityId) -> bool {
        self.hit_targets.contains(&target)
    }

    fn reset(&mut self, info: AttackInfo) {
        self.info = info;
        self.elapsed = 0.0;
        self.marked = false;
        self.hit_targets.clear();
    }

    fn react_to_attack(&mut self, core: &mut EntityCore, hit: &HitPayload) {
        if !self.info.is_projectile() || hit.origin == self.info.origin {
            return;
        }
        if hit.can_reflect {
            self.info.direction = -self.info.direction;
            self.info.origin = hit.origin;
            self.hit_targets.clear();
            core.transform.rotation += std::f32::consts::PI;
            core.signals.push(ComponentSignal::SwitchSides(hit.origin));
        } else if hit.can_block {
            self.marked = true;
        }
    }
}

impl Component for AttackBody {
    component_boilerplate!("attack");

    fn update(&mut self, core: &mut EntityCore, dt: f32) {
        match self.info.kind {
            AttackKind::Projectile { speed } => {
                core.world_coord += self.info.direction * speed * dt;
            }
            AttackKind::Effect { lifetime, .. } => {
                self.elapsed += dt;
                if self.elapsed >= lifetime {
                    self.marked = true;
                }
            }
        }
    }

    fn handle_collision(&mut self, core: &mut EntityCore, info: &CollisionInfo) {
        if self.marked {
            return;
        }
        if info.other_layer & BULLET_LAYERS != 0 {
            if let Some(hit) = &info.incoming {
                self.react_to_attack(core, hit);
            }
            return;
        }
        self.hit_targets.insert(info.other);
        if self.info.disappear_on_hit {
            self.marked = true;
        }
    }

    fn hit_payload(&self, _core: &EntityCore, target: EntityId) -> Option<HitPayload> {
        if self.marked || self.hit_targets.contains(&target) {
            return None;
        }
        Some(HitPayload {
            origin: self.info.origin,
            damage: self.info.damage,
            critical: self.info.critical,
            direction: self.info.direction,
            can_reflect: self.info.can_reflect_bullet,
            can_block: self.info.can_block_bullet,
        })
    }
}

/// Assemble a fresh attack entity
pub fn build_attack_entity(info: &AttackInfo) -> Result<Entity> {
    let name = if info.is_projectile() {
        "Projectile"
    } else {
        "EffectAttack"
    };
    let mut entity = Entity::new(name);
    place(&mut entity.core, info);
    entity.add_component(
        CollisionComponent::circle(info.size)
            .with_layers(layers::bullet_layer_for(info.origin), attack_mask(info)),
    )?;
    entity.add_component(AttackBody::new(*info))?;
    Ok(entity)
}

/// Overwrite every attack field of a recycled entity with `info`
pub fn reset_attack_entity(entity: &mut Entity, info: &AttackInfo) {
    place(&mut entity.core, info);
    entity.core.signals.clear();
    if let Some(collider) = entity.collision_mut() {
        collider.set_shape(crate::collision::ColliderShape::Circle(info.size));
        collider.set_layer(layers::bullet_layer_for(info.origin));
        collider.set_mask(attack_mask(info));
        collider.set_active(true);
        collider.clear_trigger_targets();
    }
    if let Some(body) = entity.component_mut::<AttackBody>() {
        body.reset(*info);
    }
}

fn place(core: &mut EntityCore, info: &AttackInfo) {
    core.world_coord = info.transform.translation;
    core.transform = info.transform;
    core.character_type = Some(info.origin);
    core.initial_scale = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(origin: CharacterType, damage: i32) -> AttackInfo {
        AttackInfo {
            origin,
            transform: Transform::from_translation(Vec2::ZERO),
            direction: Vec2::X,
            size: 2.0,
            damage,
            critical: false,
            can_reflect_bullet: false,
            can_block_bullet: false,
            disappear_on_hit: true,
            kind: AttackKind::Projectile { speed: 100.0 },
        }
    }

    #[test]
    fn test_built_entity_carries_collider_and_body() {
        let e = build_attack_entity(&bullet(CharacterType::Player, 3)).unwrap();
        assert_eq!(e.name(), "Projectile");
        assert!(e.collision().is_some_and(|c| c.is_active()));
        assert_eq!(e.component::<AttackBody>().unwrap().info().damage, 3);
        assert!(e.core.initial_scale.is_none());
    }

    #[test]
    fn test_projectile_integrates_position() {
        let mut e = build_attack_entity(&bullet(CharacterType::Player, 3)).unwrap();
        e.update(0.5);
        assert_eq!(e.world_coord(), Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_effect_expires_after_lifetime() {
        let mut info = bullet(CharacterType::Player, 3);
        info.kind = AttackKind::Effect {
            effect: EffectKind::Slash,
            lifetime: 0.2,
        };
        let mut e = build_attack_entity(&info).unwrap();
        e.update(0.1);
        assert!(!e.component::<AttackBody>().unwrap().is_marked());
        e.update(0.15);
        assert!(e.component::<AttackBody>().unwrap().is_marked());
    }

    #[test]
    fn test_layers_follow_origin() {
        let e = build_attack_entity(&bullet(CharacterType::Enemy, 1)).unwrap();
        let c = e.collision().unwrap();
        assert_eq!(c.layer(), layers::ENEMY_BULLET);
        assert_eq!(c.mask() & layers::ENEMY, 0);
        assert_ne!(c.mask() & layers::PLAYER, 0);
    }

    #[test]
    fn test_reflection_switches_sides() {
        let mut e = build_attack_entity(&bullet(CharacterType::Enemy, 1)).unwrap();
        let reflector = HitPayload {
            origin: CharacterType::Player,
            damage: 1,
            critical: false,
            direction: -Vec2::X,
            can_reflect: true,
            can_block: true,
        };
        e.on_collision(&CollisionInfo {
            other: EntityId::new(),
            normal: Vec2::X,
            other_layer: layers::PLAYER_BULLET,
            incoming: Some(reflector),
        });
        let body = e.component::<AttackBody>().unwrap();
        assert_eq!(body.info().origin, CharacterType::Player);
        assert_eq!(body.info().direction, -Vec2::X);
        assert!(!body.is_marked());
        assert_eq!(e.collision().unwrap().layer(), layers::PLAYER_BULLET);
    }

    #[test]
    fn test_hit_target_only_once() {
        let mut info = bullet(CharacterType::Player, 4);
        info.disappear_on_hit = false;
        let mut e = build_attack_entity(&info).unwrap();
        let target = EntityId::new();
        assert!(e.hit_payload_for(target).is_some());
        e.on_collision(&CollisionInfo {
            other: target,
            normal: Vec2::X,
            other_layer: layers::ENEMY,
            incoming: None,
        });
        assert!(e.hit_payload_for(target).is_none());
        assert!(e.hit_payload_for(EntityId::new()).is_some());
    }
}
