use ahash::AHashMap;
use glam::Vec2;

use crate::collision::{CollisionInfo, HitPayload};
use crate::component_boilerplate;
use crate::core::types::{layers, EntityId};
use crate::entity::{Component, EntityCore};

/// Seconds before the same victim can be hurt again by touch
const REHIT_INTERVAL: f32 = 0.5;

/// Damage dealt simply by touching, for enemies whose attack type is `Collision`
#[derive(Debug, Clone)]
pub struct ContactDamageComponent {
    owner: Option<EntityId>,
    damage: i32,
    cooldowns: AHashMap<EntityId, f32>,
}

impl ContactDamageComponent {
    pub fn new(damage: i32) -> Self {
        Self {
            owner: None,
            damage,
            cooldowns: AHashMap::new(),
        }
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }
}

impl Component for ContactDamageComponent {
    component_boilerplate!("contact_damage");

    fn update(&mut self, _core: &mut EntityCore, dt: f32) {
        self.cooldowns.retain(|_, left| {
            *left -= dt;
            *left > 0.0
        });
    }

    fn handle_collision(&mut self, _core: &mut EntityCore, info: &CollisionInfo) {
        let bullets = layers::PLAYER_BULLET | layers::ENEMY_BULLET;
        if info.other_layer & bullets == 0 {
            self.cooldowns.insert(info.other, REHIT_INTERVAL);
        }
    }

    fn hit_payload(&self, core: &EntityCore, target: EntityId) -> Option<HitPayload> {
        if self.damage <= 0 || self.cooldowns.contains_key(&target) {
            return None;
        }
        Some(HitPayload {
            origin: core.character_type?,
            damage: self.damage,
            critical: false,
            direction: Vec2::ZERO,
            can_reflect: false,
            can_block: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CharacterType;

    #[test]
    fn test_rehit_waits_for_cooldown() {
        let mut core = EntityCore::new("slime");
        core.character_type = Some(CharacterType::Enemy);
        let mut contact = ContactDamageComponent::new(2);
        let victim = EntityId::new();
        assert_eq!(contact.hit_payload(&core, victim).unwrap().damage, 2);

        contact.handle_collision(
            &mut core,
            &CollisionInfo {
                other: victim,
                normal: Vec2::X,
                other_layer: layers::PLAYER,
                incoming: None,
            },
        );
        assert!(contact.hit_payload(&core, victim).is_none());
        contact.update(&mut core, REHIT_INTERVAL + 0.01);
        assert!(contact.hit_payload(&core, victim).is_some());
    }
}
