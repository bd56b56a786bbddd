use glam::Vec2;
use rand::{Rng, RngCore};

use crate::combat::attack::AttackInfo;
use crate::combat::weapon::{Swing, Weapon, Wielder};
use crate::component_boilerplate;
use crate::core::config::SimulationConfig;
use crate::core::types::EntityId;
use crate::entity::components::follower::FollowerComponent;
use crate::entity::components::health::HealthComponent;
use crate::entity::{Component, Entity, EntityCore};
use crate::services::AudioSink;

/// Weapon holder of a character
#[derive(Debug)]
pub struct AttackComponent {
    owner: Option<EntityId>,
    weapon: Option<Box<dyn Weapon>>,
    /// Probability in [0, 1] that an attack is a critical hit
    pub critical_rate: f64,
    /// Melee swings from this wielder bounce enemy bullets back
    pub reflect_bullet: bool,
}

impl AttackComponent {
    pub fn new(weapon: Option<Box<dyn Weapon>>, critical_rate: f64) -> Self {
        Self {
            owner: None,
            weapon,
            critical_rate,
            reflect_bullet: false,
        }
    }

    pub fn with_reflect(mut self, reflect: bool) -> Self {
        self.reflect_bullet = reflect;
        self
    }

    pub fn weapon(&self) -> Option<&dyn Weapon> {
        self.weapon.as_deref()
    }

    /// Swap weapons, returning the old one
    pub fn equip(&mut self, weapon: Box<dyn Weapon>) -> Option<Box<dyn Weapon>> {
        self.weapon.replace(weapon)
    }
}

impl Component for AttackComponent {
    component_boilerplate!("attack_component");

    fn update(&mut self, _core: &mut EntityCore, dt: f32) {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.tick(dt);
        }
    }
}

/// Fire the entity's weapon towards `aim`
///
/// Returns no attacks when the entity is dead, unarmed, still cooling down
/// or short of energy. Energy is only spent on an attack that happens.
pub fn perform_attack(
    entity: &mut Entity,
    aim: Vec2,
    config: &SimulationConfig,
    rng: &mut dyn RngCore,
    audio: &mut dyn AudioSink,
) -> Vec<AttackInfo> {
    if entity.is_dead() || !entity.is_active() {
        return Vec::new();
    }
    let Some(origin) = entity.core.character_type else {
        tracing::debug!("{} has no side and cannot attack", entity.name());
        return Vec::new();
    };
    let facing_left = entity.core.is_facing_left();
    let angle = if aim.length_squared() > 0.0 {
        aim.y.atan2(aim.x)
    } else if facing_left {
        std::f32::consts::PI
    } else {
        0.0
    };

    let (cost, reflect) = match entity.component::<AttackComponent>() {
        Some(attacker) => match attacker.weapon() {
            Some(weapon) if weapon.can_attack() => (weapon.energy_cost(), attacker.reflect_bullet),
            _ => return Vec::new(),
        },
        None => return Vec::new(),
    };
    if cost > 0 {
        let paid = entity
            .component_mut::<HealthComponent>()
            .is_some_and(|health| health.consume_energy(cost));
        if !paid {
            tracing::debug!("{} lacks energy ({}) to fire", entity.name(), cost);
            return Vec::new();
        }
    }

    // A held weapon swings around its own, possibly limited, aim
    let angle = match entity.component_mut::<FollowerComponent>() {
        Some(follower) => {
            follower.track(aim, facing_left);
            follower.start_attack_action();
            follower.swing_center()
        }
        None => angle,
    };

    let wielder = Wielder {
        id: entity.id(),
        origin,
        world_coord: entity.core.world_coord,
        facing_left,
        can_reflect: reflect,
    };
    let Some(attacker) = entity.component_mut::<AttackComponent>() else {
        return Vec::new();
    };
    let critical = rng.gen_bool(attacker.critical_rate.clamp(0.0, 1.0));
    let Some(weapon) = attacker.weapon.as_mut() else {
        return Vec::new();
    };
    let mut damage = weapon.base_damage();
    if critical {
        damage = (damage as f32 * config.critical_multiplier).round() as i32;
    }
    let swing = Swing {
        aim: angle,
        damage,
        critical,
        config,
    };
    weapon.attack(&wielder, &swing, audio)
}
