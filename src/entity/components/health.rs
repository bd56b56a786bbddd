//! Hit points, armor and energy

use crate::collision::CollisionInfo;
use crate::component_boilerplate;
use crate::core::types::EntityId;
use crate::entity::{Component, ComponentSignal, EntityCore};

/// Result of applying one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    pub armor_absorbed: i32,
    pub hp_lost: i32,
    /// True only on the hit that brought hp to zero
    pub died: bool,
}

#[derive(Debug, Clone)]
pub struct HealthComponent {
    owner: Option<EntityId>,
    max_hp: i32,
    hp: i32,
    max_armor: i32,
    armor: i32,
    max_energy: i32,
    energy: i32,
    /// A hit stronger than the remaining armor shatters it and is ignored
    pub break_protection: bool,
    recovery_interval: f32,
    recovery_step: i32,
    recovery_timer: f32,
    dead: bool,
}

impl HealthComponent {
    pub fn new(max_hp: i32, max_armor: i32, max_energy: i32) -> Self {
        Self {
            owner: None,
            max_hp,
            hp: max_hp,
            max_armor,
            armor: max_armor,
            max_energy,
            energy: max_energy,
            break_protection: false,
            recovery_interval: 1.0,
            recovery_step: 1,
            recovery_timer: 0.0,
            dead: false,
        }
    }

    pub fn with_armor_recovery(mut self, interval: f32, step: i32) -> Self {
        self.recovery_interval = interval;
        self.recovery_step = step;
        self
    }

    pub fn with_break_protection(mut self, enabled: bool) -> Self {
        self.break_protection = enabled;
        self
    }

    pub fn current_hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn current_armor(&self) -> i32 {
        self.armor
    }

    pub fn max_armor(&self) -> i32 {
        self.max_armor
    }

    pub fn current_energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Spend energy; refused (and nothing spent) when there is not enough
    pub fn consume_energy(&mut self, amount: i32) -> bool {
        if amount > self.energy {
            return false;
        }
        self.energy -= amount.max(0);
        true
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).clamp(0, self.max_energy);
    }

    /// Raise or lower max hp, moving current hp along; a living owner keeps at least 1
    pub fn adjust_max_hp(&mut self, delta: i32) {
        self.max_hp = (self.max_hp + delta).max(1);
        if !self.dead {
            self.hp = (self.hp + delta).clamp(1, self.max_hp);
        }
    }

    pub fn adjust_max_armor(&mut self, delta: i32) {
        self.max_armor = (self.max_armor + delta).max(0);
        self.armor = (self.armor + delta).clamp(0, self.max_armor);
    }

    pub fn adjust_max_energy(&mut self, delta: i32) {
        self.max_energy = (self.max_energy + delta).max(0);
        self.energy = (self.energy + delta).clamp(0, self.max_energy);
    }

    pub fn heal(&mut self, amount: i32) {
        if self.dead {
            return;
        }
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }

    /// Armor absorbs first, the remainder comes off hp
    pub fn take_damage(&mut self, damage: i32) -> DamageOutcome {
        let damage = damage.max(0);
        if self.dead || damage == 0 {
            return DamageOutcome::default();
        }

        if self.break_protection && self.armor > 0 && damage > self.armor {
            let absorbed = self.armor;
            self.armor = 0;
            return DamageOutcome {
                armor_absorbed: absorbed,
                ..DamageOutcome::default()
            };
        }

        let absorbed = damage.min(self.armor);
        self.armor -= absorbed;
        let remaining = damage - absorbed;
        let hp_lost = remaining.min(self.hp);
        self.hp -= hp_lost;

        let died = self.hp == 0;
        if died {
            self.dead = true;
        }
        DamageOutcome {
            armor_absorbed: absorbed,
            hp_lost,
            died,
        }
    }
}

impl Component for HealthComponent {
    component_boilerplate!("health");

    fn update(&mut self, _core: &mut EntityCore, dt: f32) {
        if self.dead || self.max_armor == 0 || self.armor >= self.max_armor {
            self.recovery_timer = 0.0;
            return;
        }
        self.recovery_timer += dt;
        if self.recovery_timer >= self.recovery_interval {
            self.armor = (self.armor + self.recovery_step).min(self.max_armor);
            self.recovery_timer = 0.0;
        }
    }

    fn handle_collision(&mut self, core: &mut EntityCore, info: &CollisionInfo) {
        let Some(hit) = info.incoming else {
            return;
        };
        if Some(hit.origin) == core.character_type {
            return;
        }
        let outcome = self.take_damage(hit.damage);
        tracing::trace!(
            "{} took {} (armor {}, hp {})",
            core.name,
            hit.damage,
            outcome.armor_absorbed,
            outcome.hp_lost
        );
        if outcome.died {
            core.signals.push(ComponentSignal::Died);
        }
    }
}
