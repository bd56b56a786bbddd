//! Permanent character upgrades that can be granted and taken back

use serde::{Deserialize, Serialize};

use crate::combat::AttackComponent;
use crate::component_boilerplate;
use crate::core::types::EntityId;
use crate::entity::components::health::HealthComponent;
use crate::entity::components::movement::MovementComponent;
use crate::entity::{Component, Entity};

/// What a talent changes on its owner
///
/// Every effect can be undone exactly, so removing a talent restores the
/// stats it touched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TalentEffect {
    MaxHp(i32),
    MaxArmor(i32),
    MaxEnergy(i32),
    SpeedMultiplier(f32),
    CriticalRate(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub name: String,
    pub effect: TalentEffect,
}

impl Talent {
    pub fn new(name: &str, effect: TalentEffect) -> Self {
        Self {
            name: name.to_string(),
            effect,
        }
    }
}

/// Talents a character holds, in the order they were granted
#[derive(Debug, Clone, Default)]
pub struct TalentComponent {
    owner: Option<EntityId>,
    talents: Vec<Talent>,
}

impl TalentComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn talents(&self) -> &[Talent] {
        &self.talents
    }

    pub fn has(&self, name: &str) -> bool {
        self.talents.iter().any(|t| t.name == name)
    }
}

impl Component for TalentComponent {
    component_boilerplate!("talent");
}

fn modify<C: Component>(entity: &mut Entity, f: impl FnOnce(&mut C)) -> bool {
    match entity.component_mut::<C>() {
        Some(component) => {
            f(component);
            true
        }
        None => false,
    }
}

fn apply_effect(entity: &mut Entity, effect: TalentEffect, undo: bool) {
    let sign = if undo { -1 } else { 1 };
    let applied = match effect {
        TalentEffect::MaxHp(n) => modify(entity, |h: &mut HealthComponent| h.adjust_max_hp(n * sign)),
        TalentEffect::MaxArmor(n) => modify(entity, |h: &mut HealthComponent| h.adjust_max_armor(n * sign)),
        TalentEffect::MaxEnergy(n) => modify(entity, |h: &mut HealthComponent| h.adjust_max_energy(n * sign)),
        TalentEffect::SpeedMultiplier(m) => {
            let factor = if undo { m.recip() } else { m };
            modify(entity, |mv: &mut MovementComponent| mv.scale_base_speed(factor))
        }
        TalentEffect::CriticalRate(r) => modify(entity, |a: &mut AttackComponent| {
            a.critical_rate += r * f64::from(sign);
        }),
    };
    if !applied {
        tracing::debug!("{} has nothing for talent effect {:?}", entity.name(), effect);
    }
}

/// Grant `talent` and apply its effect
///
/// Returns false when the entity holds no talents or already has one with
/// the same name. A speed multiplier must be positive.
pub fn add_talent(entity: &mut Entity, talent: Talent) -> bool {
    if let TalentEffect::SpeedMultiplier(m) = talent.effect {
        if !(m > 0.0 && m.is_finite()) {
            tracing::warn!("talent {} has invalid speed multiplier {}", talent.name, m);
            return false;
        }
    }
    let effect = talent.effect;
    match entity.component_mut::<TalentComponent>() {
        Some(holder) if !holder.has(&talent.name) => {
            tracing::debug!("granting talent {}", talent.name);
            holder.talents.push(talent);
        }
        _ => return false,
    }
    apply_effect(entity, effect, false);
    true
}

/// Take a talent back by name and undo its effect
pub fn remove_talent(entity: &mut Entity, name: &str) -> bool {
    let Some(holder) = entity.component_mut::<TalentComponent>() else {
        return false;
    };
    let Some(slot) = holder.talents.iter().position(|t| t.name == name) else {
        return false;
    };
    let talent = holder.talents.remove(slot);
    apply_effect(entity, talent.effect, true);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Entity {
        let mut e = Entity::new("hero");
        e.add_component(HealthComponent::new(6, 4, 100)).unwrap();
        e.add_component(MovementComponent::new(100.0)).unwrap();
        e.add_component(AttackComponent::new(None, 0.1)).unwrap();
        e.add_component(TalentComponent::new()).unwrap();
        e
    }

    #[test]
    fn test_add_then_remove_restores_stats() {
        let mut e = hero();
        assert!(add_talent(&mut e, Talent::new("Tough", TalentEffect::MaxHp(3))));
        assert!(add_talent(&mut e, Talent::new("Swift", TalentEffect::SpeedMultiplier(1.25))));
        assert!(add_talent(&mut e, Talent::new("Keen", TalentEffect::CriticalRate(0.15))));
        let health = e.component::<HealthComponent>().unwrap();
        assert_eq!((health.max_hp(), health.current_hp()), (9, 9));
        assert_eq!(e.component::<MovementComponent>().unwrap().base_speed(), 125.0);

        assert!(remove_talent(&mut e, "Tough"));
        assert!(remove_talent(&mut e, "Swift"));
        assert!(remove_talent(&mut e, "Keen"));
        let health = e.component::<HealthComponent>().unwrap();
        assert_eq!((health.max_hp(), health.current_hp()), (6, 6));
        assert!((e.component::<MovementComponent>().unwrap().base_speed() - 100.0).abs() < 1e-3);
        assert!((e.component::<AttackComponent>().unwrap().critical_rate - 0.1).abs() < 1e-9);
        assert!(e.component::<TalentComponent>().unwrap().talents().is_empty());
    }

    #[test]
    fn test_duplicate_and_unknown_names_are_refused() {
        let mut e = hero();
        assert!(add_talent(&mut e, Talent::new("Armored", TalentEffect::MaxArmor(2))));
        assert!(!add_talent(&mut e, Talent::new("Armored", TalentEffect::MaxArmor(2))));
        assert_eq!(e.component::<HealthComponent>().unwrap().max_armor(), 6);
        assert!(!remove_talent(&mut e, "Nope"));
        assert!(!add_talent(&mut e, Talent::new("Stuck", TalentEffect::SpeedMultiplier(0.0))));
    }

    #[test]
    fn test_entity_without_talents_refuses() {
        let mut e = Entity::new("crate");
        assert!(!add_talent(&mut e, Talent::new("Tough", TalentEffect::MaxHp(1))));
        assert!(!remove_talent(&mut e, "Tough"));
    }

    #[test]
    fn test_talent_from_json() {
        let talent: Talent =
            serde_json::from_str(r#"{"name": "Battery", "effect": {"MaxEnergy": 50}}"#).unwrap();
        assert_eq!(talent, Talent::new("Battery", TalentEffect::MaxEnergy(50)));
    }
}
