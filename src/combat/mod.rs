//! Weapons, attack entities and projectile pooling

pub mod attack;
pub mod attacker;
pub mod contact;
pub mod manager;
pub mod pool;
pub mod weapon;

pub use attack::{build_attack_entity, AttackBody, AttackInfo, AttackKind, EffectKind};
pub use attacker::{perform_attack, AttackComponent};
pub use contact::ContactDamageComponent;
pub use manager::{AttackManager, SweepStats};
pub use pool::ProjectilePool;
pub use weapon::{melee_sector, MeleeSector, MeleeWeapon, RangedWeapon, Weapon, WeaponKind};
