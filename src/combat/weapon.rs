//! Weapons turn an attack action into attack descriptions
//!
//! A weapon never touches the world: it returns [`AttackInfo`]s and the
//! attack manager spawns them.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_8, PI, TAU};
use std::str::FromStr;

use crate::combat::attack::{AttackInfo, AttackKind, EffectKind};
use crate::core::config::SimulationConfig;
use crate::core::error::SimError;
use crate::core::types::{CharacterType, EntityId, Transform};
use crate::services::AudioSink;

/// Facing below this cosine counts as aiming left
const LEFT_COS_EPSILON: f32 = 1e-6;

/// Snapshot of whoever swings the weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wielder {
    pub id: EntityId,
    pub origin: CharacterType,
    pub world_coord: Vec2,
    pub facing_left: bool,
    pub can_reflect: bool,
}

/// Per-shot context the weapon needs besides the wielder
pub struct Swing<'a> {
    /// Aim angle in radians
    pub aim: f32,
    pub damage: i32,
    pub critical: bool,
    pub config: &'a SimulationConfig,
}

/// Family of a weapon, as named in the weapon catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Sword,
    Hammer,
    Spear,
    Fist,
    Gun,
    Bow,
}

impl WeaponKind {
    /// Swords and hammers are held at an angle and can block bullets
    pub fn has_offset(self) -> bool {
        matches!(self, Self::Sword | Self::Hammer)
    }
}

impl FromStr for WeaponKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sword" => Ok(Self::Sword),
            "Hammer" => Ok(Self::Hammer),
            "Spear" => Ok(Self::Spear),
            "Fist" => Ok(Self::Fist),
            "Gun" => Ok(Self::Gun),
            "Bow" => Ok(Self::Bow),
            other => Err(SimError::unknown_enum("weapon type", other)),
        }
    }
}

/// Attack interval timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    interval: f32,
    remaining: f32,
}

impl Cooldown {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }
}

pub trait Weapon: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn base_damage(&self) -> i32;

    fn energy_cost(&self) -> i32 {
        0
    }

    fn tick(&mut self, dt: f32);

    fn can_attack(&self) -> bool;

    fn attack(&mut self, wielder: &Wielder, swing: &Swing<'_>, audio: &mut dyn AudioSink) -> Vec<AttackInfo>;
}

/// Eight 45° sectors around the wielder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeleeSector {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl MeleeSector {
    pub fn offset(self, distance: f32) -> Vec2 {
        let d = distance;
        match self {
            Self::Right => Vec2::new(d, 0.0),
            Self::UpRight => Vec2::new(d, d),
            Self::Up => Vec2::new(0.0, d),
            Self::UpLeft => Vec2::new(-d, d),
            Self::Left => Vec2::new(-d, 0.0),
            Self::DownLeft => Vec2::new(-d, -d),
            Self::Down => Vec2::new(0.0, -d),
            Self::DownRight => Vec2::new(d, -d),
        }
    }
}

/// Wrap into (-π, π]; angles already in range come back untouched
pub fn normalize_angle(angle: f32) -> f32 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Sector for an angle; each sector excludes its lower bound
pub fn melee_sector(angle: f32) -> MeleeSector {
    let a = normalize_angle(angle);
    let b = FRAC_PI_8;
    if a > -b && a <= b {
        MeleeSector::Right
    } else if a > b && a <= 3.0 * b {
        MeleeSector::UpRight
    } else if a > 3.0 * b && a <= 5.0 * b {
        MeleeSector::Up
    } else if a > 5.0 * b && a <= 7.0 * b {
        MeleeSector::UpLeft
    } else if a > 7.0 * b || a <= -7.0 * b {
        MeleeSector::Left
    } else if a > -7.0 * b && a <= -5.0 * b {
        MeleeSector::DownLeft
    } else if a > -5.0 * b && a <= -3.0 * b {
        MeleeSector::Down
    } else {
        MeleeSector::DownRight
    }
}

#[derive(Debug, Clone)]
pub struct MeleeWeapon {
    pub name: String,
    pub kind: WeaponKind,
    pub damage: i32,
    /// Radius of the swing's hit area
    pub attack_range: f32,
    /// Distance from the wielder to the centre of the swing
    pub spawn_distance: f32,
    pub effect: EffectKind,
    cooldown: Cooldown,
}

impl MeleeWeapon {
    pub fn new(
        name: &str,
        kind: WeaponKind,
        damage: i32,
        attack_interval: f32,
        attack_range: f32,
        spawn_distance: f32,
        effect: EffectKind,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            damage,
            attack_range,
            spawn_distance,
            effect,
            cooldown: Cooldown::new(attack_interval),
        }
    }
}

impl Weapon for MeleeWeapon {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_damage(&self) -> i32 {
        self.damage
    }

    fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    fn can_attack(&self) -> bool {
        self.cooldown.ready()
    }

    fn attack(&mut self, wielder: &Wielder, swing: &Swing<'_>, audio: &mut dyn AudioSink) -> Vec<AttackInfo> {
        self.cooldown.reset();
        if self.name.contains("Light_saber") {
            audio.play_sfx("laser_sword");
        } else {
            audio.play_sfx("hand_sword");
        }

        let angle = normalize_angle(swing.aim);
        let mut distance = self.spawn_distance;
        if angle.cos() < -LEFT_COS_EPSILON {
            distance += swing.config.melee_left_standoff;
        }
        let offset = melee_sector(angle).offset(distance);

        let mut transform = Transform::from_translation(wielder.world_coord + offset);
        match self.effect {
            EffectKind::Shockwave => {
                transform.rotation = 0.0;
                transform.scale.y = transform.scale.y.abs();
            }
            EffectKind::Slash => {
                transform.rotation = angle;
                // Mirrored art needs the vertical axis flipped when facing left
                transform.scale.y = if wielder.facing_left {
                    -transform.scale.y.abs()
                } else {
                    transform.scale.y.abs()
                };
            }
        }

        vec![AttackInfo {
            origin: wielder.origin,
            transform,
            direction: Vec2::from_angle(angle),
            size: self.attack_range,
            damage: swing.damage,
            critical: swing.critical,
            can_reflect_bullet: wielder.can_reflect,
            can_block_bullet: self.kind.has_offset(),
            disappear_on_hit: false,
            kind: AttackKind::Effect {
                effect: self.effect,
                lifetime: swing.config.effect_attack_lifetime,
            },
        }]
    }
}

#[derive(Debug, Clone)]
pub struct RangedWeapon {
    pub name: String,
    pub kind: WeaponKind,
    pub damage: i32,
    pub energy_cost: i32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Distance from the wielder where bullets appear
    pub muzzle_distance: f32,
    cooldown: Cooldown,
}

impl RangedWeapon {
    pub fn new(name: &str, kind: WeaponKind, damage: i32, attack_interval: f32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            damage,
            energy_cost: 0,
            bullet_speed: 400.0,
            bullet_size: 4.0,
            muzzle_distance: 0.0,
            cooldown: Cooldown::new(attack_interval),
        }
    }

    pub fn with_bullet(mut self, speed: f32, size: f32) -> Self {
        self.bullet_speed = speed;
        self.bullet_size = size;
        self
    }

    pub fn with_energy_cost(mut self, cost: i32) -> Self {
        self.energy_cost = cost;
        self
    }

    pub fn with_muzzle_distance(mut self, distance: f32) -> Self {
        self.muzzle_distance = distance;
        self
    }
}

impl Weapon for RangedWeapon {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_damage(&self) -> i32 {
        self.damage
    }

    fn energy_cost(&self) -> i32 {
        self.energy_cost
    }

    fn tick(&mut self, dt: f32) {
        self.cooldown.tick(dt);
    }

    fn can_attack(&self) -> bool {
        self.cooldown.ready()
    }

    fn attack(&mut self, wielder: &Wielder, swing: &Swing<'_>, audio: &mut dyn AudioSink) -> Vec<AttackInfo> {
        self.cooldown.reset();
        audio.play_sfx("gun");

        let direction = Vec2::from_angle(swing.aim);
        let mut transform =
            Transform::from_translation(wielder.world_coord + direction * self.muzzle_distance);
        transform.rotation = swing.aim;

        vec![AttackInfo {
            origin: wielder.origin,
            transform,
            direction,
            size: self.bullet_size,
            damage: swing.damage,
            critical: swing.critical,
            can_reflect_bullet: false,
            can_block_bullet: false,
            disappear_on_hit: true,
            kind: AttackKind::Projectile {
                speed: self.bullet_speed,
            },
        }]
    }
}
