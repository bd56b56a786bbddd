//! Character and weapon factories fed by JSON catalogs
//!
//! Unknown enum strings fail the whole creation with an error. A catalog ID
//! that does not exist is logged and yields `Ok(None)`, so a misconfigured
//! entity simply does not spawn.

use ahash::AHashMap;
use glam::Vec2;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::collision::CollisionComponent;
use crate::combat::attack::EffectKind;
use crate::combat::weapon::{MeleeWeapon, RangedWeapon, Weapon, WeaponKind};
use crate::combat::{AttackComponent, ContactDamageComponent};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{layers, AiType, CharacterType, State};
use crate::entity::components::ai::{AiComponent, AttackAi};
use crate::entity::components::follower::OFFSET_WEAPON_PREP_DEGREES;
use crate::entity::components::{
    AnimationComponent, FollowerComponent, HealthComponent, MovementComponent, StateComponent, TalentComponent,
};
use crate::entity::Entity;

/// How far an attacking monster notices the player
const DETECTION_RANGE: f32 = 320.0;
/// Preferred shooting distance of ranged monsters
const RANGED_REACH: f32 = 180.0;

/// Where a player's hand sits relative to its centre
const PLAYER_HAND_OFFSET: Vec2 = Vec2::new(30.0 / 7.0, -25.0 / 4.0);

/// Grip point of a held weapon relative to the hand
const WEAPON_HOLDING_OFFSET: Vec2 = Vec2::new(15.0, 0.0);

/// Held weapons draw just in front of their wielder
const WEAPON_Z_OFFSET: f32 = 0.5;

fn default_collision_size() -> [f32; 2] {
    [16.0, 16.0]
}

/// One character entry of `player.json` or `enemy.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    #[serde(rename = "ID")]
    pub id: i32,
    pub name: String,
    #[serde(rename = "Type")]
    pub character_type: String,
    #[serde(default)]
    pub animations: BTreeMap<String, Vec<String>>,
    pub max_hp: i32,
    #[serde(default)]
    pub max_armor: i32,
    #[serde(default)]
    pub max_energy: i32,
    pub speed: f32,
    #[serde(rename = "weaponID")]
    pub weapon_id: Option<i32>,
    #[serde(default)]
    pub critical_rate: f64,
    #[serde(default)]
    pub reflect_bullet: bool,
    #[serde(default)]
    pub break_protection: bool,
    #[serde(default = "default_collision_size")]
    pub collision_size: [f32; 2],
    pub monster_type: Option<String>,
    #[serde(default)]
    pub monster_point: i32,
    pub attack_type: Option<String>,
    pub collision_damage: Option<i32>,
}

/// One entry of `weapon.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRecord {
    #[serde(rename = "ID")]
    pub id: i32,
    pub name: String,
    pub attack_type: String,
    pub weapon_type: String,
    pub damage: i32,
    #[serde(default)]
    pub energy: i32,
    pub attack_interval: f32,
    #[serde(default)]
    pub attack_range: f32,
    /// Spawn distance of the swing or bullet from the wielder
    #[serde(default)]
    pub offset: f32,
    pub effect: Option<String>,
    #[serde(default)]
    pub bullet_speed: f32,
    #[serde(default)]
    pub bullet_size: f32,
}

/// How a character deals damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStyle {
    Melee,
    Gun,
    /// Damage by touching
    Collision,
}

impl FromStr for AttackStyle {
    type Err = SimError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Melee" => Ok(Self::Melee),
            "Gun" => Ok(Self::Gun),
            "Collision" => Ok(Self::Collision),
            other => Err(SimError::unknown_enum("attack type", other)),
        }
    }
}

/// All catalog records, keyed by ID
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    players: AHashMap<i32, CharacterRecord>,
    enemies: AHashMap<i32, CharacterRecord>,
    weapons: AHashMap<i32, WeaponRecord>,
}

impl Catalog {
    pub fn from_json(players: &str, enemies: &str, weapons: &str) -> Result<Self> {
        let players: Vec<CharacterRecord> = serde_json::from_str(players)?;
        let enemies: Vec<CharacterRecord> = serde_json::from_str(enemies)?;
        let weapons: Vec<WeaponRecord> = serde_json::from_str(weapons)?;
        Ok(Self {
            players: players.into_iter().map(|r| (r.id, r)).collect(),
            enemies: enemies.into_iter().map(|r| (r.id, r)).collect(),
            weapons: weapons.into_iter().map(|r| (r.id, r)).collect(),
        })
    }

    /// Load `player.json`, `enemy.json` and `weapon.json` from a directory
    pub fn load(dir: &Path) -> Result<Self> {
        let read = |name: &str| std::fs::read_to_string(dir.join(name));
        Self::from_json(&read("player.json")?, &read("enemy.json")?, &read("weapon.json")?)
    }

    pub fn player_ids(&self) -> Vec<i32> {
        sorted_keys(&self.players)
    }

    pub fn enemy_ids(&self) -> Vec<i32> {
        sorted_keys(&self.enemies)
    }
}

fn sorted_keys<V>(map: &AHashMap<i32, V>) -> Vec<i32> {
    let mut ids: Vec<i32> = map.keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Assembles entities from catalog records
pub struct CharacterFactory<'a> {
    catalog: &'a Catalog,
    config: &'a SimulationConfig,
}

impl<'a> CharacterFactory<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a SimulationConfig) -> Self {
        Self { catalog, config }
    }

    pub fn create_weapon(&self, id: i32) -> Result<Option<Box<dyn Weapon>>> {
        let Some(record) = self.catalog.weapons.get(&id) else {
            tracing::error!("weapon ID {} not found in catalog", id);
            return Ok(None);
        };
        let kind: WeaponKind = record.weapon_type.parse()?;
        let weapon: Box<dyn Weapon> = match record.attack_type.parse::<AttackStyle>()? {
            AttackStyle::Melee => {
                let effect: EffectKind = record
                    .effect
                    .as_deref()
                    .ok_or_else(|| SimError::MissingField(format!("effect of weapon {}", record.name)))?
                    .parse()?;
                Box::new(MeleeWeapon::new(
                    &record.name,
                    kind,
                    record.damage,
                    record.attack_interval,
                    record.attack_range,
                    record.offset,
                    effect,
                ))
            }
            AttackStyle::Gun => Box::new(
                RangedWeapon::new(&record.name, kind, record.damage, record.attack_interval)
                    .with_bullet(record.bullet_speed, record.bullet_size)
                    .with_energy_cost(record.energy)
                    .with_muzzle_distance(record.offset),
            ),
            AttackStyle::Collision => {
                return Err(SimError::InvalidConfig(format!(
                    "weapon {} cannot use the Collision attack type",
                    record.name
                )))
            }
        };
        Ok(Some(weapon))
    }

    pub fn create_player(&self, id: i32, at: Vec2) -> Result<Option<Entity>> {
        let Some(record) = self.catalog.players.get(&id) else {
            tracing::error!("player ID {} not found in catalog", id);
            return Ok(None);
        };
        let mut player = self.character_base(record, at)?;
        let weapon = match record.weapon_id {
            Some(weapon_id) => self.create_weapon(weapon_id)?,
            None => None,
        };
        if weapon.is_some() {
            player.add_component(self.held_weapon_pose(record.weapon_id)?)?;
        }
        player.add_component(
            AttackComponent::new(weapon, record.critical_rate).with_reflect(record.reflect_bullet),
        )?;
        player.add_component(TalentComponent::new())?;
        player.add_component(
            CollisionComponent::boxed(Vec2::from(record.collision_size))
                .with_layers(layers::PLAYER, layers::TERRAIN),
        )?;
        tracing::debug!("created player {} ({})", record.name, player.id());
        Ok(Some(player))
    }

    /// Pose tracker for a player's weapon; swords and hammers are held raised
    fn held_weapon_pose(&self, weapon_id: Option<i32>) -> Result<FollowerComponent> {
        let follower = FollowerComponent::new(PLAYER_HAND_OFFSET, WEAPON_HOLDING_OFFSET).with_z_offset(WEAPON_Z_OFFSET);
        let record = weapon_id.and_then(|id| self.catalog.weapons.get(&id));
        let kind = match record {
            Some(record) => record.weapon_type.parse::<WeaponKind>()?,
            None => return Ok(follower),
        };
        Ok(if kind.has_offset() {
            follower.with_prep_degrees(OFFSET_WEAPON_PREP_DEGREES)
        } else {
            follower
        })
    }

    pub fn create_enemy(&self, id: i32, at: Vec2) -> Result<Option<Entity>> {
        let Some(record) = self.catalog.enemies.get(&id) else {
            tracing::error!("enemy ID {} not found in catalog", id);
            return Ok(None);
        };
        let ai_type: AiType = record
            .monster_type
            .as_deref()
            .ok_or_else(|| SimError::MissingField(format!("monsterType of {}", record.name)))?
            .parse()?;
        let style: AttackStyle = record
            .attack_type
            .as_deref()
            .ok_or_else(|| SimError::MissingField(format!("attackType of {}", record.name)))?
            .parse()?;

        let mut enemy = self.character_base(record, at)?;
        let mut reach = RANGED_REACH;
        let weapon = match style {
            AttackStyle::Collision => {
                let damage = record
                    .collision_damage
                    .ok_or_else(|| SimError::MissingField(format!("collisionDamage of {}", record.name)))?;
                enemy.add_component(ContactDamageComponent::new(damage))?;
                reach = 0.0;
                None
            }
            AttackStyle::Gun | AttackStyle::Melee => match record.weapon_id {
                Some(weapon_id) => {
                    if style == AttackStyle::Melee {
                        if let Some(w) = self.catalog.weapons.get(&weapon_id) {
                            reach = w.offset + w.attack_range;
                        }
                    }
                    self.create_weapon(weapon_id)?
                }
                None => None,
            },
        };

        let ai = match ai_type {
            AiType::Attack => Some(AiComponent::new(
                Box::new(AttackAi::new(DETECTION_RANGE, reach)),
                record.monster_point,
            )),
            other => AiComponent::for_type(other, record.monster_point),
        };
        if let Some(ai) = ai {
            enemy.add_component(ai)?;
        }
        enemy.add_component(AttackComponent::new(weapon, record.critical_rate))?;
        enemy.add_component(
            CollisionComponent::boxed(Vec2::from(record.collision_size))
                .with_layers(layers::ENEMY, layers::PLAYER | layers::TERRAIN),
        )?;
        tracing::debug!("created enemy {} ({})", record.name, enemy.id());
        Ok(Some(enemy))
    }

    /// Components every character shares
    fn character_base(&self, record: &CharacterRecord, at: Vec2) -> Result<Entity> {
        let character_type: CharacterType = record.character_type.parse()?;
        let animations = parse_animations(&record.animations)?;

        let mut entity = Entity::at(&record.name, at);
        entity.core.character_type = Some(character_type);
        entity.add_component(AnimationComponent::new(animations))?;
        entity.add_component(StateComponent::new())?;
        entity.add_component(
            HealthComponent::new(record.max_hp, record.max_armor, record.max_energy)
                .with_armor_recovery(
                    self.config.armor_recovery_interval,
                    self.config.armor_recovery_step,
                )
                .with_break_protection(record.break_protection),
        )?;
        entity.add_component(MovementComponent::new(record.speed))?;
        Ok(entity)
    }
}

fn parse_animations(raw: &BTreeMap<String, Vec<String>>) -> Result<AHashMap<State, Vec<String>>> {
    raw.iter()
        .map(|(state, frames)| Ok((state.parse::<State>()?, frames.clone())))
        .collect()
}
