//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::error::SimError;

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to an entity
///
/// Ids are never reused, so a handle to a destroyed entity simply stops
/// resolving instead of aliasing a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Allocate a fresh id
    pub fn new() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation frame counter
pub type Frame = u64;

/// Render-space transform (translation, rotation in radians, scale)
///
/// The sign of each scale component encodes mirroring: a negative `scale.x`
/// means the entity faces left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// True when the horizontal scale is mirrored
    pub fn is_facing_left(&self) -> bool {
        self.scale.x < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

/// Who an entity (or an attack) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterType {
    Player,
    Enemy,
    Npc,
}

impl FromStr for CharacterType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYER" => Ok(Self::Player),
            "ENEMY" => Ok(Self::Enemy),
            "NPC" => Ok(Self::Npc),
            other => Err(SimError::unknown_enum("character type", other)),
        }
    }
}

/// Behavioural state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    Standing,
    Moving,
    Skill,
    Dead,
}

impl FromStr for State {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDING" => Ok(Self::Standing),
            "MOVING" => Ok(Self::Moving),
            "SKILL" => Ok(Self::Skill),
            "DEAD" => Ok(Self::Dead),
            other => Err(SimError::unknown_enum("state", other)),
        }
    }
}

/// Enemy behaviour tag from the character catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiType {
    /// Chase the player and attack in range
    Attack,
    /// Summoner; parsed but has no behaviour yet
    Summon,
    /// Wander around aimlessly
    Wander,
}

impl FromStr for AiType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Attack" => Ok(Self::Attack),
            "Summon" => Ok(Self::Summon),
            "Wander" => Ok(Self::Wander),
            other => Err(SimError::unknown_enum("AI type", other)),
        }
    }
}

/// Collision layer bits
///
/// A collider's layer says what it IS, its mask says what it reacts to.
pub mod layers {
    pub const NONE: u32 = 0;
    pub const PLAYER: u32 = 1 << 0;
    pub const ENEMY: u32 = 1 << 1;
    pub const TERRAIN: u32 = 1 << 2;
    pub const PLAYER_BULLET: u32 = 1 << 3;
    pub const ENEMY_BULLET: u32 = 1 << 4;

    /// Layer an attack spawned by `origin` lives on
    pub fn bullet_layer_for(origin: super::CharacterType) -> u32 {
        match origin {
            super::CharacterType::Player => PLAYER_BULLET,
            super::CharacterType::Enemy | super::CharacterType::Npc => ENEMY_BULLET,
        }
    }

    /// Layers an attack spawned by `origin` is able to hit
    pub fn bullet_mask_for(origin: super::CharacterType) -> u32 {
        match origin {
            super::CharacterType::Player => ENEMY | TERRAIN,
            super::CharacterType::Enemy | super::CharacterType::Npc => PLAYER | TERRAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_type_parse() {
        assert_eq!("PLAYER".parse::<CharacterType>().unwrap(), CharacterType::Player);
        assert_eq!("ENEMY".parse::<CharacterType>().unwrap(), CharacterType::Enemy);
        assert!("player".parse::<CharacterType>().is_err());
    }

    #[test]
    fn test_state_parse_fails_fast() {
        assert_eq!("DEAD".parse::<State>().unwrap(), State::Dead);
        let err = "FLYING".parse::<State>().unwrap_err();
        assert!(err.to_string().contains("FLYING"));
    }

    #[test]
    fn test_ai_type_parse() {
        assert_eq!("Wander".parse::<AiType>().unwrap(), AiType::Wander);
        assert!("Sleep".parse::<AiType>().is_err());
    }

    #[test]
    fn test_bullet_layers_never_hit_origin() {
        let mask = layers::bullet_mask_for(CharacterType::Player);
        assert_eq!(mask & layers::PLAYER, 0);
        assert_ne!(mask & layers::ENEMY, 0);
    }

    #[test]
    fn test_transform_facing() {
        let mut t = Transform::default();
        assert!(!t.is_facing_left());
        t.scale.x = -1.0;
        assert!(t.is_facing_left());
    }
}
