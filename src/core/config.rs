//! Simulation configuration with documented constants
//!
//! All tunables are collected here. The config is owned by the
//! [`GameContext`](crate::simulation::context::GameContext); there is no
//! process-wide instance.

use glam::Vec2;
use serde::Deserialize;
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Broad-phase strategy used by the collision manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadPhase {
    /// Test every pair of active colliders
    Naive,
    /// Bucket colliders in a sparse hash grid first
    Grid,
}

/// Configuration for the simulation systems
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === PARALLELIZATION ===
    /// Projectile count above which bulk updates run on the rayon pool
    ///
    /// At or below this size the thread hand-off costs more than it saves.
    pub parallel_threshold: usize,

    // === COLLISION ===
    /// Pair generation strategy
    pub broad_phase: BroadPhase,

    /// Cell size of the broad-phase hash grid (world units)
    ///
    /// Should be a bit larger than the typical collider so most colliders
    /// land in one to four cells.
    pub grid_cell_size: f32,

    // === HEALTH ===
    /// Seconds of accumulated time before armor regenerates one step
    pub armor_recovery_interval: f32,

    /// Armor points restored per regeneration step
    pub armor_recovery_step: i32,

    // === ATTACKS ===
    /// Extra spawn distance for melee swings aimed to the left
    pub melee_left_standoff: f32,

    /// Seconds an effect (melee) attack stays alive
    pub effect_attack_lifetime: f32,

    /// Damage multiplier applied on a critical hit
    pub critical_multiplier: f32,

    /// Lower-left corner of the playfield; projectiles outside are removed
    pub playfield_min: [f32; 2],

    /// Upper-right corner of the playfield
    pub playfield_max: [f32; 2],

    // === CAMERA ===
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 100,

            broad_phase: BroadPhase::Grid,
            grid_cell_size: 64.0,

            armor_recovery_interval: 1.0,
            armor_recovery_step: 1,

            melee_left_standoff: 5.0,
            effect_attack_lifetime: 0.2,
            critical_multiplier: 2.0,
            playfield_min: [-2000.0, -2000.0],
            playfield_max: [2000.0, 2000.0],

            zoom_min: 0.5,
            zoom_max: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; keys that are absent keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn playfield_min(&self) -> Vec2 {
        Vec2::from(self.playfield_min)
    }

    pub fn playfield_max(&self) -> Vec2 {
        Vec2::from(self.playfield_max)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_cell_size <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "grid_cell_size ({}) must be positive",
                self.grid_cell_size
            )));
        }

        if self.armor_recovery_interval <= 0.0 || self.armor_recovery_step <= 0 {
            return Err(SimError::InvalidConfig(
                "armor recovery interval and step must be positive".into(),
            ));
        }

        if self.zoom_min <= 0.0 || self.zoom_min > self.zoom_max {
            return Err(SimError::InvalidConfig(format!(
                "zoom range [{}, {}] is empty or non-positive",
                self.zoom_min, self.zoom_max
            )));
        }

        let (min, max) = (self.playfield_min(), self.playfield_max());
        if min.x >= max.x || min.y >= max.y {
            return Err(SimError::InvalidConfig(format!(
                "playfield min {:?} must be below max {:?}",
                min, max
            )));
        }

        if self.critical_multiplier < 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "critical_multiplier ({}) should be >= 1",
                self.critical_multiplier
            )));
        }

        Ok(())
    }
}
