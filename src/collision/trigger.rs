//! Trigger strategies: what a trigger zone does to whatever passes through

use serde_json::Value;

use crate::core::error::{Result, SimError};
use crate::core::types::EntityId;
use crate::entity::components::movement::MovementComponent;
use crate::entity::Entity;

/// Closed set of trigger behaviours
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerStrategy {
    /// Scales the visitor's move speed while it stays inside
    SpeedZone { multiplier: f32, duration: f32 },
}

impl TriggerStrategy {
    /// Build a strategy from its type name and JSON parameters
    pub fn from_config(kind: &str, config: &Value) -> Result<Self> {
        match kind {
            "SpeedZone" => {
                let multiplier = read_f32(config, "speedMultiplier", 1.0, kind)?;
                let duration = read_f32(config, "duration", 1.0, kind)?;
                if multiplier <= 0.0 || duration <= 0.0 {
                    return Err(SimError::StrategyConstruction {
                        strategy: kind.to_string(),
                        reason: format!(
                            "multiplier ({multiplier}) and duration ({duration}) must be positive"
                        ),
                    });
                }
                Ok(Self::SpeedZone {
                    multiplier,
                    duration,
                })
            }
            other => Err(SimError::StrategyConstruction {
                strategy: other.to_string(),
                reason: "unknown strategy type".into(),
            }),
        }
    }

    pub fn on_enter(&self, zone: EntityId, other: &mut Entity) {
        match *self {
            Self::SpeedZone {
                multiplier,
                duration,
            } => {
                if let Some(movement) = other.component_mut::<MovementComponent>() {
                    movement.apply_speed_modifier(zone, multiplier, duration);
                }
            }
        }
    }

    pub fn on_stay(&self, zone: EntityId, other: &mut Entity) {
        match self {
            // Refreshing the modifier keeps it alive while inside
            Self::SpeedZone { .. } => self.on_enter(zone, other),
        }
    }

    /// The visitor may already be gone, so only its id is passed
    pub fn on_exit(&self, zone: EntityId, other: EntityId) {
        match self {
            Self::SpeedZone { .. } => {
                tracing::trace!("{} left speed zone {}", other, zone);
            }
        }
    }
}

fn read_f32(config: &Value, key: &str, default: f32, strategy: &str) -> Result<f32> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| SimError::StrategyConstruction {
                strategy: strategy.to_string(),
                reason: format!("{key} is not a number: {value}"),
            }),
    }
}
