use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown {kind}: {value}")]
    UnknownEnum { kind: &'static str, value: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Failed to build trigger strategy {strategy}: {reason}")]
    StrategyConstruction { strategy: String, reason: String },

    #[error("Component is already attached to entity {0}")]
    ComponentAlreadyAttached(EntityId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SimError {
    pub fn unknown_enum(kind: &'static str, value: &str) -> Self {
        Self::UnknownEnum {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
