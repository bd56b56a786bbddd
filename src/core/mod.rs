pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::SimulationConfig;
pub use error::{Result, SimError};
