//! Dungeon Sim - runtime core of a top-down action game
//!
//! Entities and components, layered collision with triggers, weapons and
//! pooled projectiles, and the camera transform, driven one frame at a time
//! through [`simulation::run_frame`].

pub mod collision;
pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod factory;
pub mod render;
pub mod services;
pub mod simulation;
pub mod spatial;
