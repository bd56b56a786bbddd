//! Behaviour components attached to characters and props

pub mod ai;
pub mod animation;
pub mod door;
pub mod follower;
pub mod health;
pub mod movement;
pub mod state;
pub mod talent;

pub use ai::{AiBehavior, AiComponent, AttackAi, WanderAi};
pub use animation::AnimationComponent;
pub use door::DoorComponent;
pub use follower::FollowerComponent;
pub use health::{DamageOutcome, HealthComponent};
pub use movement::{MovementComponent, SpeedModifier};
pub use state::StateComponent;
pub use talent::{add_talent, remove_talent, Talent, TalentComponent, TalentEffect};
