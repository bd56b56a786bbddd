//! Enemy decision making
//!
//! AI behaviours form an open set behind [`AiBehavior`]; the component only
//! stores the behaviour and the monster's point value. Decisions are turned
//! into movement and attacks by the frame pipeline, not here.

use glam::Vec2;
use rand::{Rng, RngCore};

use crate::component_boilerplate;
use crate::core::types::{AiType, EntityId};
use crate::entity::Component;
use crate::simulation::intent::Intent;

/// What an AI can see when it decides
#[derive(Debug, Clone, Copy, Default)]
pub struct AiContext {
    /// World position of the entity the AI hunts, if any is alive
    pub target: Option<Vec2>,
    pub dt: f32,
}

pub trait AiBehavior: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn decide(&mut self, position: Vec2, ctx: &AiContext, rng: &mut dyn RngCore) -> Intent;
}

/// Picks a random heading (or a pause) every `interval` seconds
#[derive(Debug, Clone)]
pub struct WanderAi {
    interval: f32,
    timer: f32,
    heading: Vec2,
}

impl WanderAi {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            timer: 0.0,
            heading: Vec2::ZERO,
        }
    }
}

impl Default for WanderAi {
    fn default() -> Self {
        Self::new(1.5)
    }
}

impl AiBehavior for WanderAi {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn decide(&mut self, _position: Vec2, ctx: &AiContext, rng: &mut dyn RngCore) -> Intent {
        self.timer -= ctx.dt;
        if self.timer <= 0.0 {
            self.timer = self.interval;
            // One in four turns is spent standing still
            self.heading = if rng.gen_bool(0.25) {
                Vec2::ZERO
            } else {
                Vec2::from_angle(rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI))
            };
        }
        Intent::walk(self.heading)
    }
}

/// Chases the target inside `detection_range`, swings inside `attack_range`
#[derive(Debug, Clone)]
pub struct AttackAi {
    pub detection_range: f32,
    pub attack_range: f32,
    idle: WanderAi,
}

impl AttackAi {
    pub fn new(detection_range: f32, attack_range: f32) -> Self {
        Self {
            detection_range,
            attack_range,
            idle: WanderAi::default(),
        }
    }
}

impl Default for AttackAi {
    fn default() -> Self {
        Self::new(300.0, 40.0)
    }
}

impl AiBehavior for AttackAi {
    fn name(&self) -> &'static str {
        "attack"
    }

    fn decide(&mut self, position: Vec2, ctx: &AiContext, rng: &mut dyn RngCore) -> Intent {
        let Some(target) = ctx.target else {
            return self.idle.decide(position, ctx, rng);
        };
        let to_target = target - position;
        let distance = to_target.length();
        if distance > self.detection_range {
            return self.idle.decide(position, ctx, rng);
        }
        let aim = to_target.normalize_or_zero();
        if distance <= self.attack_range {
            Intent {
                move_dir: Vec2::ZERO,
                aim: Some(aim),
                attack: true,
            }
        } else {
            Intent {
                move_dir: aim,
                aim: Some(aim),
                attack: false,
            }
        }
    }
}

#[derive(Debug)]
pub struct AiComponent {
    owner: Option<EntityId>,
    behavior: Box<dyn AiBehavior>,
    /// Score awarded when this monster dies
    pub points: i32,
}

impl AiComponent {
    pub fn new(behavior: Box<dyn AiBehavior>, points: i32) -> Self {
        Self {
            owner: None,
            behavior,
            points,
        }
    }

    /// Behaviour for a catalog AI tag; `Summon` has none yet
    pub fn for_type(ai_type: AiType, points: i32) -> Option<Self> {
        let behavior: Box<dyn AiBehavior> = match ai_type {
            AiType::Attack => Box::new(AttackAi::default()),
            AiType::Wander => Box::new(WanderAi::default()),
            AiType::Summon => {
                tracing::warn!("Summon AI has no behaviour; enemy will stand still");
                return None;
            }
        };
        Some(Self::new(behavior, points))
    }

    pub fn behavior_name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn decide(&mut self, position: Vec2, ctx: &AiContext, rng: &mut dyn RngCore) -> Intent {
        self.behavior.decide(position, ctx, rng)
    }
}

impl Component for AiComponent {
    component_boilerplate!("ai");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_attack_ai_chases_then_swings() {
        let mut ai = AttackAi::new(100.0, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ctx = AiContext {
            target: Some(Vec2::new(50.0, 0.0)),
            dt: 0.1,
        };
        let chase = ai.decide(Vec2::ZERO, &ctx, &mut rng);
        assert_eq!(chase.move_dir, Vec2::X);
        assert!(!chase.attack);

        let swing = ai.decide(Vec2::new(45.0, 0.0), &ctx, &mut rng);
        assert!(swing.attack);
        assert_eq!(swing.move_dir, Vec2::ZERO);
        assert_eq!(swing.aim, Some(Vec2::X));
    }

    #[test]
    fn test_attack_ai_ignores_far_target() {
        let mut ai = AttackAi::new(100.0, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ctx = AiContext {
            target: Some(Vec2::new(500.0, 0.0)),
            dt: 0.1,
        };
        assert!(!ai.decide(Vec2::ZERO, &ctx, &mut rng).attack);
    }

    #[test]
    fn test_wander_heading_is_unit_or_zero() {
        let mut ai = WanderAi::new(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ctx = AiContext { target: None, dt: 0.5 };
        for _ in 0..20 {
            let intent = ai.decide(Vec2::ZERO, &ctx, &mut rng);
            let len = intent.move_dir.length();
            assert!(len == 0.0 || (len - 1.0).abs() < 1e-4);
            assert!(!intent.attack);
        }
    }

    #[test]
    fn test_summon_has_no_behaviour() {
        assert!(AiComponent::for_type(AiType::Summon, 3).is_none());
        assert_eq!(
            AiComponent::for_type(AiType::Wander, 3).unwrap().behavior_name(),
            "wander"
        );
    }
}
