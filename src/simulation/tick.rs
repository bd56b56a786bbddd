//! Tick system - one frame of the simulation
//!
//! Order within a frame:
//! camera keys -> intents (input / AI) -> entity updates -> attack updates
//! -> collision pass -> deaths -> attack sweep -> attack spawns -> camera.
//!
//! Only the attack update may run on the rayon pool, and nothing else
//! touches the attacks while it does.

use glam::Vec2;
use serde::Serialize;

use crate::collision::CollisionReport;
use crate::combat::{perform_attack, AttackInfo, SweepStats};
use crate::core::types::{EntityId, Frame};
use crate::entity::components::ai::{AiComponent, AiContext};
use crate::entity::components::follower::FollowerComponent;
use crate::entity::components::movement::MovementComponent;
use crate::entity::Entity;
use crate::simulation::context::GameContext;
use crate::simulation::intent::{player_intent, Intent};
use crate::simulation::policy::ExecutionPolicy;
use crate::services::InputSource;

/// Summary of one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameReport {
    pub frame: Frame,
    pub collisions: CollisionReport,
    pub deaths: Vec<EntityId>,
    pub spawned_attacks: usize,
    pub released_projectiles: usize,
    pub dropped_effects: usize,
    pub parallel_update: bool,
    pub live_attacks: usize,
}

/// Advance the whole simulation by `dt` seconds
pub fn run_frame(ctx: &mut GameContext, input: &dyn InputSource, dt: f32) -> FrameReport {
    ctx.camera.on_input_received(input, dt);

    let pending = gather_intents(ctx, input, dt);

    ctx.world.update(dt);

    let policy = ExecutionPolicy::for_len(ctx.attacks.len(), ctx.config.parallel_threshold);
    ctx.attacks.update(dt, policy);

    let collisions = {
        let mut bodies: Vec<&mut Entity> =
            ctx.world.iter_mut().chain(ctx.attacks.iter_mut()).collect();
        ctx.collisions.resolve(&mut bodies)
    };

    let deaths = reap_dead(ctx);

    let SweepStats {
        released,
        dropped,
        removed,
    } = ctx.attacks.sweep(
        &mut ctx.pool,
        ctx.config.playfield_min(),
        ctx.config.playfield_max(),
    );
    for id in removed {
        ctx.camera.remove_pivot_child(id);
    }

    let mut spawned_attacks = 0;
    for info in &pending {
        match ctx.attacks.spawn(info, &mut ctx.pool) {
            Ok(_) => spawned_attacks += 1,
            Err(e) => tracing::error!("failed to spawn attack: {}", e),
        }
    }

    {
        let mut bodies: Vec<&mut Entity> =
            ctx.world.iter_mut().chain(ctx.attacks.iter_mut()).collect();
        for body in bodies.iter_mut() {
            ctx.camera.add_pivot_child(body);
        }
        ctx.camera.update(&mut bodies);
    }

    let report = FrameReport {
        frame: ctx.frame,
        collisions,
        deaths,
        spawned_attacks,
        released_projectiles: released,
        dropped_effects: dropped,
        parallel_update: policy == ExecutionPolicy::Parallel,
        live_attacks: ctx.attacks.len(),
    };
    tracing::trace!(
        "frame {}: {} collisions, {} attacks live",
        report.frame,
        report.collisions.collisions.len(),
        report.live_attacks
    );
    ctx.frame += 1;
    report
}

/// Turn input and AI decisions into movement and attack descriptions
fn gather_intents(ctx: &mut GameContext, input: &dyn InputSource, dt: f32) -> Vec<AttackInfo> {
    let player_id = ctx.player;
    let target = ctx
        .player()
        .filter(|p| p.is_active() && !p.is_dead())
        .map(Entity::world_coord);
    let ai_ctx = AiContext { target, dt };

    let mut pending = Vec::new();
    for entity in ctx.world.iter_mut() {
        if !entity.is_active() || entity.is_dead() {
            continue;
        }
        let position = entity.world_coord();
        let intent = if Some(entity.id()) == player_id {
            player_intent(input, position)
        } else if let Some(ai) = entity.component_mut::<AiComponent>() {
            ai.decide(position, &ai_ctx, &mut ctx.rng)
        } else {
            continue;
        };
        apply_intent(entity, &intent);
        if intent.attack {
            let aim = intent.aim.unwrap_or(Vec2::ZERO);
            pending.extend(perform_attack(
                entity,
                aim,
                &ctx.config,
                &mut ctx.rng,
                ctx.audio.as_mut(),
            ));
        }
    }
    pending
}

fn apply_intent(entity: &mut Entity, intent: &Intent) {
    if let Some(movement) = entity.component_mut::<MovementComponent>() {
        movement.set_direction(intent.move_dir);
    }
    if let Some(aim) = intent.aim {
        if aim.x != 0.0 {
            entity.core.face(aim.x < 0.0);
        }
        let facing_left = entity.core.is_facing_left();
        if let Some(follower) = entity.component_mut::<FollowerComponent>() {
            follower.track(aim, facing_left);
        }
    }
}

/// Process each death once: switch off the corpse's collider, award points
fn reap_dead(ctx: &mut GameContext) -> Vec<EntityId> {
    let mut deaths = Vec::new();
    for entity in ctx.world.iter_mut() {
        if !entity.is_dead() || ctx.reaped.contains(&entity.id()) {
            continue;
        }
        ctx.reaped.insert(entity.id());
        deaths.push(entity.id());
        if let Some(collider) = entity.collision_mut() {
            collider.set_active(false);
        }
        if let Some(ai) = entity.component::<AiComponent>() {
            ctx.score += ai.points;
        }
        tracing::debug!("{} died at frame {}", entity.name(), ctx.frame);
    }
    deaths
}
