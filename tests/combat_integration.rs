//! Full-pipeline combat tests
//!
//! Characters come from the sample catalog under `data/arena`; frames are
//! driven through `run_frame` with scripted input.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use dungeon_sim::combat::{AttackBody, AttackInfo, AttackKind};
use dungeon_sim::core::types::{layers, CharacterType, Transform};
use dungeon_sim::core::SimulationConfig;
use dungeon_sim::collision::CollisionComponent;
use dungeon_sim::entity::components::ai::{AiBehavior, AiComponent, AiContext};
use dungeon_sim::entity::components::{HealthComponent, StateComponent};
use dungeon_sim::entity::Entity;
use dungeon_sim::factory::{Catalog, CharacterFactory};
use dungeon_sim::services::{AudioSink, KeySnapshot};
use dungeon_sim::simulation::{run_frame, GameContext, Intent};
use glam::Vec2;
use rand::RngCore;

const DT: f32 = 1.0 / 60.0;

fn catalog() -> Catalog {
    Catalog::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data/arena")).unwrap()
}

/// Never moves, never attacks
#[derive(Debug)]
struct Statue;

impl AiBehavior for Statue {
    fn name(&self) -> &'static str {
        "statue"
    }

    fn decide(&mut self, _position: Vec2, _ctx: &AiContext, _rng: &mut dyn RngCore) -> Intent {
        Intent::idle()
    }
}

fn target_dummy(at: Vec2, hp: i32, points: i32) -> Entity {
    let mut dummy = Entity::at("dummy", at);
    dummy.core.character_type = Some(CharacterType::Enemy);
    dummy.add_component(StateComponent::new()).unwrap();
    dummy.add_component(HealthComponent::new(hp, 0, 0)).unwrap();
    dummy
        .add_component(AiComponent::new(Box::new(Statue), points))
        .unwrap();
    dummy
        .add_component(
            CollisionComponent::boxed(Vec2::new(14.0, 12.0))
                .with_layers(layers::ENEMY, layers::PLAYER | layers::TERRAIN),
        )
        .unwrap();
    dummy
}

fn stray_bullet(at: Vec2) -> AttackInfo {
    AttackInfo {
        origin: CharacterType::Enemy,
        transform: Transform::from_translation(at),
        direction: Vec2::X,
        size: 2.0,
        damage: 1,
        critical: false,
        can_reflect_bullet: false,
        can_block_bullet: false,
        disappear_on_hit: true,
        kind: AttackKind::Projectile { speed: 60.0 },
    }
}

#[test]
fn test_player_shoots_dummy_dead() {
    let catalog = catalog();
    let config = SimulationConfig::default();
    let mut ctx = GameContext::new(config.clone(), 7).unwrap();
    let knight = CharacterFactory::new(&catalog, &config)
        .create_player(1, Vec2::ZERO)
        .unwrap()
        .unwrap();
    ctx.spawn_player(knight);
    let dummy = ctx.spawn(target_dummy(Vec2::new(100.0, 0.0), 5, 5));

    let input = KeySnapshot::new().aim_at(Vec2::new(100.0, 0.0)).firing();
    let mut spawned = 0;
    let mut deaths = Vec::new();
    for _ in 0..120 {
        let report = run_frame(&mut ctx, &input, DT);
        spawned += report.spawned_attacks;
        deaths.extend(report.deaths);
    }

    assert_eq!(deaths, vec![dummy], "death is reported exactly once");
    assert_eq!(ctx.score, 5);
    let corpse = ctx.world.get(dummy).unwrap();
    assert!(corpse.is_dead());
    assert!(!corpse.collision().unwrap().is_active());
    assert_eq!(corpse.component::<HealthComponent>().unwrap().current_hp(), 0);

    // Spent bullets were recycled for later shots
    assert!(spawned >= 2);
    assert!(ctx.pool.created() < spawned);
    assert_eq!(ctx.frame, 120);
}

/// Shares its cue log with the test after being boxed into the context
#[derive(Clone, Default)]
struct SharedAudio(Rc<RefCell<Vec<String>>>);

impl AudioSink for SharedAudio {
    fn play_sfx(&mut self, name: &str) {
        self.0.borrow_mut().push(name.to_string());
    }
}

#[test]
fn test_gunshot_respects_cooldown_and_plays_sound() {
    let catalog = catalog();
    let config = SimulationConfig::default();
    let audio = SharedAudio::default();
    let mut ctx = GameContext::new(config.clone(), 1)
        .unwrap()
        .with_audio(Box::new(audio.clone()));
    let knight = CharacterFactory::new(&catalog, &config)
        .create_player(1, Vec2::ZERO)
        .unwrap()
        .unwrap();
    ctx.spawn_player(knight);

    let input = KeySnapshot::new().aim_at(Vec2::new(0.0, 50.0)).firing();
    let report = run_frame(&mut ctx, &input, DT);
    assert_eq!(report.spawned_attacks, 1);
    assert_eq!(ctx.attacks.len(), 1);
    assert_eq!(*audio.0.borrow(), vec!["gun".to_string()]);

    let report = run_frame(&mut ctx, &input, DT);
    assert_eq!(report.spawned_attacks, 0);
    assert_eq!(audio.0.borrow().len(), 1);
}

#[test]
fn test_contact_damage_hits_armor_first() {
    let catalog = catalog();
    let config = SimulationConfig::default();
    let factory = CharacterFactory::new(&catalog, &config);
    let mut ctx = GameContext::new(config.clone(), 3).unwrap();
    let knight = ctx.spawn_player(factory.create_player(1, Vec2::ZERO).unwrap().unwrap());
    ctx.spawn(factory.create_enemy(2, Vec2::ZERO).unwrap().unwrap());

    let report = run_frame(&mut ctx, &KeySnapshot::new(), DT);
    assert_eq!(report.collisions.collisions.len(), 1);

    let health = ctx.world.get(knight).unwrap().component::<HealthComponent>().unwrap();
    assert_eq!(health.current_armor(), 4);
    assert_eq!(health.current_hp(), 7);
}

#[test]
fn test_large_volleys_update_in_parallel() {
    let mut ctx = GameContext::new(SimulationConfig::default(), 9).unwrap();
    for i in 0..150 {
        ctx.attacks
            .spawn(&stray_bullet(Vec2::new(500.0, i as f32 * 5.0)), &mut ctx.pool)
            .unwrap();
    }

    let report = run_frame(&mut ctx, &KeySnapshot::new(), 0.5);
    assert!(report.parallel_update);
    assert_eq!(report.live_attacks, 150);
    assert!(ctx
        .attacks
        .iter()
        .all(|a| (a.world_coord().x - 530.0).abs() < 1e-3));

    // A small volley stays on the calling thread
    ctx.exit_scene();
    ctx.attacks.spawn(&stray_bullet(Vec2::ZERO), &mut ctx.pool).unwrap();
    let report = run_frame(&mut ctx, &KeySnapshot::new(), DT);
    assert!(!report.parallel_update);
}

#[test]
fn test_projectiles_leaving_playfield_return_to_pool() {
    let mut ctx = GameContext::new(SimulationConfig::default(), 5).unwrap();
    let id = ctx
        .attacks
        .spawn(&stray_bullet(Vec2::new(1995.0, 0.0)), &mut ctx.pool)
        .unwrap();

    let report = run_frame(&mut ctx, &KeySnapshot::new(), 0.5);
    assert_eq!(report.released_projectiles, 1);
    assert!(ctx.attacks.is_empty());
    assert_eq!(ctx.pool.len(), 1);

    // The next shot reuses the pooled entity with fresh fields
    let mut info = stray_bullet(Vec2::new(-40.0, 10.0));
    info.origin = CharacterType::Player;
    let reused = ctx.attacks.spawn(&info, &mut ctx.pool).unwrap();
    assert_eq!(reused, id);
    let body = ctx.attacks.get(reused).unwrap();
    assert_eq!(body.world_coord(), Vec2::new(-40.0, 10.0));
    assert_eq!(body.component::<AttackBody>().unwrap().info().origin, CharacterType::Player);
    assert_eq!(body.collision().unwrap().layer(), layers::PLAYER_BULLET);
}

#[test]
fn test_exit_scene_clears_everything() {
    let catalog = catalog();
    let config = SimulationConfig::default();
    let mut ctx = GameContext::new(config.clone(), 11).unwrap();
    let factory = CharacterFactory::new(&catalog, &config);
    ctx.spawn_player(factory.create_player(1, Vec2::ZERO).unwrap().unwrap());
    for id in catalog.enemy_ids() {
        if let Some(enemy) = factory.create_enemy(id, Vec2::new(200.0, id as f32 * 40.0)).unwrap() {
            ctx.spawn(enemy);
        }
    }
    let input = KeySnapshot::new().aim_at(Vec2::new(200.0, 0.0)).firing();
    for _ in 0..30 {
        run_frame(&mut ctx, &input, DT);
    }
    assert!(ctx.camera.pivot_count() > 0);

    ctx.exit_scene();
    assert!(ctx.world.is_empty());
    assert!(ctx.attacks.is_empty());
    assert!(ctx.pool.is_empty());
    assert!(ctx.player().is_none());
    assert_eq!(ctx.camera.pivot_count(), 0);
}
