//! Headless Arena Runner
//!
//! Spawns a player and a wave of enemies from the JSON catalog, drives the
//! player with a simple autopilot and prints a JSON summary of the run.

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::json;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use dungeon_sim::collision::{CollisionComponent, TriggerPhase};
use dungeon_sim::core::error::Result;
use dungeon_sim::core::types::{layers, EntityId};
use dungeon_sim::core::SimulationConfig;
use dungeon_sim::entity::components::HealthComponent;
use dungeon_sim::entity::Entity;
use dungeon_sim::factory::{Catalog, CharacterFactory};
use dungeon_sim::services::{AudioSink, KeySnapshot};
use dungeon_sim::simulation::{run_frame, GameContext};

const PLAYER_JSON: &str = include_str!("../../data/arena/player.json");
const ENEMY_JSON: &str = include_str!("../../data/arena/enemy.json");
const WEAPON_JSON: &str = include_str!("../../data/arena/weapon.json");

/// Headless Arena Runner - player autopilot vs a wave of enemies
#[derive(Parser, Debug)]
#[command(name = "arena_runner")]
#[command(about = "Run a headless arena and print a JSON summary")]
struct Args {
    /// Player catalog ID
    #[arg(long, default_value_t = 1)]
    player: i32,

    /// Number of enemies to spawn
    #[arg(long, default_value_t = 6)]
    enemies: usize,

    /// Frames to simulate
    #[arg(long, default_value_t = 1800)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding simulation defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding player.json, enemy.json and weapon.json
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print a line per death as the run goes
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: u64,
    player_alive: bool,
    player_hp: i32,
    enemies_spawned: usize,
    enemies_killed: usize,
    score: i32,
    collisions: usize,
    trigger_enters: usize,
    trigger_exits: usize,
    attacks_spawned: usize,
    projectiles_created: usize,
    projectiles_pooled: usize,
    parallel_frames: u64,
    sounds_played: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dungeon_sim=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}", json!({ "error": e.to_string() }));
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(dir) => Catalog::load(dir)?,
        None => Catalog::from_json(PLAYER_JSON, ENEMY_JSON, WEAPON_JSON)?,
    };

    let sounds = Rc::new(Cell::new(0));
    let mut ctx = GameContext::new(config.clone(), seed)?
        .with_audio(Box::new(CountingAudio(Rc::clone(&sounds))));
    let factory = CharacterFactory::new(&catalog, &config);
    let mut placement = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);

    let Some(player) = factory.create_player(args.player, Vec2::ZERO)? else {
        tracing::error!("no player with ID {}", args.player);
        return Ok(());
    };
    let player_id = ctx.spawn_player(player);

    let enemy_ids = catalog.enemy_ids();
    let mut enemies = Vec::new();
    for n in 0..args.enemies {
        if enemy_ids.is_empty() {
            break;
        }
        let kind = enemy_ids[n % enemy_ids.len()];
        let angle = placement.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        let distance = placement.gen_range(150.0..300.0);
        if let Some(enemy) = factory.create_enemy(kind, Vec2::from_angle(angle) * distance)? {
            enemies.push(ctx.spawn(enemy));
        }
    }
    ctx.spawn(mud_pool(Vec2::new(0.0, 80.0))?);

    let mut summary = RunSummary {
        seed,
        frames: 0,
        player_alive: true,
        player_hp: 0,
        enemies_spawned: enemies.len(),
        enemies_killed: 0,
        score: 0,
        collisions: 0,
        trigger_enters: 0,
        trigger_exits: 0,
        attacks_spawned: 0,
        projectiles_created: 0,
        projectiles_pooled: 0,
        parallel_frames: 0,
        sounds_played: 0,
    };

    for _ in 0..args.frames {
        let input = autopilot(&ctx, player_id, &enemies);
        let report = run_frame(&mut ctx, &input, args.dt);

        summary.frames += 1;
        summary.collisions += report.collisions.collisions.len();
        summary.trigger_enters += report.collisions.trigger_count(TriggerPhase::Enter);
        summary.trigger_exits += report.collisions.trigger_count(TriggerPhase::Exit);
        summary.attacks_spawned += report.spawned_attacks;
        if report.parallel_update {
            summary.parallel_frames += 1;
        }
        for id in &report.deaths {
            if *id == player_id {
                summary.player_alive = false;
            } else {
                summary.enemies_killed += 1;
            }
            if args.verbose {
                let name = ctx.world.get(*id).map(Entity::name).unwrap_or("?");
                eprintln!("frame {}: {} died", report.frame, name);
            }
        }
        if !summary.player_alive || summary.enemies_killed == summary.enemies_spawned {
            break;
        }
    }

    summary.score = ctx.score;
    summary.player_hp = ctx
        .player()
        .and_then(|p| p.component::<HealthComponent>())
        .map(HealthComponent::current_hp)
        .unwrap_or(0);
    summary.projectiles_created = ctx.pool.created();
    summary.projectiles_pooled = ctx.pool.len();
    summary.sounds_played = sounds.get();
    ctx.exit_scene();

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("failed to serialize summary: {}", e),
    }
    Ok(())
}

/// Counts sound cues instead of playing them
struct CountingAudio(Rc<Cell<usize>>);

impl AudioSink for CountingAudio {
    fn play_sfx(&mut self, _name: &str) {
        self.0.set(self.0.get() + 1);
    }
}

/// Slowing zone in the middle of the arena
fn mud_pool(at: Vec2) -> Result<Entity> {
    let mut zone = Entity::at("MudPool", at);
    zone.add_component(
        CollisionComponent::boxed(Vec2::new(120.0, 60.0))
            .with_layers(layers::TERRAIN, layers::PLAYER | layers::ENEMY)
            .as_trigger("SpeedZone", json!({ "speedMultiplier": 0.5, "duration": 0.5 })),
    )?;
    Ok(zone)
}

/// Walk towards the nearest living enemy and keep firing at it
fn autopilot(ctx: &GameContext, player: EntityId, enemies: &[EntityId]) -> KeySnapshot {
    let Some(me) = ctx.world.get(player) else {
        return KeySnapshot::new();
    };
    let here = me.world_coord();
    let nearest = enemies
        .iter()
        .filter_map(|id| ctx.world.get(*id))
        .filter(|e| !e.is_dead())
        .map(Entity::world_coord)
        .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));

    let Some(target) = nearest else {
        return KeySnapshot::new();
    };
    let mut input = KeySnapshot::new().aim_at(target).firing();
    let to_target = target - here;
    if to_target.length() > 40.0 {
        if to_target.x > 1.0 {
            input = input.press('D');
        } else if to_target.x < -1.0 {
            input = input.press('A');
        }
        if to_target.y > 1.0 {
            input = input.press('W');
        } else if to_target.y < -1.0 {
            input = input.press('S');
        }
    }
    input
}
